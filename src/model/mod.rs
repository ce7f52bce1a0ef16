//! Index data model.
//!
//! The collector produces one `RuleRecord` per rule file; the records are
//! wrapped in an `IndexDocument`, which is what gets written to disk and
//! fetched by browsing tools.

use serde::{Deserialize, Serialize};

/// Metadata extracted from a single rule file.
///
/// Every field is always present. Values missing from the source text are
/// empty strings, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Path relative to the scan root.
    pub path: String,
    pub title: String,
    pub id: String,
    pub status: String,
    pub level: String,
    pub date: String,
    pub modified: String,
    pub logsource: Logsource,
    /// Full file text as read (after lossy UTF-8 decoding).
    pub yaml: String,
}

/// The `logsource:` block of a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logsource {
    /// All `key:value` pairs of the block in file order, joined by `", "`.
    pub raw: String,
    pub product: String,
    pub category: String,
    pub service: String,
}

impl Logsource {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// The aggregated index written by a run.
///
/// Fields are private so `count` can never disagree with `rules`;
/// deserializing a document whose count does not match is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndexDocument")]
pub struct IndexDocument {
    generated_from: String,
    count: usize,
    rules: Vec<RuleRecord>,
}

#[derive(Deserialize)]
struct RawIndexDocument {
    generated_from: String,
    count: usize,
    rules: Vec<RuleRecord>,
}

impl TryFrom<RawIndexDocument> for IndexDocument {
    type Error = String;

    fn try_from(raw: RawIndexDocument) -> Result<Self, Self::Error> {
        if raw.count != raw.rules.len() {
            return Err(format!(
                "count is {} but the index holds {} rules",
                raw.count,
                raw.rules.len()
            ));
        }
        Ok(Self::new(raw.generated_from, raw.rules))
    }
}

impl IndexDocument {
    /// Wrap collected records. `count` always mirrors `rules.len()`.
    pub fn new(generated_from: impl Into<String>, rules: Vec<RuleRecord>) -> Self {
        Self {
            generated_from: generated_from.into(),
            count: rules.len(),
            rules,
        }
    }

    /// Absolute path of the scanned directory.
    pub fn generated_from(&self) -> &str {
        &self.generated_from
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn rules(&self) -> &[RuleRecord] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<RuleRecord> {
        self.rules
    }
}
