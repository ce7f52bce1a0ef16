//! Directory walk and per-file record assembly.

pub mod filter;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::RuleRecord;
use crate::parser::{self, Field};

pub use filter::{ScanFilter, DEFAULT_EXCLUDES};

/// Walk `source_dir` and build a record for every accepted rule file.
///
/// The whole listing is sorted once before filtering, so records come out
/// in path order. Unreadable entries and files are skipped without error.
pub fn collect_rules(source_dir: &Path, filter: &ScanFilter) -> Vec<RuleRecord> {
    let mut paths: Vec<PathBuf> = WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(filter.follow_links())
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect();
    paths.sort();

    let mut rules = Vec::new();
    for path in paths {
        if path.is_dir() || !filter.accepts(&path) {
            continue;
        }

        let content = match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };

        let relative = path.strip_prefix(source_dir).unwrap_or(&path);
        let record = build_record(relative, content);
        tracing::debug!(
            path = %record.path,
            has_logsource = !record.logsource.is_empty(),
            "indexed rule"
        );
        rules.push(record);
    }

    rules
}

/// Extract every field of a rule from its text.
pub fn build_record(relative_path: &Path, content: String) -> RuleRecord {
    let [title, id, status, level, date, modified] =
        Field::ALL.map(|field| parser::extract_field(field, &content));

    RuleRecord {
        path: relative_path.to_string_lossy().into_owned(),
        title,
        id,
        status,
        level,
        date,
        modified,
        logsource: parser::extract_logsource(&content),
        yaml: content,
    }
}
