use once_cell::sync::Lazy;
use regex::Regex;

use super::{clean_value, split_lines};
use crate::model::Logsource;

static LOGSOURCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^logsource:\s*$").unwrap());

static INDENTED_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{2,}([A-Za-z0-9_]+):\s*(.+)$").unwrap());

/// Extract the first `logsource:` block of a rule.
///
/// The block starts after a bare `logsource:` line and runs until the first
/// non-blank line indented by fewer than two spaces. Every indented
/// `key: value` line inside it lands in `raw`. For `product`, `category`
/// and `service` the last occurrence wins, unlike front-matter fields.
pub fn extract_logsource(text: &str) -> Logsource {
    let mut logsource = Logsource::default();
    let mut lines = split_lines(text);

    if !lines.any(|line| LOGSOURCE_RE.is_match(line.trim())) {
        return logsource;
    }

    let mut pairs: Vec<String> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with("  ") {
            break;
        }
        let Some(cap) = INDENTED_FIELD_RE.captures(line) else {
            continue;
        };
        let key = &cap[1];
        let value = clean_value(&cap[2]);
        pairs.push(format!("{key}:{value}"));

        match key {
            "product" => logsource.product = value,
            "category" => logsource.category = value,
            "service" => logsource.service = value,
            _ => {}
        }
    }

    logsource.raw = pairs.join(", ");
    logsource
}
