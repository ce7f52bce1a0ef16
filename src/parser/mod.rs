//! Line-oriented extraction of rule metadata.
//!
//! Rule files are not run through a YAML parser. Each front-matter field is
//! matched by its own pattern against trimmed lines, and values go through
//! the same comment and quote handling everywhere.

pub mod logsource;

use once_cell::sync::Lazy;
use regex::Regex;

pub use logsource::extract_logsource;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^title:\s*(.+)$").unwrap());
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^id:\s*(.+)$").unwrap());
static STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^status:\s*(.+)$").unwrap());
static LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^level:\s*(.+)$").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^date:\s*(.+)$").unwrap());
static MODIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^modified:\s*(.+)$").unwrap());

/// A top-level scalar field of a rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Id,
    Status,
    Level,
    Date,
    Modified,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Id,
        Field::Status,
        Field::Level,
        Field::Date,
        Field::Modified,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Id => "id",
            Self::Status => "status",
            Self::Level => "level",
            Self::Date => "date",
            Self::Modified => "modified",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Title => &TITLE_RE,
            Self::Id => &ID_RE,
            Self::Status => &STATUS_RE,
            Self::Level => &LEVEL_RE,
            Self::Date => &DATE_RE,
            Self::Modified => &MODIFIED_RE,
        }
    }
}

/// Return the value of `field` from the first line that matches it.
///
/// Lines are trimmed before matching, so indented keys count too. Returns
/// an empty string when no line matches.
pub fn extract_field(field: Field, text: &str) -> String {
    for line in split_lines(text) {
        if let Some(cap) = field.pattern().captures(line.trim()) {
            let value = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            return clean_value(value);
        }
    }
    String::new()
}

/// Split `text` into lines without their terminators.
///
/// Breaks on `\n`, `\r\n` and a lone `\r`, as well as vertical tab, form
/// feed, the `\x1c`..`\x1e` separators, NEL and the Unicode line and
/// paragraph separators. A trailing terminator does not produce an empty
/// last line.
pub fn split_lines<'a>(text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|&(_, ch)| is_line_break(ch)) {
            Some((idx, ch)) => {
                let line = &rest[..idx];
                let mut next = idx + ch.len_utf8();
                if ch == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Comment-strip and unquote a raw captured value.
pub(crate) fn clean_value(raw: &str) -> String {
    let value = strip_inline_comment(raw.trim());
    unquote(value).to_string()
}

/// Cut a trailing `# comment` off a value.
///
/// A `#` inside a quoted run does not start a comment. A run is opened by
/// `"` or `'` and only closed by the same character; an unterminated run
/// extends to the end of the value.
pub fn strip_inline_comment(value: &str) -> &str {
    let mut open_quote: Option<char> = None;

    for (idx, ch) in value.char_indices() {
        match ch {
            '"' | '\'' => match open_quote {
                None => open_quote = Some(ch),
                Some(q) if q == ch => open_quote = None,
                Some(_) => {}
            },
            '#' if open_quote.is_none() => return value[..idx].trim_end(),
            _ => {}
        }
    }

    value.trim()
}

/// Remove one pair of matching surrounding quotes, if present.
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_plain_comment() {
        assert_eq!(strip_inline_comment("a # b"), "a");
        assert_eq!(strip_inline_comment("value # trailing"), "value");
    }

    #[test]
    fn quoted_hash_is_not_a_comment() {
        assert_eq!(strip_inline_comment(r#""a # b" # c"#), r#""a # b""#);
        assert_eq!(strip_inline_comment("'a # b'"), "'a # b'");
    }

    #[test]
    fn unterminated_quote_swallows_hash() {
        assert_eq!(
            strip_inline_comment(r#"a "open # no close"#),
            r#"a "open # no close"#
        );
        assert_eq!(
            strip_inline_comment(r#"a "quote without close # not a comment"#),
            r#"a "quote without close # not a comment"#
        );
    }

    #[test]
    fn mismatched_quote_inside_run_is_inert() {
        // The single quote neither opens nor closes while the double-quoted run is open.
        assert_eq!(strip_inline_comment(r#""it's # here" # gone"#), r#""it's # here""#);
        // Here the apostrophe opens a run that never closes.
        assert_eq!(strip_inline_comment("it's # kept"), "it's # kept");
    }

    #[test]
    fn leading_hash_yields_empty() {
        assert_eq!(strip_inline_comment("# only a comment"), "");
    }

    #[test]
    fn unquote_removes_one_matching_pair() {
        assert_eq!(unquote(r#""Beta""#), "Beta");
        assert_eq!(unquote("'Beta'"), "Beta");
        assert_eq!(unquote(r#"""nested"""#), r#""nested""#);
        assert_eq!(unquote(r#""mixed'"#), r#""mixed'"#);
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn extracts_each_field() {
        let text = "title: Alpha\nid: 1234\nstatus: stable\nlevel: high\ndate: 2023-01-01\nmodified: 2024/02/03\n";
        let values: Vec<String> = Field::ALL.iter().map(|f| extract_field(*f, text)).collect();
        assert_eq!(
            values,
            vec!["Alpha", "1234", "stable", "high", "2023-01-01", "2024/02/03"]
        );
    }

    #[test]
    fn every_pattern_matches_its_own_key() {
        for field in Field::ALL {
            let line = format!("{}: value", field.key());
            assert_eq!(extract_field(field, &line), "value", "{field:?}");
        }
    }

    #[test]
    fn first_match_wins() {
        let text = "title: First\ndescription: x\ntitle: Second\n";
        assert_eq!(extract_field(Field::Title, text), "First");
    }

    #[test]
    fn key_match_is_case_insensitive_and_ignores_indent() {
        assert_eq!(extract_field(Field::Title, "  TITLE: Loud\n"), "Loud");
        assert_eq!(extract_field(Field::Level, "Level: medium"), "medium");
    }

    #[test]
    fn missing_field_is_empty() {
        assert_eq!(extract_field(Field::Modified, "title: x\n"), "");
        assert_eq!(extract_field(Field::Title, ""), "");
    }

    #[test]
    fn bare_key_is_skipped_for_a_later_value() {
        // `title:` alone has nothing to capture, so the search continues.
        assert_eq!(extract_field(Field::Title, "title:\ntitle: Later\n"), "Later");
    }

    #[test]
    fn comment_only_value_is_empty() {
        assert_eq!(extract_field(Field::Status, "status: # todo\nstatus: test\n"), "");
    }

    #[test]
    fn quoted_value_keeps_hash() {
        assert_eq!(
            extract_field(Field::Title, r#"title: "Beta # not comment""#),
            "Beta # not comment"
        );
        assert_eq!(
            extract_field(Field::Title, r#"title: "a # b" # real comment"#),
            "a # b"
        );
    }

    #[test]
    fn prefix_keys_do_not_match() {
        assert_eq!(extract_field(Field::Id, "identifier: nope\n"), "");
        assert_eq!(extract_field(Field::Date, "dates: nope\n"), "");
    }

    #[test]
    fn crlf_lines() {
        let text = "title: Windows\r\nlevel: low\r\n";
        assert_eq!(extract_field(Field::Title, text), "Windows");
        assert_eq!(extract_field(Field::Level, text), "low");
    }

    #[test]
    fn split_lines_breaks_on_every_terminator() {
        let lines: Vec<&str> = split_lines("a\nb\r\nc\rd\x0be\x0cf\u{85}g\u{2028}h\u{2029}i\x1cj").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
    }

    #[test]
    fn split_lines_edges() {
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("a\n").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(split_lines("a\n\nb").collect::<Vec<_>>(), vec!["a", "", "b"]);
        assert_eq!(split_lines("\r\r\n").collect::<Vec<_>>(), vec!["", ""]);
        assert_eq!(split_lines("no break").collect::<Vec<_>>(), vec!["no break"]);
    }

    #[test]
    fn carriage_return_only_file() {
        let text = "title: Alpha\rid: 1\rlogsource:\r  product: windows\r";
        assert_eq!(extract_field(Field::Title, text), "Alpha");
        assert_eq!(extract_field(Field::Id, text), "1");
    }

    proptest! {
        #[test]
        fn hash_free_values_are_only_trimmed(value in "[a-zA-Z0-9 '\"_.-]{0,40}") {
            prop_assert_eq!(strip_inline_comment(&value), value.trim());
        }

        #[test]
        fn stripped_value_is_a_prefix(value in "\\PC{0,40}") {
            let stripped = strip_inline_comment(&value);
            prop_assert!(value.trim_start().starts_with(stripped.trim_start()));
        }
    }
}
