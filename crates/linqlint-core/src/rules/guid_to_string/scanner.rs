//! Textual scan of literal and template source for stringified identifier
//! comparisons such as `.userId.toString() === "..."`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// A dot, a field name ending in `id`, `.toString()`, a comparison operator
/// and an opening double quote, optionally followed by the comparand and its
/// closing quote.
static GUID_TO_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\.[a-z0-9]*id\.toString\(\)\s*(?:!==|===|!=|==)\s*"(?:([^"]*)")?"#)
        .expect("Invalid regex pattern")
});

/// Start of a template placeholder. Comparands containing one are not
/// literal text.
pub const PLACEHOLDER: &str = "${";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidComparison {
    /// Byte range of the whole match, starting at the leading dot.
    pub range: Range<usize>,
    /// Byte range of the quoted comparand text, when there is one.
    pub comparand: Option<Range<usize>>,
}

impl GuidComparison {
    /// The reported part of the match: everything after the leading dot.
    pub fn reported_range(&self) -> Range<usize> {
        self.range.start + 1..self.range.end
    }
}

/// Matches in `raw`, left to right and non-overlapping.
///
/// A comparand holding a placeholder is dropped and the match ends at the
/// opening quote; scanning resumes from there.
pub fn scan(raw: &str) -> Vec<GuidComparison> {
    let mut matches = Vec::new();
    let mut at = 0;

    while let Some(caps) = GUID_TO_STRING.captures_at(raw, at) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let found = match caps.get(1) {
            Some(comparand) if comparand.as_str().contains(PLACEHOLDER) => GuidComparison {
                range: whole.start()..comparand.start(),
                comparand: None,
            },
            comparand => GuidComparison {
                range: whole.range(),
                comparand: comparand.map(|m| m.range()),
            },
        };
        at = found.range.end;
        matches.push(found);
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched_text(raw: &str) -> Vec<&str> {
        scan(raw).into_iter().map(|m| &raw[m.range]).collect()
    }

    #[test]
    fn finds_strict_equality_with_comparand() {
        let raw = r#"'a x.id.toString() === "asdf"'"#;
        let matches = scan(raw);

        assert_eq!(matches.len(), 1);
        assert_eq!(&raw[matches[0].range.clone()], r#".id.toString() === "asdf""#);
        assert_eq!(&raw[matches[0].comparand.clone().unwrap()], "asdf");
        assert_eq!(
            &raw[matches[0].reported_range()],
            r#"id.toString() === "asdf""#
        );
    }

    #[test]
    fn accepts_every_comparison_operator() {
        for op in ["==", "===", "!=", "!=="] {
            let raw = format!(r#"'x.id.toString() {op} "a"'"#);
            assert_eq!(scan(&raw).len(), 1, "operator {op}");
        }
    }

    #[test]
    fn whitespace_around_operator_is_optional() {
        assert_eq!(
            matched_text(r#"'x.id.toString()==="a"'"#),
            vec![r#".id.toString()==="a""#]
        );
    }

    #[test]
    fn field_prefix_and_case_are_flexible() {
        assert_eq!(scan(r#"'u.userId.toString() === "a"'"#).len(), 1);
        assert_eq!(scan(r#"'u.ORDERID.TOSTRING() == "a"'"#).len(), 1);
        assert_eq!(scan(r#"'u.id2.toString() == "a"'"#).len(), 0);
    }

    #[test]
    fn two_patterns_do_not_overlap() {
        let raw = r#"'a.id.toString() === "1" and b.ownerId.toString() != "2"'"#;
        let matches = scan(raw);

        assert_eq!(matches.len(), 2);
        assert!(matches[0].range.end <= matches[1].range.start);
        assert_eq!(&raw[matches[1].comparand.clone().unwrap()], "2");
    }

    #[test]
    fn placeholder_comparand_stops_at_the_quote() {
        let raw = r#"`a x.id.toString() === "${text}" asdf`"#;
        let matches = scan(raw);

        assert_eq!(matches.len(), 1);
        assert!(matches[0].comparand.is_none());
        assert!(raw[matches[0].range.clone()].ends_with("=== \""));
    }

    #[test]
    fn placeholder_after_text_drops_the_comparand() {
        let raw = r#"`x.id.toString() == "a-${v}" and y.ownerId.toString() == "${w}"`"#;
        let matches = scan(raw);

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.comparand.is_none()));
        assert_eq!(&raw[matches[0].range.clone()], r#".id.toString() == ""#);
        assert_eq!(&raw[matches[1].range.clone()], r#".ownerId.toString() == ""#);
    }

    #[test]
    fn dollar_sign_is_plain_comparand_text() {
        let raw = r#"'x.id.toString() === "a$b"'"#;
        let matches = scan(raw);

        assert_eq!(matches.len(), 1);
        assert_eq!(&raw[matches[0].comparand.clone().unwrap()], "a$b");
        assert!(raw[matches[0].range.clone()].ends_with(r#""a$b""#));
    }

    #[test]
    fn match_inside_placeholder_comparand_is_still_found() {
        let raw = r#"`a.id.toString() == "${x}.bId.toString() == "`"#;
        let matches = scan(raw);

        assert_eq!(matches.len(), 2);
        assert_eq!(&raw[matches[1].range.clone()], r#".bId.toString() == ""#);
    }

    #[test]
    fn unterminated_comparand_is_absent() {
        let matches = scan(r#"'x.id.toString() === "abc'"#);

        assert_eq!(matches.len(), 1);
        assert!(matches[0].comparand.is_none());
    }

    #[test]
    fn requires_double_quoted_comparand() {
        assert!(scan(r#""x.id.toString() === 'a'""#).is_empty());
        assert!(scan("'x.id.toString() === other'").is_empty());
        assert!(scan("'x.id.toString()'").is_empty());
    }
}
