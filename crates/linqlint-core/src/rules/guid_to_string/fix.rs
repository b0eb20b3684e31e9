//! Rewrites `id.toString() === "v"` into `id === new Guid("v")`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::scanner::PLACEHOLDER;

static REWRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^([a-z0-9]*id)\.toString\(\)(\s*)(!==|===|!=|==)(\s*)"([^"]*)"$"#)
        .expect("Invalid regex pattern")
});

/// Replacement for the reported text of a match (the match without its
/// leading dot), or `None` when no safe rewrite exists.
pub fn rewrite(matched: &str) -> Option<String> {
    if matched.contains(PLACEHOLDER) {
        return None;
    }
    match REWRITE.replace(matched, r#"${1}${2}${3}${4}new Guid("${5}")"#) {
        Cow::Borrowed(_) => None,
        Cow::Owned(replaced) => Some(replaced),
    }
}
