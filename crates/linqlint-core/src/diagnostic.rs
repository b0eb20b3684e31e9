//! Diagnostic reporting for analysis results
//!
//! Positions are 1-based lines and character columns. End positions are
//! exclusive: `end_column` points one past the last covered character.

use crate::rules::Severity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixKind {
    ReplaceWith { new_text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub title: String,
    pub kind: FixKind,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Fix {
    pub fn replace(
        title: impl Into<String>,
        new_text: impl Into<String>,
        line: usize,
        column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self {
            title: title.into(),
            kind: FixKind::ReplaceWith {
                new_text: new_text.into(),
            },
            line,
            column,
            end_line,
            end_column,
        }
    }

    pub fn new_text(&self) -> &str {
        match &self.kind {
            FixKind::ReplaceWith { new_text } => new_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub suggestion: Option<String>,
    pub fixes: Vec<Fix>,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            file: file.into(),
            line,
            column,
            end_line: line,
            end_column: column,
            suggestion: None,
            fixes: Vec::new(),
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn with_fixes(mut self, fixes: impl IntoIterator<Item = Fix>) -> Self {
        self.fixes.extend(fixes);
        self
    }

    pub fn has_fix(&self) -> bool {
        !self.fixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_diagnostic_is_a_point_range() {
        let diag = Diagnostic::new("P001", Severity::Warning, "msg", "a.js", 3, 7);

        assert_eq!((diag.end_line, diag.end_column), (3, 7));
        assert!(diag.suggestion.is_none());
        assert!(!diag.has_fix());
    }

    #[test]
    fn builder_sets_range_and_fix() {
        let fix = Fix::replace("Replace", "x", 1, 2, 1, 4);
        let diag = Diagnostic::new("P001", Severity::Warning, "msg", "a.js", 1, 2)
            .with_end(1, 4)
            .with_suggestion("do this")
            .with_fix(fix.clone());

        assert_eq!(diag.end_column, 4);
        assert_eq!(diag.suggestion.as_deref(), Some("do this"));
        assert_eq!(diag.fixes, vec![fix]);
        assert_eq!(diag.fixes[0].new_text(), "x");
    }
}
