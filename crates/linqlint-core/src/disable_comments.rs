//! Inline disable comment directives for suppressing diagnostics
//!
//! Supports ESLint-style disable comments:
//! - `// linqlint-disable-next-line P001` - disable P001 for the next line
//! - `// linqlint-disable-line no-guid-to-string` - rules can be named by id or name
//! - `// linqlint-disable-next-line` - disable all rules for the next line
//! - `// linqlint-disable-next-line P001, PARSE` - disable multiple rules

use std::collections::HashMap;

const DISABLE_NEXT_LINE: &str = "linqlint-disable-next-line";
const DISABLE_LINE: &str = "linqlint-disable-line";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisableDirective {
    pub line: usize,
    pub rules: Vec<String>,
}

impl DisableDirective {
    pub fn new(line: usize, rules: Vec<String>) -> Self {
        Self { line, rules }
    }

    pub fn disables_all(&self) -> bool {
        self.rules.is_empty()
    }

    /// `rule_refs` are the identifiers a diagnostic can be addressed by,
    /// usually its rule id and rule name.
    pub fn disables_any(&self, rule_refs: &[&str]) -> bool {
        self.disables_all()
            || self
                .rules
                .iter()
                .any(|rule| rule_refs.contains(&rule.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisableDirectives {
    by_line: HashMap<usize, DisableDirective>,
}

impl DisableDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: &str) -> Self {
        let mut directives = Self::new();

        for (line_idx, line) in source.lines().enumerate() {
            let line_num = line_idx + 1;

            let Some(comment_start) = line.find("//") else {
                continue;
            };
            let comment = line[comment_start + 2..].trim();

            if let Some(rest) = comment.strip_prefix(DISABLE_NEXT_LINE) {
                directives.add(DisableDirective::new(line_num + 1, parse_rule_refs(rest)));
            } else if let Some(rest) = comment.strip_prefix(DISABLE_LINE) {
                directives.add(DisableDirective::new(line_num, parse_rule_refs(rest)));
            }
        }

        directives
    }

    /// Directives targeting the same line are merged; a bare directive wins.
    pub fn add(&mut self, directive: DisableDirective) {
        match self.by_line.get_mut(&directive.line) {
            Some(existing) if existing.disables_all() => {}
            Some(existing) if directive.disables_all() => existing.rules.clear(),
            Some(existing) => existing.rules.extend(directive.rules),
            None => {
                self.by_line.insert(directive.line, directive);
            }
        }
    }

    pub fn is_disabled(&self, line: usize, rule_refs: &[&str]) -> bool {
        self.by_line
            .get(&line)
            .is_some_and(|d| d.disables_any(rule_refs))
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.len()
    }
}

fn parse_rule_refs(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_next_line_with_specific_rule() {
        let source = r#"
// linqlint-disable-next-line P001
linq.execute(q);
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled(3, &["P001"]));
        assert!(!directives.is_disabled(3, &["PARSE"]));
        assert!(!directives.is_disabled(2, &["P001"]));
    }

    #[test]
    fn disable_line_matches_rule_name() {
        let source = "linq.execute(q); // linqlint-disable-line no-guid-to-string";
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled(1, &["P001", "no-guid-to-string"]));
    }

    #[test]
    fn bare_directive_disables_everything() {
        let source = "// linqlint-disable-next-line\nlinq.execute(q);";
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled(2, &["P001"]));
        assert!(directives.is_disabled(2, &["PARSE"]));
    }

    #[test]
    fn multiple_rules_are_comma_separated() {
        let source = "// linqlint-disable-next-line P001, PARSE\nlinq.execute(q);";
        let directives = DisableDirectives::from_source(source);

        assert_eq!(directives.len(), 1);
        assert!(directives.is_disabled(2, &["P001"]));
        assert!(directives.is_disabled(2, &["PARSE"]));
    }

    #[test]
    fn directives_for_the_same_line_are_merged() {
        let source = "// linqlint-disable-next-line P001\nlinq.execute(q); // linqlint-disable-line PARSE";
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled(2, &["P001"]));
        assert!(directives.is_disabled(2, &["PARSE"]));
    }

    #[test]
    fn plain_comments_are_ignored() {
        let directives = DisableDirectives::from_source("// run the query\nlinq.execute(q);");

        assert!(directives.is_empty());
    }
}
