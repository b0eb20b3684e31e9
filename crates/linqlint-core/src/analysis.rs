//! Analysis engine for code analysis and diagnostic generation
//!
//! Provides the core analysis functionality for the CLI and other consumers.

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::rules::{RuleRegistry, Severity};

pub const PARSE_RULE_ID: &str = "PARSE";

pub struct AnalysisEngine {
    registry: RuleRegistry,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            registry: RuleRegistry::with_config(config),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Parse errors and rule findings for `file`, minus anything silenced by
    /// an inline disable comment, ordered by position.
    pub fn analyze(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let disable_directives = file.disable_directives();
        let filename = &file.metadata().filename;

        let parse_diagnostics = file.errors().iter().map(|error| {
            Diagnostic::new(
                PARSE_RULE_ID,
                Severity::Error,
                &error.message,
                filename,
                error.line,
                error.column,
            )
        });

        let mut diagnostics: Vec<Diagnostic> = parse_diagnostics
            .chain(self.registry.run_all(file))
            .filter(|diagnostic| {
                let rule_refs = self.rule_refs(&diagnostic.rule_id);
                !disable_directives.is_disabled(diagnostic.line, &rule_refs)
            })
            .collect();

        diagnostics.sort_by(|a, b| {
            (a.line, a.column, a.end_line, a.end_column).cmp(&(
                b.line,
                b.column,
                b.end_line,
                b.end_column,
            ))
        });

        tracing::debug!(
            filename = %filename,
            count = diagnostics.len(),
            "analyzed file"
        );
        diagnostics
    }

    /// Every name a diagnostic's rule can be addressed by in a disable comment.
    fn rule_refs<'r>(&'r self, rule_id: &'r str) -> Vec<&'r str> {
        match self.registry.get_rule(rule_id) {
            Some(rule) => vec![rule.metadata().id, rule.metadata().name],
            None => vec![rule_id],
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QueryConfig, RulesConfig};

    fn make_parsed_file(filename: &str, content: &str) -> ParsedFile {
        ParsedFile::from_source(filename, content)
    }

    const FLAGGED: &str = r#"linq.execute('x.id.toString() === "a"');"#;

    #[test]
    fn analyze_reports_rule_findings() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", FLAGGED);

        let diagnostics = engine.analyze(&file);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "P001");
    }

    #[test]
    fn syntax_errors_become_diagnostics() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", "const = ;");

        let diagnostics = engine.analyze(&file);

        assert!(
            diagnostics
                .iter()
                .any(|d| d.rule_id == PARSE_RULE_ID && d.severity == Severity::Error),
            "Expected PARSE diagnostic for syntax error"
        );
    }

    #[test]
    fn disable_next_line_by_id_suppresses_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", &format!("// linqlint-disable-next-line P001\n{FLAGGED}"));

        assert!(engine.analyze(&file).is_empty());
    }

    #[test]
    fn disable_line_by_name_suppresses_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.js",
            &format!("{FLAGGED} // linqlint-disable-line no-guid-to-string"),
        );

        assert!(engine.analyze(&file).is_empty());
    }

    #[test]
    fn disabling_another_rule_keeps_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", &format!("// linqlint-disable-next-line PARSE\n{FLAGGED}"));

        assert_eq!(engine.analyze(&file).len(), 1);
    }

    #[test]
    fn config_can_disable_and_retarget() {
        let config = Config {
            query: QueryConfig::default(),
            rules: RulesConfig {
                disabled: vec!["no-guid-to-string".to_string()],
                ..Default::default()
            },
        };
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.js", FLAGGED);

        assert!(engine.analyze(&file).is_empty());
        assert!(!engine.registry().is_rule_enabled("P001"));
    }

    #[test]
    fn diagnostics_are_sorted_by_position() {
        let engine = AnalysisEngine::new();
        let code = r#"
const late = 'b.id.toString() == "2"';
const early = 'a.id.toString() == "1"';
linq.execute(early + late);
"#;
        let file = make_parsed_file("test.js", code);

        let lines: Vec<usize> = engine.analyze(&file).iter().map(|d| d.line).collect();

        assert_eq!(lines, vec![2, 3]);
    }
}
