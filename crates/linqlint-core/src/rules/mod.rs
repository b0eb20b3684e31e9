//! Rule system for code analysis
//!
//! A rule inspects a parsed file and returns diagnostics. The registry owns
//! the rule set and applies the user's disabled list and severity overrides.

pub mod guid_to_string;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::{Config, RulesConfig};
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;

pub use guid_to_string::GuidToString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub docs_url: Option<&'static str>,
    pub examples: Option<&'static str>,
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
        }
    }

    /// Registry holding every built-in rule, set up from `config`.
    pub fn with_config(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GuidToString::with_options(config.query.clone())));
        registry.configure(&config.rules);
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.disabled_rules.clear();
        self.severity_overrides.clear();

        for rule_ref in &config.disabled {
            self.disabled_rules.insert(rule_ref.clone());
        }

        for (rule_ref, severity_value) in &config.severity {
            self.severity_overrides
                .insert(rule_ref.clone(), (*severity_value).into());
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn run_all(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .filter(|rule| !self.is_rule_disabled(rule.metadata()))
            .flat_map(|rule| {
                let mut diagnostics = rule.check(file);
                self.apply_severity_overrides(rule.as_ref(), &mut diagnostics);
                diagnostics
            })
            .collect()
    }

    fn is_rule_disabled(&self, metadata: &RuleMetadata) -> bool {
        self.disabled_rules.contains(metadata.id) || self.disabled_rules.contains(metadata.name)
    }

    fn apply_severity_overrides(&self, rule: &dyn Rule, diagnostics: &mut [Diagnostic]) {
        let metadata = rule.metadata();

        let override_severity = self
            .severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = override_severity {
            for diag in diagnostics.iter_mut() {
                diag.severity = *severity;
            }
        }
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        self.find_rule(id_or_name)
            .is_some_and(|rule| !self.is_rule_disabled(rule.metadata()))
    }

    /// Looks a rule up by id first, then by name.
    pub fn find_rule(&self, id_or_name: &str) -> Option<&dyn Rule> {
        self.get_rule(id_or_name)
            .or_else(|| self.get_rule_by_name(id_or_name))
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().id == id)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeverityValue;

    struct TestRule {
        metadata: RuleMetadata,
        diagnostics_to_return: Vec<Diagnostic>,
    }

    impl TestRule {
        fn new(id: &'static str) -> Self {
            Self {
                metadata: RuleMetadata {
                    id,
                    name: "test-rule",
                    description: "A test rule",
                    severity: Severity::Warning,
                    docs_url: None,
                    examples: None,
                },
                diagnostics_to_return: Vec::new(),
            }
        }

        fn with_name(mut self, name: &'static str) -> Self {
            self.metadata.name = name;
            self
        }

        fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
            self.diagnostics_to_return.push(diagnostic);
            self
        }
    }

    impl Rule for TestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile) -> Vec<Diagnostic> {
            self.diagnostics_to_return.clone()
        }
    }

    fn warning(rule_id: &str, line: usize) -> Diagnostic {
        Diagnostic::new(rule_id, Severity::Warning, "Issue", "test.js", line, 1)
    }

    fn file() -> ParsedFile {
        ParsedFile::from_source("test.js", "const x = 1;\nconst y = 2;")
    }

    #[test]
    fn default_registry_holds_builtin_rules() {
        let registry = RuleRegistry::default();

        assert_eq!(registry.len(), 1);
        assert!(registry.get_rule("P001").is_some());
        assert!(registry.get_rule_by_name("no-guid-to-string").is_some());
        assert!(registry.is_rule_enabled("P001"));
    }

    #[test]
    fn run_all_collects_diagnostics_in_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(
            TestRule::new("T001").with_diagnostic(warning("T001", 1)),
        ));
        registry.register(Box::new(
            TestRule::new("T002").with_diagnostic(warning("T002", 2)),
        ));

        let diagnostics = registry.run_all(&file());

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].rule_id, "T001");
        assert_eq!(diagnostics[1].rule_id, "T002");
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(
            TestRule::new("T001").with_diagnostic(warning("T001", 1)),
        ));
        registry.register(Box::new(
            TestRule::new("T002")
                .with_name("second")
                .with_diagnostic(warning("T002", 2)),
        ));
        registry.configure(&RulesConfig {
            disabled: vec!["second".to_string()],
            ..Default::default()
        });

        let diagnostics = registry.run_all(&file());

        assert_eq!(diagnostics.len(), 1);
        assert!(registry.is_rule_enabled("T001"));
        assert!(!registry.is_rule_enabled("T002"));
        assert!(!registry.is_rule_enabled("second"));
    }

    #[test]
    fn severity_override_by_name() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(
            TestRule::new("T001").with_diagnostic(warning("T001", 1)),
        ));
        let mut config = RulesConfig::default();
        config
            .severity
            .insert("test-rule".to_string(), SeverityValue::Error);
        registry.configure(&config);

        let diagnostics = registry.run_all(&file());

        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn configure_replaces_previous_settings() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.configure(&RulesConfig {
            disabled: vec!["T001".to_string()],
            ..Default::default()
        });
        registry.configure(&RulesConfig::default());

        assert!(registry.is_rule_enabled("T001"));
    }

    #[test]
    fn unknown_rules_are_not_enabled() {
        let registry = RuleRegistry::new();

        assert!(registry.find_rule("UNKNOWN").is_none());
        assert!(!registry.is_rule_enabled("UNKNOWN"));
        assert!(registry.is_empty());
    }

    #[test]
    fn severity_displays_lowercase() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.as_str(), "warning");
    }
}
