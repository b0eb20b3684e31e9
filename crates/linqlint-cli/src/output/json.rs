//! JSON output formatter for diagnostic display

use linqlint_core::diagnostic::{Diagnostic, Fix, FixKind};
use linqlint_core::rules::{RuleRegistry, Severity};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Serialize)]
pub struct JsonOutput {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub linqlint_version: &'static str,
    pub working_directory: String,
    pub analyzed_path: String,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_diagnostics: usize,
    pub fixable: usize,
    pub by_severity: SeverityCounts,
}

#[derive(Serialize, Default)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub hint: usize,
}

#[derive(Serialize)]
pub struct JsonDiagnostic {
    pub rule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    pub severity: String,
    pub message: String,
    pub location: JsonLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<JsonFix>,
}

#[derive(Serialize)]
pub struct JsonLocation {
    pub file: String,
    pub start: JsonPosition,
    pub end: JsonPosition,
}

#[derive(Serialize)]
pub struct JsonPosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Serialize)]
pub struct JsonFix {
    pub title: String,
    pub kind: &'static str,
    pub start: JsonPosition,
    pub end: JsonPosition,
    pub new_text: String,
}

pub struct JsonFormatter<'a> {
    registry: Option<&'a RuleRegistry>,
}

impl<'a> JsonFormatter<'a> {
    pub fn new() -> Self {
        Self { registry: None }
    }

    pub fn with_registry(registry: &'a RuleRegistry) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    pub fn format(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
    ) -> String {
        let output = self.build_output(diagnostics, total_files, analyzed_path);
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn build_output(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
    ) -> JsonOutput {
        JsonOutput {
            version: "1.0",
            metadata: build_metadata(analyzed_path),
            summary: build_summary(diagnostics, total_files),
            diagnostics: diagnostics
                .iter()
                .map(|d| self.convert_diagnostic(d))
                .collect(),
        }
    }

    fn convert_diagnostic(&self, diag: &Diagnostic) -> JsonDiagnostic {
        JsonDiagnostic {
            rule_id: diag.rule_id.clone(),
            rule_name: self.rule_name(&diag.rule_id),
            severity: diag.severity.as_str().to_string(),
            message: diag.message.clone(),
            location: JsonLocation {
                file: diag.file.clone(),
                start: JsonPosition {
                    line: diag.line,
                    column: diag.column,
                },
                end: JsonPosition {
                    line: diag.end_line,
                    column: diag.end_column,
                },
            },
            suggestion: diag.suggestion.clone(),
            fixes: diag.fixes.iter().map(convert_fix).collect(),
        }
    }

    fn rule_name(&self, rule_id: &str) -> Option<String> {
        self.registry
            .and_then(|r| r.get_rule(rule_id))
            .map(|rule| rule.metadata().name.to_string())
    }
}

impl Default for JsonFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn build_metadata(analyzed_path: &str) -> JsonMetadata {
    JsonMetadata {
        linqlint_version: env!("CARGO_PKG_VERSION"),
        working_directory: std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default(),
        analyzed_path: analyzed_path.to_string(),
    }
}

fn build_summary(diagnostics: &[Diagnostic], total_files: usize) -> JsonSummary {
    let mut by_severity = SeverityCounts::default();
    let mut files_with_issues: HashSet<&str> = HashSet::new();

    for diag in diagnostics {
        match diag.severity {
            Severity::Error => by_severity.error += 1,
            Severity::Warning => by_severity.warning += 1,
            Severity::Info => by_severity.info += 1,
            Severity::Hint => by_severity.hint += 1,
        }
        files_with_issues.insert(&diag.file);
    }

    JsonSummary {
        total_files,
        files_with_issues: files_with_issues.len(),
        total_diagnostics: diagnostics.len(),
        fixable: diagnostics.iter().filter(|d| d.has_fix()).count(),
        by_severity,
    }
}

fn convert_fix(fix: &Fix) -> JsonFix {
    let (kind, new_text) = match &fix.kind {
        FixKind::ReplaceWith { new_text } => ("replace", new_text.clone()),
    };

    JsonFix {
        title: fix.title.clone(),
        kind,
        start: JsonPosition {
            line: fix.line,
            column: fix.column,
        },
        end: JsonPosition {
            line: fix.end_line,
            column: fix.end_column,
        },
        new_text,
    }
}
