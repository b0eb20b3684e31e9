//! Pretty formatter for human-readable terminal output
//!
//! Displays diagnostics with colors, the offending source line, and a summary.

use colored::{ColoredString, Colorize};
use linqlint_core::diagnostic::Diagnostic;
use linqlint_core::rules::Severity;
use std::collections::HashMap;

pub struct PrettyFormatter {
    sources: HashMap<String, String>,
}

impl PrettyFormatter {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn with_sources(sources: HashMap<String, String>) -> Self {
        Self { sources }
    }

    pub fn format(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if !diagnostics.is_empty() {
            output.push_str(&format_summary(diagnostics));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{}[{}]: {}",
            colorize_severity(&diag.severity),
            diag.rule_id.dimmed(),
            diag.message
        ));
        lines.push(format!(
            "  {} {}:{}:{}",
            "-->".blue(),
            diag.file,
            diag.line,
            diag.column
        ));

        let padding = " ".repeat(diag.line.to_string().len());

        if let Some(source_line) = self.source_line(&diag.file, diag.line) {
            lines.push(format!("{} {}", padding, "|".blue()));
            lines.push(format!(
                "{} {} {}",
                diag.line.to_string().blue(),
                "|".blue(),
                source_line
            ));

            // Multi-line ranges underline to the end of the first line.
            let line_width = source_line.chars().count() + 1;
            let end_column = if diag.end_line == diag.line {
                diag.end_column
            } else {
                line_width
            };
            let caret_len = end_column.saturating_sub(diag.column).max(1);
            lines.push(format!(
                "{} {} {}{}",
                padding,
                "|".blue(),
                " ".repeat(diag.column.saturating_sub(1)),
                "^".repeat(caret_len).red()
            ));
            lines.push(format!("{} {}", padding, "|".blue()));
        }

        if let Some(suggestion) = &diag.suggestion {
            lines.push(format!(
                "{} {} {} {}",
                padding,
                "=".blue(),
                "suggestion:".green(),
                suggestion
            ));
        }

        for fix in &diag.fixes {
            lines.push(format!(
                "{} {} {} {}: `{}`",
                padding,
                "=".blue(),
                "fix:".green(),
                fix.title,
                fix.new_text()
            ));
        }

        lines.join("\n")
    }

    fn source_line(&self, file: &str, line: usize) -> Option<&str> {
        self.sources
            .get(file)?
            .lines()
            .nth(line.checked_sub(1)?)
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn colorize_severity(severity: &Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
        Severity::Hint => "hint".cyan().bold(),
    }
}

fn format_summary(diagnostics: &[Diagnostic]) -> String {
    let error_count = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, Severity::Error))
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, Severity::Warning))
        .count();
    let fixable = diagnostics.iter().filter(|d| d.has_fix()).count();
    let total = diagnostics.len();

    let errors_str = if error_count == 1 {
        format!("{} error", error_count)
    } else {
        format!("{} errors", error_count)
    };
    let warnings_str = if warning_count == 1 {
        format!("{} warning", warning_count)
    } else {
        format!("{} warnings", warning_count)
    };
    let problems_str = if total == 1 { "problem" } else { "problems" };

    let mut summary = format!(
        "\nFound {} {} ({}, {})\n",
        total.to_string().bold(),
        problems_str,
        errors_str.red(),
        warnings_str.yellow()
    );
    if fixable > 0 {
        summary.push_str(&format!(
            "{} fixable with the `--fix` option\n",
            fixable.to_string().bold()
        ));
    }
    summary
}
