//! Check command - analyzes JavaScript/TypeScript files for stringified Guid comparisons

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use linqlint_core::analysis::AnalysisEngine;
use linqlint_core::config::load_config_or_default_with_warnings;
use linqlint_core::diagnostic::Diagnostic;
use linqlint_core::fixer::apply_fixes;
use linqlint_core::parser::ParsedFile;
use linqlint_core::rules::Severity;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];
const FORMATS: &[&str] = &["pretty", "text", "json"];

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to file or directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for diagnostics (pretty, text, json)
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Rewrite files in place with every available fix
    #[arg(long)]
    pub fix: bool,

    /// Fail on warnings (exit code 1)
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Outcome of analyzing one file.
struct FileReport {
    path: String,
    source: String,
    diagnostics: Vec<Diagnostic>,
    fixed: usize,
}

/// Totals the exit status is decided from.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixed: usize,
}

impl CheckSummary {
    pub fn should_fail(&self, fail_on_warnings: bool) -> bool {
        self.errors > 0 || (fail_on_warnings && self.warnings > 0)
    }
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        let summary = self.execute()?;
        if summary.should_fail(self.fail_on_warnings) {
            process::exit(1);
        }
        Ok(())
    }

    fn execute(&self) -> Result<CheckSummary> {
        self.configure_colors();
        self.validate_format()?;

        let config_result = load_config_or_default_with_warnings(&self.path);
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        let config = config_result.config;

        let files = discover_files(&self.path)?;
        if files.is_empty() {
            println!("No JavaScript/TypeScript files found.");
            return Ok(CheckSummary::default());
        }

        let engine = AnalysisEngine::with_config(&config);
        tracing::debug!(files = files.len(), fix = self.fix, "starting analysis");

        let reports: Vec<FileReport> = files
            .par_iter()
            .map(|file| check_file(&engine, file, self.fix))
            .collect::<Result<Vec<Option<FileReport>>>>()?
            .into_iter()
            .flatten()
            .collect();

        let fixed = reports.iter().map(|r| r.fixed).sum();
        let sources: HashMap<String, String> = reports
            .iter()
            .map(|r| (r.path.clone(), r.source.clone()))
            .collect();
        let diagnostics: Vec<Diagnostic> = reports
            .into_iter()
            .flat_map(|r| r.diagnostics)
            .collect();

        let summary = CheckSummary {
            files: files.len(),
            errors: count_severity(&diagnostics, Severity::Error),
            warnings: count_severity(&diagnostics, Severity::Warning),
            fixed,
        };

        let analyzed_path = self.path.to_string_lossy();
        match self.format.as_str() {
            "json" => self.output_json(&diagnostics, &engine, summary.files, &analyzed_path),
            "text" => self.output_text(&diagnostics),
            _ => self.output_pretty(&diagnostics, sources),
        }

        if self.fix && self.format != "json" && fixed > 0 {
            println!("{} Fixed {} problem(s)", "✓".green().bold(), fixed);
        }

        Ok(summary)
    }

    fn validate_format(&self) -> Result<()> {
        if !FORMATS.contains(&self.format.as_str()) {
            anyhow::bail!(
                "Invalid format '{}'. Valid values: {}",
                self.format,
                FORMATS.join(", ")
            );
        }
        Ok(())
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }

    fn output_text(&self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".blue().bold(),
                Severity::Hint => "hint".cyan().bold(),
            };

            println!(
                "{}:{}:{}: {} [{}]: {}",
                diag.file,
                diag.line,
                diag.column,
                severity_str,
                diag.rule_id.dimmed(),
                diag.message
            );

            if let Some(suggestion) = &diag.suggestion {
                println!("  {} {}", "suggestion:".green(), suggestion);
            }
        }

        if !diagnostics.is_empty() {
            println!();
            println!(
                "Found {} error(s) and {} warning(s)",
                count_severity(diagnostics, Severity::Error),
                count_severity(diagnostics, Severity::Warning)
            );
        }
    }

    fn output_json(
        &self,
        diagnostics: &[Diagnostic],
        engine: &AnalysisEngine,
        total_files: usize,
        analyzed_path: &str,
    ) {
        let formatter = JsonFormatter::with_registry(engine.registry());
        println!(
            "{}",
            formatter.format(diagnostics, total_files, analyzed_path)
        );
    }

    fn output_pretty(&self, diagnostics: &[Diagnostic], sources: HashMap<String, String>) {
        let formatter = PrettyFormatter::with_sources(sources);
        print!("{}", formatter.format(diagnostics));
    }
}

/// Analyzes one file, applying fixes first when `fix` is set. Unreadable
/// files are skipped.
fn check_file(engine: &AnalysisEngine, path: &Path, fix: bool) -> Result<Option<FileReport>> {
    let name = path.to_string_lossy().to_string();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(file = %name, error = %e, "skipping unreadable file");
            return Ok(None);
        }
    };

    let parsed = ParsedFile::from_source(&name, &content);
    let diagnostics = engine.analyze(&parsed);

    if !fix || !diagnostics.iter().any(Diagnostic::has_fix) {
        return Ok(Some(FileReport {
            path: name,
            source: content,
            diagnostics,
            fixed: 0,
        }));
    }

    let outcome = apply_fixes(&parsed, &diagnostics)
        .with_context(|| format!("Failed to apply fixes to {name}"))?;
    fs::write(path, &outcome.source).with_context(|| format!("Failed to write {name}"))?;
    tracing::debug!(file = %name, applied = outcome.applied, "wrote fixes");

    let reparsed = ParsedFile::from_source(&name, &outcome.source);
    let remaining = engine.analyze(&reparsed);

    Ok(Some(FileReport {
        path: name,
        source: outcome.source,
        diagnostics: remaining,
        fixed: outcome.applied,
    }))
}

fn discover_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_supported_file(path) {
            return Ok(vec![path.to_path_buf()]);
        } else {
            return Ok(vec![]);
        }
    }

    let files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(files)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}

fn count_severity(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}
