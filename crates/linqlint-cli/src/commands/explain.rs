//! Explain command - provides detailed explanation of a rule

use clap::Args;
use colored::Colorize;
use linqlint_core::analysis::AnalysisEngine;
use linqlint_core::config::load_config_or_default_with_warnings;
use linqlint_core::rules::Severity;
use std::env;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[arg(
        value_name = "RULE_ID",
        help = "Rule ID or name to explain (e.g., \"P001\", \"no-guid-to-string\")"
    )]
    pub rule_id: String,
}

impl ExplainArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let cwd = env::current_dir()?;
        let config = load_config_or_default_with_warnings(&cwd).config;
        let engine = AnalysisEngine::with_config(&config);
        let registry = engine.registry();

        let Some(rule) = registry.find_rule(&self.rule_id) else {
            eprintln!(
                "{} Unknown rule '{}'",
                "error:".red().bold(),
                self.rule_id
            );
            eprintln!();
            eprintln!("Available rules:");
            for rule in registry.rules() {
                let meta = rule.metadata();
                eprintln!("  {} ({})", meta.id, meta.name);
            }
            std::process::exit(1);
        };

        let metadata = rule.metadata();
        let is_enabled = registry.is_rule_enabled(&self.rule_id);

        println!();
        println!("{}", format!("Rule {}", metadata.id).bold());
        println!();
        println!("  {}: {}", "Name".cyan(), metadata.name);
        println!("  {}: {}", "Description".cyan(), metadata.description);
        println!(
            "  {}: {}",
            "Severity".cyan(),
            format_severity(&metadata.severity)
        );

        if let Some(url) = metadata.docs_url {
            println!("  {}: {}", "Documentation".cyan(), url);
        }

        if let Some(examples) = metadata.examples {
            println!();
            println!("  {}:", "Examples".cyan());
            for line in examples.lines() {
                println!("    {}", line);
            }
        }

        println!();
        let status = if is_enabled {
            "enabled".green()
        } else {
            "disabled".red()
        };
        println!("  {}: {}", "Status".cyan(), status);
        println!();

        Ok(())
    }
}

fn format_severity(severity: &Severity) -> String {
    match severity {
        Severity::Error => "error".red().to_string(),
        Severity::Warning => "warning".yellow().to_string(),
        Severity::Info => "info".blue().to_string(),
        Severity::Hint => "hint".cyan().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use linqlint_core::analysis::AnalysisEngine;
    use linqlint_core::config::Config;

    #[test]
    fn explain_known_rule_returns_metadata() {
        let engine = AnalysisEngine::with_config(&Config::default());
        let registry = engine.registry();

        let rule = registry.get_rule("P001");
        assert!(rule.is_some(), "P001 rule should exist");

        let metadata = rule.unwrap().metadata();
        assert_eq!(metadata.id, "P001");
        assert_eq!(metadata.name, "no-guid-to-string");
        assert!(!metadata.description.is_empty());
    }

    #[test]
    fn explain_unknown_rule_returns_none() {
        let engine = AnalysisEngine::with_config(&Config::default());

        assert!(engine.registry().find_rule("P999").is_none());
    }

    #[test]
    fn explain_rule_by_name() {
        let engine = AnalysisEngine::with_config(&Config::default());

        let rule = engine.registry().find_rule("no-guid-to-string");
        assert!(rule.is_some(), "no-guid-to-string rule should exist");
        assert_eq!(rule.unwrap().metadata().id, "P001");
    }

    #[test]
    fn rule_has_examples() {
        let engine = AnalysisEngine::with_config(&Config::default());
        let rule = engine.registry().get_rule("P001").expect("P001 should exist");

        let examples = rule.metadata().examples.expect("examples should be defined");
        assert!(examples.contains("new Guid"));
    }
}
