//! Command-line interface for truthlens.
//!
//! Provides commands for checking text and serving the HTTP API, plus
//! read-only views of the loaded facts and settings.

use std::io::{self, IsTerminal, Read};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::core::{
    Accepted, FactKind, Verifier, LOW_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD, VERIFIED_THRESHOLD,
    WEIGHTS,
};
use crate::domain::VerificationResult;
use crate::server;

/// truthlens - Claim-level hallucination scoring
#[derive(Parser, Debug)]
#[command(name = "truthlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify text and print a per-claim report
    Check {
        /// Text to check (reads --input or stdin if not provided)
        text: Option<String>,

        /// Input file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Read input from stdin
        #[arg(long)]
        stdin: bool,

        /// Print the JSON result instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API
    Serve {
        /// Address to bind to (defaults to the configured address)
        #[arg(short, long)]
        address: Option<String>,
    },

    /// List the loaded fact table
    Facts,

    /// Show ensemble weights and thresholds
    ModelInfo,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Check {
                text,
                input,
                stdin,
                json,
            } => check(text, input, stdin, json),
            Commands::Serve { address } => serve(address).await,
            Commands::Facts => list_facts(),
            Commands::ModelInfo => show_model_info(),
            Commands::Config => show_config(),
        }
    }
}

fn load_verifier() -> Result<Verifier> {
    config::config()?.verifier()
}

/// Verify text from an argument, a file or stdin
fn check(
    text: Option<String>,
    input_file: Option<PathBuf>,
    use_stdin: bool,
    json: bool,
) -> Result<()> {
    let verifier = load_verifier()?;

    // Denylisted files are rejected before they are read
    if let Some(path) = &input_file {
        verifier.limits().check_path(path)?;
    }

    let input = if let Some(text) = text {
        text
    } else if let Some(path) = &input_file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else if use_stdin || !io::stdin().is_terminal() {
        // Read from stdin if --stdin flag or if stdin is piped
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        anyhow::bail!("No input provided. Pass TEXT, use --input <file>, or pipe to stdin");
    };

    let result = verifier.verify_source(&input, input_file.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&verifier, &result);
    }

    Ok(())
}

fn print_report(verifier: &Verifier, result: &VerificationResult) {
    println!("{:<4} {:<9} {:>10} {:>8}  {}", "#", "VERDICT", "CONFIDENCE", "SOURCES", "CLAIM");
    println!("{}", "-".repeat(90));

    for verdict in &result.claims {
        let label = if verdict.verified { "verified" } else { "flagged" };
        println!(
            "{:<4} {:<9} {:>10.1} {:>8}  {}",
            verdict.claim.position + 1,
            label,
            verdict.confidence,
            verdict.sources,
            truncate(&verdict.claim.text, 60)
        );

        let flags = verifier.semantic_flags(&verdict.claim.text);
        if !flags.is_empty() {
            println!("{:<35}  implausible: {}", "", flags.join(", "));
        }
    }

    println!();
    println!("Overall score:      {:.1}", result.overall_score);
    println!("Confidence:         {:.1}", result.confidence);
    println!("Hallucination risk: {}", result.hallucination_risk);
    println!(
        "Claims verified:    {}/{}",
        result.verified_count(),
        result.claims.len()
    );
    println!("Processing time:    {:.3}s", result.processing_time_seconds);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Start the HTTP API
async fn serve(address: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let address = address.unwrap_or_else(|| cfg.bind.clone());
    let addr: SocketAddr = address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", address))?;

    server::run_server(addr, cfg.verifier()?).await
}

/// List the loaded fact table
fn list_facts() -> Result<()> {
    let cfg = config::config()?;
    let table = cfg.load_facts()?;

    println!(
        "Fact table: {} (version {})",
        cfg.facts_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(bundled)".to_string()),
        table.version
    );
    println!();
    println!("{:<24} {:<14} {:<8} {:<28} {:>7}", "ENTITY", "ATTRIBUTE", "KIND", "ACCEPTED", "SOURCES");
    println!("{}", "-".repeat(85));

    for entity in &table.entities {
        for fact in &entity.facts {
            let kind = match fact.kind {
                FactKind::Year => "year",
                FactKind::Length => "length",
            };
            let unit = if fact.kind == FactKind::Length { " m" } else { "" };
            let mut accepted = match fact.accepted {
                Accepted::Value { value } => format!("{}{}", value, unit),
                Accepted::Range { min, max } => format!("{}-{}{}", min, max, unit),
            };
            if fact.tolerance > 0.0 {
                accepted.push_str(&format!(" (±{})", fact.tolerance));
            }
            println!(
                "{:<24} {:<14} {:<8} {:<28} {:>7}",
                truncate(&entity.name, 24),
                fact.attribute,
                kind,
                accepted,
                fact.sources
            );
        }
    }

    println!();
    println!("{} entities, {} facts", table.entities.len(), table.fact_count());
    Ok(())
}

/// Show ensemble weights and thresholds
fn show_model_info() -> Result<()> {
    let verifier = load_verifier()?;
    let facts = verifier.facts();

    println!("Model: rule-based ensemble (v{})", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Weights:");
    println!("  Linguistic: {:.2}", WEIGHTS.linguistic);
    println!("  Semantic:   {:.2}", WEIGHTS.semantic);
    println!("  Factual:    {:.2}", WEIGHTS.factual);
    println!();
    println!("Thresholds:");
    println!("  Verified claim:  confidence >= {}", VERIFIED_THRESHOLD);
    println!("  Low risk:        overall >= {}", LOW_RISK_THRESHOLD);
    println!("  Medium risk:     overall >= {}", MEDIUM_RISK_THRESHOLD);
    println!();
    println!(
        "Fact table: {} entities, {} facts",
        facts.entities.len(),
        facts.fact_count()
    );

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Config file: {}", cfg.config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none - using defaults)".to_string()));
    println!();
    println!("Server:");
    println!("  Bind: {}", cfg.bind);
    println!();
    println!("Facts:");
    println!(
        "  Path: {}",
        cfg.facts_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(bundled)".to_string())
    );
    println!();
    println!("Limits:");
    println!("  Max input: {} chars", cfg.limits.max_input_chars);
    println!("  Max claims: {}", cfg.limits.max_claims);
    println!("  Denylist:");
    for pattern in &cfg.limits.denylist_patterns {
        println!("    {}", pattern);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 10), "a longe...");
        // Multi-byte characters are not split
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from(["truthlens", "check", "Some text.", "--json"]).unwrap();
        match cli.command {
            Commands::Check { text, json, stdin, input } => {
                assert_eq!(text.as_deref(), Some("Some text."));
                assert!(json);
                assert!(!stdin);
                assert!(input.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_serve_and_model_info() {
        let cli = Cli::try_parse_from(["truthlens", "serve", "-a", "127.0.0.1:9000"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { address: Some(ref a) } if a == "127.0.0.1:9000"));

        let cli = Cli::try_parse_from(["truthlens", "model-info"]).unwrap();
        assert!(matches!(cli.command, Commands::ModelInfo));
    }
}
