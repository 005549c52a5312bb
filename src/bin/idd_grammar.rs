//! Dictionary Grammar CLI
//!
//! Lists the grammar, matches single lines and surveys dictionary files.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use idd_grammar::config::OutputFormat;
use idd_grammar::survey::survey_directory;
use idd_grammar::{classify_line, grammar, GrammarConfig, PatternId};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idd-grammar")]
#[command(about = "Inspect the Input Data Dictionary line grammar")]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every pattern with its regular expression
    Patterns,

    /// Match one line against a pattern
    Match {
        /// Pattern name (e.g. MinExclusiveProperty or min-exclusive-property)
        pattern: PatternId,
        /// Line to match
        line: String,
    },

    /// Classify one line and list every pattern it matches
    Classify {
        /// Line to classify
        line: String,
    },

    /// Survey a dictionary file or a directory of dictionaries
    Survey {
        /// File or directory
        path: PathBuf,
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration, or write it to a file
    Config {
        /// Write the configuration here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when the command ran but found nothing (no match, unclean survey)
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config_path = cli.config.as_ref().map(|p| p.to_string_lossy().to_string());
    let config = GrammarConfig::load_from(config_path.as_deref())
        .context("failed to load configuration")?;
    let format = if cli.compact {
        OutputFormat::Compact
    } else {
        config.output.format
    };

    match cli.command {
        Commands::Patterns => {
            for pattern in grammar().iter() {
                let id = pattern.id();
                println!("{:<26} {:<28} {}", id.name(), id.kebab_name(), id.source());
                if config.output.show_groups {
                    for (i, meaning) in id.groups().iter().enumerate() {
                        println!("{:<55}   [{}] {}", "", i + 1, meaning);
                    }
                }
            }
            Ok(true)
        }

        Commands::Match { pattern, line } => match pattern.captures(&line) {
            Some(m) => {
                println!("{}", format.to_json(&m)?);
                Ok(true)
            }
            None => {
                println!("no match for {}", pattern);
                Ok(false)
            }
        },

        Commands::Classify { line } => {
            let report = serde_json::json!({
                "class": classify_line(&line),
                "matching": grammar().matching(&line),
            });
            println!("{}", format.to_json(&report)?);
            Ok(true)
        }

        Commands::Survey { path, output } => {
            let surveys = if path.is_dir() {
                survey_directory(&path, &config.scan)
            } else {
                let survey = idd_grammar::survey::survey_file(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                vec![(path.clone(), survey)]
            };

            if surveys.is_empty() {
                bail!("no dictionaries found under {}", path.display());
            }

            let clean = surveys.iter().all(|(_, s)| s.is_clean());
            let report = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "dictionaries": surveys
                    .iter()
                    .map(|(p, s)| serde_json::json!({ "path": p, "survey": s }))
                    .collect::<Vec<_>>(),
            });
            let report_json = format.to_json(&report)?;

            if let Some(out) = output {
                std::fs::write(&out, &report_json)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("✅ Report written to {:?}", out);
            } else {
                println!("{}", report_json);
            }

            for (p, s) in surveys.iter().filter(|(_, s)| !s.is_clean()) {
                eprintln!(
                    "❌ {}: {} unrecognized line(s), {} unterminated object(s)",
                    p.display(),
                    s.unrecognized.len(),
                    s.unterminated.len()
                );
            }
            Ok(clean)
        }

        Commands::Config { output } => {
            if let Some(out) = output {
                config
                    .save(&out)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("✅ Configuration written to {:?}", out);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(true)
        }
    }
}
