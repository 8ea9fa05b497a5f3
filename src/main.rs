use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use threatcorr::config::{LoggingConfig, ThreatCorrConfig};
use threatcorr::{Batch, CorrelationEngine};

#[derive(Parser)]
#[command(
    name = "threatcorr",
    about = "Event correlation, risk scoring and ATT&CK mapping for network flows",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group related events and print the correlation groups
    Correlate {
        /// Batch file ({"events": [...], "alerts": [...]})
        #[arg(long)]
        input: PathBuf,

        /// Correlation window in seconds (overrides config)
        #[arg(long)]
        window: Option<u64>,
    },

    /// Compute the 0-100 risk score for a batch
    Score {
        #[arg(long)]
        input: PathBuf,

        /// Print every sub-score as JSON
        #[arg(long)]
        breakdown: bool,
    },

    /// Map a batch to ATT&CK tactics and techniques
    Map {
        #[arg(long)]
        input: PathBuf,
    },

    /// Correlate a batch and assess every group
    Assess {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        window: Option<u64>,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = ThreatCorrConfig::resolve(cli.config.as_deref())?;
    init_tracing(&resolved.config.logging);
    resolved.log();
    let config = resolved.config;

    let engine = CorrelationEngine::new();

    match cli.command {
        Commands::Correlate { input, window } => {
            let batch = Batch::load(&input)?;
            let window = window.unwrap_or(config.correlation.time_window_seconds);
            tracing::info!(input = %input.display(), window, "Correlating events");
            let groups = engine.correlate_events(&batch.events, window);
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Commands::Score { input, breakdown } => {
            let batch = Batch::load(&input)?;
            let scores = engine.score_breakdown(&batch.events, &batch.alerts);
            if breakdown {
                println!("{}", serde_json::to_string_pretty(&scores)?);
            } else {
                println!("{:.2}", scores.final_score);
            }
        }
        Commands::Map { input } => {
            let batch = Batch::load(&input)?;
            let mapping = engine.map_to_mitre_attack(&batch.events, &batch.alerts);
            println!("{}", serde_json::to_string_pretty(&mapping)?);
        }
        Commands::Assess {
            input,
            window,
            json,
        } => {
            let batch = Batch::load(&input)?;
            let window = window.unwrap_or(config.correlation.time_window_seconds);
            let mut results =
                threatcorr::assess_batches(Arc::new(engine), vec![batch], window).await?;
            let assessments = results.pop().unwrap_or_default();

            if json {
                println!("{}", serde_json::to_string_pretty(&assessments)?);
            } else if assessments.is_empty() {
                println!("No correlation groups found.");
            } else {
                println!(
                    "{:<8} | {:<6} | {:<11} | {:<9} | Techniques",
                    "Severity", "Events", "Correlation", "Risk"
                );
                println!("{:-<8}-|-{:-<6}-|-{:-<11}-|-{:-<9}-|-{:-<30}", "", "", "", "", "");
                for a in &assessments {
                    let techniques: Vec<&str> =
                        a.mitre_attack.techniques.iter().map(String::as_str).collect();
                    println!(
                        "{:<8} | {:<6} | {:<11.3} | {:<9.2} | {}",
                        a.severity,
                        a.event_ids.len(),
                        a.correlation_score,
                        a.risk_score,
                        techniques.join(", ")
                    );
                }
            }
        }
    }

    Ok(())
}
