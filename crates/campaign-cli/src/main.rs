//! Campaign Live CLI - replay mission logs and run campaign computations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod compute;
mod config;
mod output;
mod prompt;
mod replay;

use config::Config;
use output::Output;

/// Campaign Live - live-session controller for the dynamic campaign
#[derive(Parser)]
#[command(name = "campaign")]
#[command(about = "Live-session controller for the dynamic campaign", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit JSON lines instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines host event log and print the actor scoreboard
    Replay {
        /// Path to the event log
        path: PathBuf,
    },

    /// Run the campaign turn planner in the background (Ctrl-C to cancel)
    Compute {
        /// Number of turns to plan
        #[arg(short, long)]
        steps: Option<u32>,

        /// Milliseconds of simulated work per turn
        #[arg(long)]
        step_ms: Option<u64>,

        /// Confirm cancellation without prompting
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::default();
    config.json = cli.json;

    // Logs go to stderr so stdout stays clean for the scoreboard / JSON lines
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let output = Output::new(config.json);

    match cli.command {
        Commands::Replay { path } => {
            if let Err(e) = replay::run_replay(&path, output).await {
                error!(error = %e, "Replay failed");
                return Err(e.into());
            }
        }
        Commands::Compute {
            steps,
            step_ms,
            yes,
        } => {
            if let Some(steps) = steps {
                config.steps = steps;
            }
            if let Some(step_ms) = step_ms {
                config.step_ms = step_ms;
            }
            config.auto_confirm |= yes;

            info!(steps = config.steps, step_ms = config.step_ms, "Starting computation");
            let outcome = compute::run_compute(&config, output).await?;
            if !outcome.is_success() {
                return Err("campaign computation failed".into());
            }
        }
    }

    Ok(())
}
