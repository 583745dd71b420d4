//! forum-harvest entry point.
//!
//! Logging goes to stderr so the records file and archive stay the only
//! outputs on disk.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
#[cfg_attr(not(feature = "render"), allow(dead_code))]
mod harvest;

#[derive(Parser)]
#[command(name = "forum-harvest")]
#[command(about = "Collect the posts of a forum topic into a JSON records file")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the topic pages and write the records file
    Collect(commands::collect::CollectArgs),

    /// Render a records file into a Markdown archive
    Export(commands::export::ExportArgs),
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Log a fatal error once and map the outcome to a process status.
fn exit_status(outcome: &anyhow::Result<()>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{e:#}");
            1
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json);

    let outcome = match cli.command {
        Commands::Collect(args) => commands::collect::run(&args).await,
        Commands::Export(args) => commands::export::run(&args),
    };

    ExitCode::from(exit_status(&outcome))
}
