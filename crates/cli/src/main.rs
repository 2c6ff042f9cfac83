//! sandeval CLI: the main entry point.
//!
//! Commands:
//! - `run`   : Evaluate the agent against a task file
//! - `tools` : List the tools the sandbox exposes

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "sandeval",
    about = "sandeval: evaluate tool-calling agents against a remote sandbox",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.sandeval/config.toml)
    #[arg(short, long, global = true, env = "SANDEVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every task in a task file and report the results as JSON
    Run {
        /// TOML task file with [[tasks]] entries
        #[arg(short, long)]
        tasks: PathBuf,

        /// Override the per-task round limit
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_iterations: Option<u32>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sandbox tool catalog as JSON
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean JSON.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            tasks,
            max_iterations,
            output,
        } => commands::run::run(config, &tasks, max_iterations, output.as_deref()).await?,
        Commands::Tools => commands::tools::run(config).await?,
    }

    Ok(())
}
