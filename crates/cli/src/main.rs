mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobdedup")]
#[command(about = "Consolidate duplicate job listings that share a description hash", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List duplicate hashes, most duplicated first
    Find {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show what consolidating a hash would do without writing anything
    Plan { hash: String },
    /// Consolidate a single duplicate group
    Consolidate {
        hash: String,
        #[arg(long)]
        group_timeout_secs: Option<u64>,
    },
    /// Consolidate every duplicate group, stopping at the first failure
    Run {
        /// Log a progress line every N groups
        #[arg(long)]
        progress_every: Option<usize>,
        #[arg(long)]
        group_timeout_secs: Option<u64>,
        /// Only process the first N groups
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Find { limit } => commands::find::run(limit).await?,
        Commands::Plan { hash } => commands::plan::run(&hash).await?,
        Commands::Consolidate { hash, group_timeout_secs } => {
            commands::consolidate::run(&hash, group_timeout_secs).await?;
        },
        Commands::Run { progress_every, group_timeout_secs, limit } => {
            let overrides = commands::RunOverrides { progress_every, group_timeout_secs, limit };
            commands::run::run(overrides).await?;
        },
    }

    Ok(())
}
