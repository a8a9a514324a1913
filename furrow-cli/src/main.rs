//! Furrow CLI
//!
//! Starts asynchronous farm-management jobs (document processing, John Deere
//! field imports, field plan and report generation) and watches them until
//! they finish.

mod commands;
mod config;
mod watch;

use anyhow::Result;
use clap::{Args, Parser};
use commands::{Commands, handle_command};
use config::{Config, PollOverrides};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "furrow")]
#[command(about = "Start and watch farm-management backend jobs", long_about = None)]
struct Cli {
    /// Farm-management API URL
    #[arg(long, env = "FURROW_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// API bearer token
    #[arg(long, env = "FURROW_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    #[command(flatten)]
    poll: PollArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides of the per-job polling profile
#[derive(Args)]
struct PollArgs {
    /// Delay between status checks in milliseconds
    #[arg(long, global = true, env = "FURROW_POLL_INTERVAL_MS")]
    interval_ms: Option<u64>,

    /// Stop watching after this many milliseconds
    #[arg(long, global = true, env = "FURROW_POLL_MAX_DURATION_MS")]
    max_duration_ms: Option<u64>,

    /// Watch until the job finishes, however long it takes
    #[arg(long, global = true, conflicts_with = "max_duration_ms")]
    no_deadline: bool,

    /// Consecutive failed status checks tolerated
    #[arg(long, global = true, env = "FURROW_POLL_MAX_ERRORS")]
    max_errors: Option<u32>,

    /// Back off exponentially after failed status checks
    #[arg(long, global = true)]
    backoff: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for job output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "furrow_cli=warn,furrow_poller=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        api_token: cli.api_token,
        poll: PollOverrides {
            interval_ms: cli.poll.interval_ms,
            max_duration_ms: cli.poll.max_duration_ms,
            no_deadline: cli.poll.no_deadline,
            max_errors: cli.poll.max_errors,
            backoff: cli.poll.backoff,
        },
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
