//! Report command handlers

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use furrow_client::ReportStatusFetcher;
use furrow_core::domain::JobKind;
use furrow_core::dto::generation::GenerateReport;

use super::parse_job_id;
use crate::config::Config;
use crate::watch::{show_status, watch_job};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate a report for a field
    Generate {
        /// Field ID
        #[arg(long)]
        field: String,

        /// Report kind, e.g. scouting or yield
        #[arg(long, default_value = "scouting")]
        kind: String,

        /// Return as soon as generation is started
        #[arg(long)]
        no_watch: bool,
    },
    /// Watch a running report generation
    Watch {
        /// Generation job ID
        job_id: String,
    },
    /// Show the current status of a report generation
    Status {
        /// Generation job ID
        job_id: String,
    },
}

/// Handle report commands
pub async fn handle_report_command(command: ReportCommands, config: &Config) -> Result<()> {
    let client = Arc::new(config.client());
    let fetcher = ReportStatusFetcher::new(Arc::clone(&client));
    let job_kind = JobKind::ReportGeneration;

    match command {
        ReportCommands::Generate {
            field,
            kind,
            no_watch,
        } => {
            let job = client
                .generate_report(GenerateReport {
                    field_id: field,
                    kind,
                })
                .await
                .context("Failed to start report generation")?;

            println!(
                "{} Report generation started (job {})",
                "✓".green(),
                job.job_id.to_string().cyan()
            );

            if no_watch {
                return Ok(());
            }
            watch_job(
                job_kind,
                job.job_id,
                fetcher,
                config.poller_config(job_kind, false)?,
            )
            .await
        }
        ReportCommands::Watch { job_id } => {
            let job_id = parse_job_id(&job_id)?;
            watch_job(job_kind, job_id, fetcher, config.poller_config(job_kind, true)?).await
        }
        ReportCommands::Status { job_id } => {
            show_status(job_kind, &parse_job_id(&job_id)?, &fetcher).await
        }
    }
}
