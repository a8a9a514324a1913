//! Field plan command handlers

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use furrow_client::FieldPlanStatusFetcher;
use furrow_core::domain::JobKind;
use furrow_core::dto::generation::GenerateFieldPlan;

use super::parse_job_id;
use crate::config::Config;
use crate::watch::{show_status, watch_job};

/// Field plan subcommands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a field plan for a season
    Generate {
        /// Field ID
        #[arg(long)]
        field: String,

        /// Season (year) to plan
        #[arg(long)]
        season: u16,

        /// Return as soon as generation is started
        #[arg(long)]
        no_watch: bool,
    },
    /// Watch a running field plan generation
    Watch {
        /// Generation job ID
        job_id: String,
    },
    /// Show the current status of a field plan generation
    Status {
        /// Generation job ID
        job_id: String,
    },
}

/// Handle field plan commands
pub async fn handle_plan_command(command: PlanCommands, config: &Config) -> Result<()> {
    let client = Arc::new(config.client());
    let fetcher = FieldPlanStatusFetcher::new(Arc::clone(&client));
    let kind = JobKind::FieldPlanGeneration;

    match command {
        PlanCommands::Generate {
            field,
            season,
            no_watch,
        } => {
            let job = client
                .generate_field_plan(GenerateFieldPlan {
                    field_id: field,
                    season,
                })
                .await
                .context("Failed to start field plan generation")?;

            println!(
                "{} Field plan generation started (job {})",
                "✓".green(),
                job.job_id.to_string().cyan()
            );

            if no_watch {
                return Ok(());
            }
            watch_job(kind, job.job_id, fetcher, config.poller_config(kind, false)?).await
        }
        PlanCommands::Watch { job_id } => {
            let job_id = parse_job_id(&job_id)?;
            watch_job(kind, job_id, fetcher, config.poller_config(kind, true)?).await
        }
        PlanCommands::Status { job_id } => {
            show_status(kind, &parse_job_id(&job_id)?, &fetcher).await
        }
    }
}
