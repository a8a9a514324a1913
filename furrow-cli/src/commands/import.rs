//! Field import command handlers
//!
//! Imports field boundaries from a John Deere organization.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use furrow_client::ImportStatusFetcher;
use furrow_core::domain::JobKind;
use furrow_core::dto::import::StartImport;

use super::parse_job_id;
use crate::config::Config;
use crate::watch::{show_status, watch_job};

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Start a field import
    Start {
        /// John Deere organization ID
        #[arg(long)]
        org: String,

        /// Only import these fields (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Return as soon as the import is started
        #[arg(long)]
        no_watch: bool,
    },
    /// Watch a running import
    Watch {
        /// Import job ID
        job_id: String,
    },
    /// Show the current status of an import
    Status {
        /// Import job ID
        job_id: String,
    },
}

/// Handle import commands
pub async fn handle_import_command(command: ImportCommands, config: &Config) -> Result<()> {
    let client = Arc::new(config.client());
    let fetcher = ImportStatusFetcher::new(Arc::clone(&client));
    let kind = JobKind::FieldImport;

    match command {
        ImportCommands::Start {
            org,
            fields,
            no_watch,
        } => {
            let job = client
                .start_field_import(StartImport {
                    organization_id: org,
                    field_ids: fields,
                })
                .await
                .context("Failed to start field import")?;

            println!(
                "{} Field import started (job {})",
                "✓".green(),
                job.job_id.to_string().cyan()
            );

            if no_watch {
                return Ok(());
            }
            watch_job(kind, job.job_id, fetcher, config.poller_config(kind, false)?).await
        }
        ImportCommands::Watch { job_id } => {
            let job_id = parse_job_id(&job_id)?;
            watch_job(kind, job_id, fetcher, config.poller_config(kind, true)?).await
        }
        ImportCommands::Status { job_id } => {
            show_status(kind, &parse_job_id(&job_id)?, &fetcher).await
        }
    }
}
