//! Document command handlers
//!
//! Starts AI processing of uploaded documents and photos and watches
//! the processing jobs.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use furrow_client::DocumentStatusFetcher;
use furrow_core::domain::JobKind;

use super::parse_job_id;
use crate::config::Config;
use crate::watch::{show_status, watch_job};

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Start processing an uploaded document
    Process {
        /// ID of the uploaded document
        document_id: String,

        /// Return as soon as the job is started
        #[arg(long)]
        no_watch: bool,
    },
    /// Watch a running processing job
    Watch {
        /// Processing job ID
        job_id: String,
    },
    /// Show the current status of a processing job
    Status {
        /// Processing job ID
        job_id: String,
    },
}

/// Handle document commands
pub async fn handle_document_command(command: DocumentCommands, config: &Config) -> Result<()> {
    let client = Arc::new(config.client());
    let fetcher = DocumentStatusFetcher::new(Arc::clone(&client));
    let kind = JobKind::DocumentProcessing;

    match command {
        DocumentCommands::Process {
            document_id,
            no_watch,
        } => {
            let job = client
                .process_document(&document_id)
                .await
                .context("Failed to start document processing")?;

            println!(
                "{} Processing of document {} started (job {})",
                "✓".green(),
                job.document_id,
                job.job_id.to_string().cyan()
            );

            if no_watch {
                return Ok(());
            }
            watch_job(kind, job.job_id, fetcher, config.poller_config(kind, false)?).await
        }
        DocumentCommands::Watch { job_id } => {
            let job_id = parse_job_id(&job_id)?;
            watch_job(kind, job_id, fetcher, config.poller_config(kind, true)?).await
        }
        DocumentCommands::Status { job_id } => {
            show_status(kind, &parse_job_id(&job_id)?, &fetcher).await
        }
    }
}
