//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod document;
mod import;
mod plan;
mod report;

pub use document::DocumentCommands;
pub use import::ImportCommands;
pub use plan::PlanCommands;
pub use report::ReportCommands;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use furrow_core::domain::JobId;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Document and photo processing
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// John Deere field imports
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Field plan generation
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Field report generation
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Document { command } => document::handle_document_command(command, config).await,
        Commands::Import { command } => import::handle_import_command(command, config).await,
        Commands::Plan { command } => plan::handle_plan_command(command, config).await,
        Commands::Report { command } => report::handle_report_command(command, config).await,
    }
}

/// Parse a job ID given on the command line
fn parse_job_id(raw: &str) -> Result<JobId> {
    JobId::parse(raw).ok_or_else(|| anyhow!("Job ID cannot be empty"))
}
