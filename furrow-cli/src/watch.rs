//! Job watching
//!
//! Drives a `JobStatusPoller` for one job and renders its progress. This is
//! where the domain decisions live: which statuses are terminal, what counts
//! as success, and what to do when the deadline passes.

use anyhow::{Context, Result, anyhow, bail};
use colored::*;
use furrow_client::ClientError;
use furrow_core::domain::{JobId, JobKind, JobState};
use furrow_core::dto::document::DocumentStatusResponse;
use furrow_core::dto::generation::GenerationStatusResponse;
use furrow_core::dto::import::ImportStatusResponse;
use furrow_poller::{Callbacks, JobStatusPoller, PollOutcome, PollerConfig, StatusFetcher};

/// A status response as rendered by the CLI
pub trait StatusView: Send + Sync + 'static {
    fn state(&self) -> &dyn JobState;

    /// Extra information worth printing next to the status
    fn detail(&self) -> Option<String>;
}

impl StatusView for DocumentStatusResponse {
    fn state(&self) -> &dyn JobState {
        &self.status
    }

    fn detail(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.document_type.as_ref().map(|t| format!("type: {}", t)))
    }
}

impl StatusView for ImportStatusResponse {
    fn state(&self) -> &dyn JobState {
        &self.status
    }

    fn detail(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        match (self.total_fields, self.progress_percent()) {
            (Some(total), Some(percent)) => Some(format!(
                "{}/{} fields ({}%)",
                self.imported_fields, total, percent
            )),
            _ if self.imported_fields > 0 => Some(format!("{} fields", self.imported_fields)),
            _ => None,
        }
    }
}

impl StatusView for GenerationStatusResponse {
    fn state(&self) -> &dyn JobState {
        &self.status
    }

    fn detail(&self) -> Option<String> {
        self.error.clone().or_else(|| self.download_url.clone())
    }
}

/// Watch a job until it stops, printing each status change
///
/// # Arguments
/// * `kind` - The kind of job, used for messages
/// * `job_id` - The job to watch
/// * `fetcher` - Reads the job status
/// * `config` - Poller configuration for this job
///
/// # Errors
/// Returns an error if the job failed, the status could not be fetched, or
/// the job was still running when the deadline passed.
pub async fn watch_job<F>(
    kind: JobKind,
    job_id: JobId,
    fetcher: F,
    config: PollerConfig,
) -> Result<()>
where
    F: StatusFetcher<Error = ClientError> + Clone,
    F::Status: StatusView,
{
    println!(
        "{} Watching {} job {}",
        "▸".cyan(),
        kind,
        job_id.to_string().bold()
    );

    let mut last_line: Option<String> = None;
    let listener = Callbacks::new()
        .on_update(move |status: &F::Status| {
            // Only print changes, a long import reports the same status many times
            let line = status_line(status);
            if last_line.as_deref() != Some(line.as_str()) {
                println!("  {}", line);
                last_line = Some(line);
            }
        })
        .on_error(|e: &ClientError| {
            println!("  {} {} ({})", "✗ Status check failed:".red(), e, failure_hint(e));
        })
        .on_timeout(|_: Option<&F::Status>| {
            println!(
                "  {}",
                "⚠ This is taking longer than usual, checking one last time...".yellow()
            );
        });

    let handle = JobStatusPoller::new(config)
        .start(
            job_id.clone(),
            fetcher.clone(),
            |status: &F::Status| status.state().is_terminal(),
            listener,
        )
        .context("Failed to start poller")?;

    // Dropping the handle on Ctrl-C cancels the poller
    let Some(outcome) = until_interrupted(handle.wait(), tokio::signal::ctrl_c()).await else {
        println!(
            "{}",
            "Stopped watching; the job keeps running on the server.".dimmed()
        );
        return Ok(());
    };

    match outcome {
        PollOutcome::Terminal(status) => report_terminal(kind, &job_id, &status),
        PollOutcome::TimedOut { last_status } => {
            handle_timeout(kind, &job_id, &fetcher, last_status).await
        }
        PollOutcome::ErrorBudgetExhausted(e) => {
            let hint = failure_hint(&e);
            Err(anyhow!(e)).with_context(|| {
                format!(
                    "Gave up watching {} job {} after repeated failures: {}",
                    kind, job_id, hint
                )
            })
        }
        PollOutcome::Cancelled => Ok(()),
    }
}

/// Runs `work` until it completes or `interrupt` fires
///
/// Returns `None` when interrupted. An interrupt that fails to arm, such as
/// a signal handler that cannot be installed, is logged and `work` keeps
/// running.
async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Option<T> {
    tokio::pin!(work);
    tokio::select! {
        output = &mut work => Some(output),
        result = interrupt => match result {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Ctrl-C handling unavailable, watching until the job stops: {}", e);
                Some(work.await)
            }
        },
    }
}

/// Why status checks keep failing, as far as the error tells
fn failure_hint(e: &ClientError) -> &'static str {
    if e.is_not_found() {
        "the job does not exist on the server"
    } else if e.is_transient() {
        "the API is unreachable or overloaded, the job may still be running"
    } else {
        "the API rejected the status request"
    }
}

/// Fetch and print the current status once
pub async fn show_status<F>(kind: JobKind, job_id: &JobId, fetcher: &F) -> Result<()>
where
    F: StatusFetcher<Error = ClientError>,
    F::Status: StatusView,
{
    let status = fetcher
        .fetch_status(job_id)
        .await
        .with_context(|| format!("Failed to fetch status of {} job {}", kind, job_id))?;

    println!("{}", format!("{} job {}:", kind, job_id).bold());
    println!("  {}", status_line(&status));
    Ok(())
}

/// One final best-effort check after the deadline
///
/// Only a terminal status fetched now is reported as a result. Anything
/// else is reported as still running, never as success.
async fn handle_timeout<F>(
    kind: JobKind,
    job_id: &JobId,
    fetcher: &F,
    last_status: Option<F::Status>,
) -> Result<()>
where
    F: StatusFetcher<Error = ClientError>,
    F::Status: StatusView,
{
    let current = match fetcher.fetch_status(job_id).await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!("Final status check for job {} failed: {}", job_id, e);
            last_status
        }
    };

    if let Some(status) = current.as_ref().filter(|s| s.state().is_terminal()) {
        return report_terminal(kind, job_id, status);
    }

    let last_seen = current
        .as_ref()
        .map(|s| s.state().label().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    bail!(
        "{} job {} is still running (last status: {}). Check again with `furrow {} watch {}`",
        kind,
        job_id,
        last_seen,
        command_name(kind),
        job_id
    )
}

fn report_terminal<S: StatusView>(kind: JobKind, job_id: &JobId, status: &S) -> Result<()> {
    let state = status.state();
    if state.is_failure() {
        let reason = status.detail().unwrap_or_else(|| "no reason given".to_string());
        bail!("{} job {} failed: {}", kind, job_id, reason);
    }

    println!(
        "{} {} job {} finished ({})",
        "✓".green(),
        kind,
        job_id,
        state.label()
    );
    if let Some(detail) = status.detail() {
        println!("  {}", detail.dimmed());
    }
    Ok(())
}

/// Status followed by its detail, colored by outcome
fn status_line<S: StatusView>(status: &S) -> String {
    let state = status.state();
    let label = if state.is_failure() {
        state.label().red()
    } else if state.is_terminal() {
        state.label().green()
    } else {
        state.label().cyan()
    };

    match status.detail() {
        Some(detail) => format!("{} {}", label, detail.dimmed()),
        None => label.to_string(),
    }
}

/// Subcommand under which `kind` is watched
fn command_name(kind: JobKind) -> &'static str {
    match kind {
        JobKind::DocumentProcessing => "document",
        JobKind::FieldImport => "import",
        JobKind::FieldPlanGeneration => "plan",
        JobKind::ReportGeneration => "report",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furrow_core::domain::{DocumentStatus, GenerationStatus, ImportStatus};
    use furrow_poller::fetch_fn;

    fn import(status: ImportStatus, imported: u32, total: Option<u32>) -> ImportStatusResponse {
        ImportStatusResponse {
            job_id: JobId::from("imp-1"),
            status,
            imported_fields: imported,
            total_fields: total,
            error: None,
            started_at: None,
            completed_at: None,
        }
    }

    fn generation(status: GenerationStatus) -> GenerationStatusResponse {
        GenerationStatusResponse {
            job_id: JobId::from("rep-1"),
            status,
            download_url: None,
            error: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_import_detail_shows_progress() {
        let status = import(ImportStatus::InProgress, 12, Some(40));
        assert_eq!(status.detail().as_deref(), Some("12/40 fields (30%)"));

        let status = import(ImportStatus::InProgress, 3, None);
        assert_eq!(status.detail().as_deref(), Some("3 fields"));

        let status = import(ImportStatus::Pending, 0, None);
        assert_eq!(status.detail(), None);
    }

    #[test]
    fn test_error_detail_takes_precedence() {
        let mut status = generation(GenerationStatus::Failed);
        status.download_url = Some("https://files/plan.pdf".to_string());
        status.error = Some("no soil samples".to_string());
        assert_eq!(status.detail().as_deref(), Some("no soil samples"));
    }

    #[test]
    fn test_report_terminal_failure_is_an_error() {
        let mut status = generation(GenerationStatus::Failed);
        status.error = Some("no yield data".to_string());

        let err = report_terminal(JobKind::ReportGeneration, &JobId::from("rep-1"), &status)
            .unwrap_err();
        assert!(err.to_string().contains("no yield data"));
    }

    #[test]
    fn test_report_terminal_success() {
        let status = DocumentStatusResponse {
            job_id: JobId::from("doc-1"),
            status: DocumentStatus::Completed,
            document_type: Some("soil_test".to_string()),
            extracted: None,
            error: None,
            updated_at: None,
        };
        assert!(report_terminal(JobKind::DocumentProcessing, &JobId::from("doc-1"), &status).is_ok());
    }

    #[tokio::test]
    async fn test_timeout_with_running_job_is_not_success() {
        let fetcher = fetch_fn(|_: JobId| async {
            Ok::<_, ClientError>(generation(GenerationStatus::Generating))
        });

        let err = handle_timeout(
            JobKind::ReportGeneration,
            &JobId::from("rep-1"),
            &fetcher,
            Some(generation(GenerationStatus::Queued)),
        )
        .await
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("still running"));
        assert!(message.contains("generating"));
        assert!(message.contains("furrow report watch rep-1"));
    }

    #[tokio::test]
    async fn test_timeout_then_ready_is_success() {
        let fetcher = fetch_fn(|_: JobId| async {
            Ok::<_, ClientError>(generation(GenerationStatus::Ready))
        });

        let result = handle_timeout(
            JobKind::ReportGeneration,
            &JobId::from("rep-1"),
            &fetcher,
            Some(generation(GenerationStatus::Generating)),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_timeout_then_failed_job_is_an_error() {
        let fetcher = fetch_fn(|_: JobId| async {
            let mut status = generation(GenerationStatus::Failed);
            status.error = Some("no yield data".to_string());
            Ok::<_, ClientError>(status)
        });

        let err = handle_timeout(JobKind::ReportGeneration, &JobId::from("rep-1"), &fetcher, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no yield data"));
    }

    #[tokio::test]
    async fn test_timeout_with_failed_final_check_keeps_last_status() {
        let fetcher = fetch_fn(|_: JobId| async {
            Err::<GenerationStatusResponse, _>(ClientError::api_error(503, "maintenance"))
        });

        let err = handle_timeout(
            JobKind::FieldPlanGeneration,
            &JobId::from("plan-1"),
            &fetcher,
            Some(generation(GenerationStatus::Queued)),
        )
        .await
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("still running"));
        assert!(message.contains("last status: queued"));
    }

    #[tokio::test]
    async fn test_timeout_without_any_status() {
        let fetcher = fetch_fn(|_: JobId| async {
            Err::<GenerationStatusResponse, _>(ClientError::api_error(503, "maintenance"))
        });

        let err = handle_timeout(JobKind::FieldPlanGeneration, &JobId::from("plan-1"), &fetcher, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("last status: unknown"));
    }

    #[test]
    fn test_failure_hint_follows_error_kind() {
        assert_eq!(
            failure_hint(&ClientError::api_error(404, "no such job")),
            "the job does not exist on the server"
        );
        assert!(failure_hint(&ClientError::api_error(502, "bad gateway")).contains("unreachable"));
        assert!(failure_hint(&ClientError::api_error(429, "slow down")).contains("unreachable"));
        assert_eq!(
            failure_hint(&ClientError::ParseError("bad json".to_string())),
            "the API rejected the status request"
        );
    }

    #[tokio::test]
    async fn test_interrupt_stops_waiting() {
        let interrupt = async { Ok::<(), std::io::Error>(()) };
        let output = until_interrupted(std::future::pending::<()>(), interrupt).await;
        assert_eq!(output, None);
    }

    #[tokio::test]
    async fn test_failed_interrupt_keeps_waiting() {
        let work = async {
            tokio::task::yield_now().await;
            "done"
        };
        let interrupt = async { Err::<(), _>(std::io::Error::other("no signal handler")) };

        assert_eq!(until_interrupted(work, interrupt).await, Some("done"));
    }

    #[test]
    fn test_status_line_contains_label_and_detail() {
        colored::control::set_override(false);
        let status = import(ImportStatus::InProgress, 1, Some(4));
        assert_eq!(status_line(&status), "in_progress 1/4 fields (25%)");
    }
}
