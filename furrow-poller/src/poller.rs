//! Job status poller
//!
//! Each started poller owns one tokio task that runs the ticks of a single
//! job strictly one after another: the next check is only scheduled once
//! the previous fetch has resolved, so two fetches for the same job are
//! never in flight at the same time and updates arrive in tick order.
//!
//! The delay between checks is measured from the end of the previous fetch.
//! The deadline is measured from `start` and is enforced while a fetch is
//! in flight as well.

use std::panic;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use furrow_core::domain::JobId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::PollerConfig;
use crate::error::{PollerError, Result};
use crate::fetcher::StatusFetcher;
use crate::listener::PollListener;
use crate::state::{PollOutcome, PollerState, StopReason};

/// Polls the status of one job until it stops
///
/// A poller is single use: [`start`](Self::start) consumes it and returns the
/// [`PollHandle`] controlling the running instance. Watching another job, or
/// the same job again, takes a new poller.
#[derive(Debug, Clone)]
pub struct JobStatusPoller {
    config: PollerConfig,
}

impl JobStatusPoller {
    /// Creates an idle poller
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// A poller that has not been started is always idle
    pub fn state(&self) -> PollerState {
        PollerState::Idle
    }

    /// Starts polling `job_id` on the current tokio runtime
    ///
    /// # Arguments
    /// * `job_id` - The job to watch
    /// * `fetcher` - Reads the job status once per tick
    /// * `is_terminal` - Decides whether a fetched status ends the job
    /// * `listener` - Receives updates and the stop notification
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or no tokio runtime
    /// is running. Failed status checks are never returned here.
    pub fn start<F, P, L>(
        self,
        job_id: JobId,
        fetcher: F,
        is_terminal: P,
        listener: L,
    ) -> Result<PollHandle<F::Status, F::Error>>
    where
        F: StatusFetcher,
        P: Fn(&F::Status) -> bool + Send + 'static,
        L: PollListener<F::Status, F::Error>,
    {
        self.config.validate()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| PollerError::NoRuntime)?;

        info!(
            "Starting poller for job {} (interval: {:?}, max duration: {:?}, error budget: {})",
            job_id,
            self.config.interval,
            self.config.max_duration,
            self.config.max_consecutive_errors
        );

        let (state_tx, state_rx) = watch::channel(PollerState::Polling);
        let shared = Arc::new(Shared {
            gate: Mutex::new(true),
            state: state_tx,
        });
        let token = CancellationToken::new();

        let run = PollRun {
            job_id: job_id.clone(),
            deadline: self.config.max_duration.map(|d| Instant::now() + d),
            config: self.config,
            fetcher,
            is_terminal,
            listener,
            shared: Arc::clone(&shared),
            token: token.clone(),
        };
        let task = runtime.spawn(run.run());

        Ok(PollHandle {
            job_id,
            token,
            shared,
            state: state_rx,
            task: Some(task),
        })
    }
}

/// Controls a running poller
///
/// Dropping the handle cancels the poller, so a view owning a handle only
/// has to drop it on teardown.
pub struct PollHandle<S, E> {
    job_id: JobId,
    token: CancellationToken,
    shared: Arc<Shared>,
    state: watch::Receiver<PollerState>,
    task: Option<JoinHandle<PollOutcome<S, E>>>,
}

impl<S, E> PollHandle<S, E> {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.state.clone()
    }

    /// Whether the polling task has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stops the poller
    ///
    /// Once this returns no listener method is invoked anymore, even for a
    /// fetch that is still in flight. Cancelling a stopped poller does
    /// nothing. Must not be called from inside a listener method of the
    /// same poller.
    pub fn cancel(&self) {
        if self.shared.close(StopReason::Cancelled) {
            info!("Cancelled poller for job {}", self.job_id);
        }
        self.token.cancel();
    }

    /// Waits for the poller to stop and returns how it ended
    ///
    /// # Panics
    /// Re-raises a panic of the terminal predicate or of the listener.
    pub async fn wait(mut self) -> PollOutcome<S, E> {
        let Some(task) = self.task.take() else {
            return PollOutcome::Cancelled;
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
            // Runtime shutting down
            Err(_) => PollOutcome::Cancelled,
        }
    }
}

impl<S, E> Drop for PollHandle<S, E> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// State shared between a handle and its polling task
struct Shared {
    /// `true` while listener methods may still be invoked
    gate: Mutex<bool>,
    state: watch::Sender<PollerState>,
}

impl Shared {
    /// Runs `deliver` unless the gate is closed, then closes the gate if it
    /// returned a stop reason. Returns `false` when the gate was already closed.
    fn emit(&self, deliver: impl FnOnce() -> Option<StopReason>) -> bool {
        let mut open = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !*open {
            return false;
        }

        if let Some(reason) = deliver() {
            *open = false;
            self.state.send_replace(PollerState::Stopped(reason));
        }
        true
    }

    /// Closes the gate without delivering anything
    fn close(&self, reason: StopReason) -> bool {
        self.emit(|| Some(reason))
    }
}

/// Everything the polling task owns
struct PollRun<F, P, L> {
    job_id: JobId,
    config: PollerConfig,
    deadline: Option<Instant>,
    fetcher: F,
    is_terminal: P,
    listener: L,
    shared: Arc<Shared>,
    token: CancellationToken,
}

impl<F, P, L> PollRun<F, P, L>
where
    F: StatusFetcher,
    P: Fn(&F::Status) -> bool + Send + 'static,
    L: PollListener<F::Status, F::Error>,
{
    async fn run(mut self) -> PollOutcome<F::Status, F::Error> {
        let mut last_status: Option<F::Status> = None;
        let mut consecutive_errors: u32 = 0;
        let mut tick: u64 = 0;
        let mut delay = if self.config.fetch_immediately {
            Duration::ZERO
        } else {
            self.config.interval
        };

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return self.cancelled(tick),
                _ = deadline_elapsed(self.deadline) => return self.time_out(last_status),
                _ = time::sleep(delay) => {}
            }

            tick += 1;
            debug!("Checking status of job {} (tick {})", self.job_id, tick);

            // Dropping the in-flight fetch discards its result
            let result = tokio::select! {
                biased;
                _ = self.token.cancelled() => return self.cancelled(tick),
                _ = deadline_elapsed(self.deadline) => return self.time_out(last_status),
                result = self.fetcher.fetch_status(&self.job_id) => result,
            };

            match result {
                Ok(status) => {
                    if consecutive_errors > 0 {
                        debug!(
                            "Status check for job {} recovered after {} failure(s)",
                            self.job_id, consecutive_errors
                        );
                    }
                    consecutive_errors = 0;

                    let Some(terminal) = self.deliver_update(&status) else {
                        return self.cancelled(tick);
                    };

                    if terminal {
                        info!(
                            "Job {} reached a terminal status after {} check(s)",
                            self.job_id, tick
                        );
                        return PollOutcome::Terminal(status);
                    }

                    last_status = Some(status);
                    delay = self.config.interval;
                }
                Err(e) => {
                    consecutive_errors = consecutive_errors.saturating_add(1);

                    if consecutive_errors > self.config.max_consecutive_errors {
                        error!(
                            "Giving up on job {} after {} consecutive failed status checks: {}",
                            self.job_id, consecutive_errors, e
                        );
                        let listener = &mut self.listener;
                        let delivered = self.shared.emit(|| {
                            listener.on_error(&e);
                            Some(StopReason::ErrorBudget)
                        });
                        if !delivered {
                            return self.cancelled(tick);
                        }
                        return PollOutcome::ErrorBudgetExhausted(e);
                    }

                    delay = self.config.delay_after_failures(consecutive_errors);
                    warn!(
                        "Status check for job {} failed ({}/{} tolerated): {}; retrying in {:?}",
                        self.job_id, consecutive_errors, self.config.max_consecutive_errors, e, delay
                    );
                }
            }
        }
    }

    /// Classifies and reports a fetched status behind the gate
    ///
    /// Returns whether the status is terminal, or `None` when the poller was
    /// cancelled before the status could be delivered.
    fn deliver_update(&mut self, status: &F::Status) -> Option<bool> {
        let is_terminal = &self.is_terminal;
        let listener = &mut self.listener;
        let mut terminal = false;
        let delivered = self.shared.emit(|| {
            terminal = is_terminal(status);
            listener.on_update(status);
            terminal.then_some(StopReason::Terminal)
        });
        delivered.then_some(terminal)
    }

    fn cancelled(&self, tick: u64) -> PollOutcome<F::Status, F::Error> {
        debug!(
            "Poller for job {} stopped by cancellation after {} check(s)",
            self.job_id, tick
        );
        PollOutcome::Cancelled
    }

    fn time_out(&mut self, last_status: Option<F::Status>) -> PollOutcome<F::Status, F::Error> {
        warn!(
            "Job {} did not reach a terminal status within {:?}",
            self.job_id, self.config.max_duration
        );

        let listener = &mut self.listener;
        let delivered = self.shared.emit(|| {
            listener.on_timeout(last_status.as_ref());
            Some(StopReason::Timeout)
        });
        if !delivered {
            return PollOutcome::Cancelled;
        }

        PollOutcome::TimedOut { last_status }
    }
}

/// Resolves at the deadline, never when there is none
async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
