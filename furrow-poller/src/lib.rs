//! Furrow Poller
//!
//! Watches an asynchronous backend job by fetching its status on a fixed
//! cadence until the job reaches a terminal status, a deadline passes, too
//! many status checks fail in a row, or the owner cancels it.
//!
//! The poller never interprets statuses itself: callers supply the fetch
//! function and the predicate deciding what "terminal" means for their job.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use furrow_core::domain::JobId;
//! use furrow_poller::{Callbacks, JobStatusPoller, PollOutcome, PollerConfig, fetch_fn};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PollerConfig::new(Duration::from_secs(3))
//!         .with_max_duration(Some(Duration::from_secs(60)));
//!
//!     let fetcher = fetch_fn(|_job_id: JobId| async move {
//!         Ok::<_, String>("COMPLETED".to_string())
//!     });
//!
//!     let handle = JobStatusPoller::new(config).start(
//!         JobId::from("doc-42"),
//!         fetcher,
//!         |status: &String| status == "COMPLETED" || status == "FAILED",
//!         Callbacks::new().on_update(|status: &String| println!("status: {status}")),
//!     )?;
//!
//!     if let PollOutcome::Terminal(status) = handle.wait().await {
//!         println!("finished with {status}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod listener;
mod poller;
pub mod state;

pub use config::{PollerConfig, RetryPolicy};
pub use error::{PollerError, Result};
pub use fetcher::{FnFetcher, StatusFetcher, fetch_fn};
pub use listener::{Callbacks, PollListener};
pub use poller::{JobStatusPoller, PollHandle};
pub use state::{PollOutcome, PollerState, StopReason};
