//! Status fetch abstraction
//!
//! A fetcher only reads the current status of a job. It must be safe to call
//! repeatedly: the poller calls it once per tick and never concurrently.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use furrow_core::domain::JobId;

/// Reads the current status of a job from its backend
#[async_trait]
pub trait StatusFetcher: Send + Sync + 'static {
    /// Status reported by the backend
    type Status: Send + Sync + 'static;
    /// Error of a single failed status check
    type Error: fmt::Display + Send + Sync + 'static;

    async fn fetch_status(&self, job_id: &JobId) -> Result<Self::Status, Self::Error>;
}

/// [`StatusFetcher`] backed by a closure, see [`fetch_fn`]
#[derive(Clone)]
pub struct FnFetcher<F> {
    f: F,
}

/// Wraps a closure returning a future as a [`StatusFetcher`]
///
/// # Example
/// ```
/// use furrow_core::domain::JobId;
/// use furrow_poller::fetch_fn;
///
/// let fetcher = fetch_fn(|job_id: JobId| async move {
///     Ok::<_, String>(format!("status of {job_id}"))
/// });
/// # let _ = fetcher;
/// ```
pub fn fetch_fn<F, Fut, S, E>(f: F) -> FnFetcher<F>
where
    F: Fn(JobId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut, S, E> StatusFetcher for FnFetcher<F>
where
    F: Fn(JobId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send,
    S: Send + Sync + 'static,
    E: fmt::Display + Send + Sync + 'static,
{
    type Status = S;
    type Error = E;

    async fn fetch_status(&self, job_id: &JobId) -> Result<S, E> {
        (self.f)(job_id.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_fetcher_receives_job_id() {
        let fetcher = fetch_fn(|job_id: JobId| async move {
            if job_id.as_str() == "known" {
                Ok(7u32)
            } else {
                Err(format!("unknown job {job_id}"))
            }
        });

        assert_eq!(fetcher.fetch_status(&JobId::from("known")).await, Ok(7));
        assert_eq!(
            fetcher.fetch_status(&JobId::from("other")).await,
            Err("unknown job other".to_string())
        );
    }
}
