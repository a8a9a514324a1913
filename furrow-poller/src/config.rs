//! Poller configuration
//!
//! Cadence, deadline and error budget of a single poller instance.

use std::time::Duration;

use furrow_core::domain::PollProfile;

use crate::error::{PollerError, Result};

/// How the delay before the next status check changes after failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep the regular interval after a failed check
    Fixed,
    /// After the n-th consecutive failure wait `interval * factor^(n-1)`,
    /// capped at `max_delay`
    Exponential { factor: u32, max_delay: Duration },
}

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Delay between two status checks
    pub interval: Duration,

    /// Overall deadline measured from `start`; `None` polls until another
    /// stop condition is met
    pub max_duration: Option<Duration>,

    /// Consecutive failed checks tolerated before giving up
    pub max_consecutive_errors: u32,

    /// Delay policy applied after failed checks
    pub retry: RetryPolicy,

    /// Fetch once right after `start` instead of waiting one interval
    pub fetch_immediately: bool,
}

impl PollerConfig {
    /// Creates a configuration with the given interval and default limits
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    pub fn with_max_consecutive_errors(mut self, max_consecutive_errors: u32) -> Self {
        self.max_consecutive_errors = max_consecutive_errors;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fetch_immediately(mut self, fetch_immediately: bool) -> Self {
        self.fetch_immediately = fetch_immediately;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(PollerError::InvalidConfig(
                "interval must be greater than 0".to_string(),
            ));
        }

        if self.max_duration.is_some_and(|d| d.is_zero()) {
            return Err(PollerError::InvalidConfig(
                "max_duration must be greater than 0".to_string(),
            ));
        }

        if let RetryPolicy::Exponential { factor, max_delay } = self.retry {
            if factor == 0 {
                return Err(PollerError::InvalidConfig(
                    "backoff factor must be at least 1".to_string(),
                ));
            }
            if max_delay < self.interval {
                return Err(PollerError::InvalidConfig(format!(
                    "backoff max_delay ({:?}) must not be shorter than interval ({:?})",
                    max_delay, self.interval
                )));
            }
        }

        Ok(())
    }

    /// Delay before the next check after `consecutive_errors` failures in a row
    pub fn delay_after_failures(&self, consecutive_errors: u32) -> Duration {
        match self.retry {
            RetryPolicy::Fixed => self.interval,
            RetryPolicy::Exponential { factor, max_delay } => {
                let exponent = consecutive_errors.saturating_sub(1);
                self.interval
                    .saturating_mul(factor.saturating_pow(exponent))
                    .min(max_delay)
            }
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_duration: Some(Duration::from_secs(60)),
            max_consecutive_errors: 3,
            retry: RetryPolicy::Fixed,
            fetch_immediately: false,
        }
    }
}

impl From<PollProfile> for PollerConfig {
    fn from(profile: PollProfile) -> Self {
        Self {
            interval: profile.interval,
            max_duration: profile.max_duration,
            max_consecutive_errors: profile.max_consecutive_errors,
            ..Self::default()
        }
    }
}
