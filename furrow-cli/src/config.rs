//! Configuration module
//!
//! Handles CLI configuration: API connection settings and the overrides
//! applied on top of each job kind's polling profile.

use std::time::Duration;

use anyhow::{Result, bail};
use furrow_client::FarmClient;
use furrow_core::domain::JobKind;
use furrow_poller::{PollerConfig, RetryPolicy};

/// Upper bound of the exponential backoff, in multiples of the interval
const BACKOFF_MAX_MULTIPLIER: u32 = 8;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the farm-management API
    pub api_url: String,

    /// Bearer token for the API
    pub api_token: Option<String>,

    /// Polling overrides from the command line
    pub poll: PollOverrides,
}

/// Command line overrides of the per-kind polling profile
#[derive(Debug, Clone, Default)]
pub struct PollOverrides {
    pub interval_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    /// Poll without any deadline
    pub no_deadline: bool,
    pub max_errors: Option<u32>,
    /// Back off exponentially after failed status checks
    pub backoff: bool,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!("api_url must start with http:// or https://");
        }

        if self.api_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            bail!("api_token cannot be blank");
        }

        Ok(())
    }

    /// Builds the API client
    pub fn client(&self) -> FarmClient {
        let client = FarmClient::new(self.api_url.clone());
        match &self.api_token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }

    /// Poller configuration for `kind`, with the command line overrides applied
    ///
    /// `fetch_immediately` is set when watching a job that is already
    /// running, so the first status shows up without waiting an interval.
    pub fn poller_config(&self, kind: JobKind, fetch_immediately: bool) -> Result<PollerConfig> {
        let mut config = PollerConfig::from(kind.profile()).with_fetch_immediately(fetch_immediately);

        if let Some(ms) = self.poll.interval_ms {
            config.interval = Duration::from_millis(ms);
        }

        if self.poll.no_deadline {
            config.max_duration = None;
        } else if let Some(ms) = self.poll.max_duration_ms {
            config.max_duration = Some(Duration::from_millis(ms));
        }

        if let Some(max_errors) = self.poll.max_errors {
            config.max_consecutive_errors = max_errors;
        }

        if self.poll.backoff {
            config.retry = RetryPolicy::Exponential {
                factor: 2,
                max_delay: config.interval.saturating_mul(BACKOFF_MAX_MULTIPLIER),
            };
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api_url: "http://localhost:8000".to_string(),
            api_token: None,
            poll: PollOverrides::default(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();
        assert!(config.validate().is_ok());

        config.api_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://farm.example.com".to_string();
        config.api_token = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.api_token = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_used_without_overrides() {
        let poller = config()
            .poller_config(JobKind::DocumentProcessing, false)
            .unwrap();
        assert_eq!(poller.interval, Duration::from_secs(3));
        assert_eq!(poller.max_duration, Some(Duration::from_secs(60)));
        assert_eq!(poller.max_consecutive_errors, 3);
        assert_eq!(poller.retry, RetryPolicy::Fixed);
        assert!(!poller.fetch_immediately);
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = config();
        config.poll = PollOverrides {
            interval_ms: Some(500),
            max_duration_ms: Some(5_000),
            no_deadline: false,
            max_errors: Some(10),
            backoff: true,
        };

        let poller = config.poller_config(JobKind::ReportGeneration, true).unwrap();
        assert_eq!(poller.interval, Duration::from_millis(500));
        assert_eq!(poller.max_duration, Some(Duration::from_secs(5)));
        assert_eq!(poller.max_consecutive_errors, 10);
        assert_eq!(
            poller.retry,
            RetryPolicy::Exponential {
                factor: 2,
                max_delay: Duration::from_secs(4),
            }
        );
        assert!(poller.fetch_immediately);
    }

    #[test]
    fn test_no_deadline_wins() {
        let mut config = config();
        config.poll.max_duration_ms = Some(1_000);
        config.poll.no_deadline = true;

        let poller = config.poller_config(JobKind::FieldPlanGeneration, false).unwrap();
        assert_eq!(poller.max_duration, None);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = config();
        config.poll.interval_ms = Some(0);
        assert!(config.poller_config(JobKind::FieldImport, false).is_err());
    }
}
