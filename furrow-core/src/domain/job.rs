//! Job domain types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a backend job
///
/// Supplied by the backend when the job is started and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Parses a job id, rejecting empty or whitespace-only input
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of asynchronous backend job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// AI extraction of an uploaded document or photo
    DocumentProcessing,
    /// Field boundary import from the John Deere operations center
    FieldImport,
    /// Field plan generation
    FieldPlanGeneration,
    /// Scouting/field report generation
    ReportGeneration,
}

impl JobKind {
    /// Default polling cadence and limits for this kind of job
    pub fn profile(self) -> PollProfile {
        match self {
            JobKind::DocumentProcessing => PollProfile {
                interval: Duration::from_millis(3_000),
                max_duration: Some(Duration::from_millis(60_000)),
                max_consecutive_errors: 3,
            },
            // Imports of large organizations routinely run for minutes
            JobKind::FieldImport => PollProfile {
                interval: Duration::from_millis(2_000),
                max_duration: None,
                max_consecutive_errors: 20,
            },
            JobKind::FieldPlanGeneration => PollProfile {
                interval: Duration::from_millis(3_000),
                max_duration: Some(Duration::from_millis(60_000)),
                max_consecutive_errors: 5,
            },
            JobKind::ReportGeneration => PollProfile {
                interval: Duration::from_millis(10_000),
                max_duration: Some(Duration::from_millis(60_000)),
                max_consecutive_errors: 3,
            },
        }
    }

    /// Human readable name used in logs and terminal output
    pub fn display_name(self) -> &'static str {
        match self {
            JobKind::DocumentProcessing => "document processing",
            JobKind::FieldImport => "field import",
            JobKind::FieldPlanGeneration => "field plan generation",
            JobKind::ReportGeneration => "report generation",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Polling cadence and limits for one kind of job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProfile {
    /// Delay between two status checks
    pub interval: Duration,
    /// Overall deadline after which polling stops, if any
    pub max_duration: Option<Duration>,
    /// Number of consecutive failed status checks tolerated
    pub max_consecutive_errors: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_parse_trims() {
        let id = JobId::parse("  doc-42 ").unwrap();
        assert_eq!(id.as_str(), "doc-42");
        assert_eq!(id.to_string(), "doc-42");
    }

    #[test]
    fn test_job_id_parse_rejects_empty() {
        assert!(JobId::parse("").is_none());
        assert!(JobId::parse("   ").is_none());
    }

    #[test]
    fn test_job_id_is_transparent_on_the_wire() {
        let id = JobId::from("imp_123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"imp_123\"");
        let back: JobId = serde_json::from_str("\"imp_123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_profiles_match_observed_cadences() {
        let doc = JobKind::DocumentProcessing.profile();
        assert_eq!(doc.interval, Duration::from_secs(3));
        assert_eq!(doc.max_duration, Some(Duration::from_secs(60)));

        let import = JobKind::FieldImport.profile();
        assert_eq!(import.interval, Duration::from_secs(2));
        assert_eq!(import.max_duration, None);
        assert_eq!(import.max_consecutive_errors, 20);

        assert_eq!(
            JobKind::ReportGeneration.profile().interval,
            Duration::from_secs(10)
        );
    }
}
