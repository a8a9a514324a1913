//! Job status types
//!
//! Each backend job family reports its own status vocabulary. Values the
//! client does not know yet are kept as `Unknown` and are never terminal, so
//! a newer backend cannot stop a poller early.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Common view over the status enums of all job families
pub trait JobState {
    /// Whether no further transition can occur from this status
    fn is_terminal(&self) -> bool;

    /// Whether this is a terminal status describing a failed job
    fn is_failure(&self) -> bool;

    /// Wire representation of the status
    fn label(&self) -> &str;
}

/// Status of an AI document/photo processing job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Unknown(String),
}

impl From<String> for DocumentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "PROCESSING" => Self::Processing,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(value: DocumentStatus) -> Self {
        value.label().to_string()
    }
}

impl JobState for DocumentStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }

    fn label(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown(raw) => raw,
        }
    }
}

/// Status of a John Deere field import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImportStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Unknown(String),
}

impl From<String> for ImportStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ImportStatus> for String {
    fn from(value: ImportStatus) -> Self {
        value.label().to_string()
    }
}

impl JobState for ImportStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }

    fn label(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }
}

/// Status of a field plan or report generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenerationStatus {
    Queued,
    Generating,
    Ready,
    Failed,
    Unknown(String),
}

impl From<String> for GenerationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => Self::Queued,
            "generating" => Self::Generating,
            "ready" => Self::Ready,
            "failed" => Self::Failed,
            _ => Self::Unknown(value),
        }
    }
}

impl From<GenerationStatus> for String {
    fn from(value: GenerationStatus) -> Self {
        value.label().to_string()
    }
}

impl JobState for GenerationStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }

    fn label(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_status_wire_format() {
        let status: DocumentStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(status, DocumentStatus::Processing);
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn test_import_status_is_snake_case() {
        let status: ImportStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, ImportStatus::InProgress);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_unknown_status_is_kept_and_never_terminal() {
        let status: GenerationStatus = serde_json::from_str("\"archiving\"").unwrap();
        assert_eq!(status, GenerationStatus::Unknown("archiving".to_string()));
        assert!(!status.is_terminal());
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"archiving\"");
    }

    #[test]
    fn test_terminal_and_failure_predicates() {
        assert!(DocumentStatus::Completed.is_terminal());
        assert!(!DocumentStatus::Completed.is_failure());
        assert!(DocumentStatus::Failed.is_terminal());
        assert!(DocumentStatus::Failed.is_failure());
        assert!(!DocumentStatus::Pending.is_terminal());

        assert!(GenerationStatus::Ready.is_terminal());
        assert!(!GenerationStatus::Generating.is_terminal());
        assert!(ImportStatus::Failed.is_failure());
    }

    #[test]
    fn test_case_matters_on_the_wire() {
        // Document statuses are upper case; a lower-case value is not recognized
        let status: DocumentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert!(matches!(status, DocumentStatus::Unknown(_)));
    }
}
