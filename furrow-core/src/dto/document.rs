//! Document processing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;
use crate::domain::status::DocumentStatus;

/// Response to a request to process an uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentJob {
    pub job_id: JobId,
    pub document_id: String,
    pub status: DocumentStatus,
}

/// Current state of a document processing job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatusResponse {
    pub job_id: JobId,
    pub status: DocumentStatus,
    #[serde(default)]
    pub document_type: Option<String>,
    /// Extracted fields, present once processing completed
    #[serde(default)]
    pub extracted: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}
