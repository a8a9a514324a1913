//! Field plan and report generation DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;
use crate::domain::status::GenerationStatus;

/// Request to generate a field plan for a season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFieldPlan {
    pub field_id: String,
    pub season: u16,
}

/// Request to generate a report for a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReport {
    pub field_id: String,
    /// Report kind, e.g. "scouting" or "yield"
    pub kind: String,
}

/// Response to a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub job_id: JobId,
    pub status: GenerationStatus,
}

/// Current state of a field plan or report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStatusResponse {
    pub job_id: JobId,
    pub status: GenerationStatus,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}
