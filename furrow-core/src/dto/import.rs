//! Field import DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;
use crate::domain::status::ImportStatus;

/// Request to import field boundaries from a John Deere organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartImport {
    pub organization_id: String,
    /// Restrict the import to these fields; all fields when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_ids: Vec<String>,
}

/// Response to a field import request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub job_id: JobId,
    pub status: ImportStatus,
}

/// Current state of a field import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStatusResponse {
    pub job_id: JobId,
    pub status: ImportStatus,
    #[serde(default)]
    pub imported_fields: u32,
    #[serde(default)]
    pub total_fields: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ImportStatusResponse {
    /// Import progress as a percentage, when the total is known
    pub fn progress_percent(&self) -> Option<u8> {
        match self.total_fields {
            Some(0) | None => None,
            Some(total) => {
                let done = self.imported_fields.min(total);
                Some(((u64::from(done) * 100) / u64::from(total)) as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(imported: u32, total: Option<u32>) -> ImportStatusResponse {
        ImportStatusResponse {
            job_id: JobId::from("imp-1"),
            status: ImportStatus::InProgress,
            imported_fields: imported,
            total_fields: total,
            error: None,
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(response(5, Some(20)).progress_percent(), Some(25));
        assert_eq!(response(20, Some(20)).progress_percent(), Some(100));
        assert_eq!(response(3, None).progress_percent(), None);
        assert_eq!(response(0, Some(0)).progress_percent(), None);
    }

    #[test]
    fn test_progress_is_capped() {
        assert_eq!(response(30, Some(20)).progress_percent(), Some(100));
    }

    #[test]
    fn test_start_import_omits_empty_field_filter() {
        let req = StartImport {
            organization_id: "org-7".to_string(),
            field_ids: Vec::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "organization_id": "org-7" }));
    }
}
