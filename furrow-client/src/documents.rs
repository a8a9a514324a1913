//! Document processing endpoints

use crate::error::Result;
use crate::{FarmClient, require_segment};
use furrow_core::domain::JobId;
use furrow_core::dto::document::{DocumentJob, DocumentStatusResponse};

impl FarmClient {
    // =============================================================================
    // Document Processing
    // =============================================================================

    /// Start AI processing of an uploaded document or photo
    ///
    /// # Arguments
    /// * `document_id` - ID of the uploaded document
    ///
    /// # Returns
    /// The processing job, whose status can then be polled
    pub async fn process_document(&self, document_id: &str) -> Result<DocumentJob> {
        let document_id = require_segment(document_id, "document id")?;
        let response = self
            .post(&["documents", document_id, "process"])?
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the status of a document processing job
    ///
    /// # Arguments
    /// * `job_id` - The processing job ID
    pub async fn document_status(&self, job_id: &JobId) -> Result<DocumentStatusResponse> {
        let job_id = require_segment(job_id.as_str(), "job id")?;
        let response = self
            .get(&["documents", "jobs", job_id, "status"])?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
