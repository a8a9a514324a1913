//! John Deere field import endpoints

use crate::error::Result;
use crate::{FarmClient, require_segment};
use furrow_core::domain::JobId;
use furrow_core::dto::import::{ImportJob, ImportStatusResponse, StartImport};

impl FarmClient {
    // =============================================================================
    // Field Import
    // =============================================================================

    /// Start importing field boundaries from a John Deere organization
    ///
    /// # Arguments
    /// * `req` - The organization and optional field filter
    ///
    /// # Returns
    /// The import job
    pub async fn start_field_import(&self, req: StartImport) -> Result<ImportJob> {
        require_segment(&req.organization_id, "organization id")?;
        let response = self.post(&["john-deere", "import"])?.json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get the status and progress of a field import
    ///
    /// # Arguments
    /// * `job_id` - The import job ID
    pub async fn field_import_status(&self, job_id: &JobId) -> Result<ImportStatusResponse> {
        let job_id = require_segment(job_id.as_str(), "job id")?;
        let response = self
            .get(&["john-deere", "import", job_id, "status"])?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
