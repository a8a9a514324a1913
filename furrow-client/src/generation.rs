//! Field plan and report generation endpoints

use crate::error::Result;
use crate::{FarmClient, require_segment};
use furrow_core::domain::JobId;
use furrow_core::dto::generation::{
    GenerateFieldPlan, GenerateReport, GenerationJob, GenerationStatusResponse,
};

impl FarmClient {
    // =============================================================================
    // Field Plans
    // =============================================================================

    /// Start generating a field plan
    ///
    /// # Arguments
    /// * `req` - The field and season to plan
    pub async fn generate_field_plan(&self, req: GenerateFieldPlan) -> Result<GenerationJob> {
        require_segment(&req.field_id, "field id")?;
        let response = self.post(&["field-plans", "generate"])?.json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get the status of a field plan generation
    pub async fn field_plan_status(&self, job_id: &JobId) -> Result<GenerationStatusResponse> {
        let job_id = require_segment(job_id.as_str(), "job id")?;
        let response = self
            .get(&["field-plans", "jobs", job_id])?
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Reports
    // =============================================================================

    /// Start generating a report for a field
    ///
    /// # Arguments
    /// * `req` - The field and report kind
    pub async fn generate_report(&self, req: GenerateReport) -> Result<GenerationJob> {
        require_segment(&req.field_id, "field id")?;
        require_segment(&req.kind, "report kind")?;
        let response = self.post(&["reports", "generate"])?.json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get the status of a report generation
    pub async fn report_status(&self, job_id: &JobId) -> Result<GenerationStatusResponse> {
        let job_id = require_segment(job_id.as_str(), "job id")?;
        let response = self.get(&["reports", "jobs", job_id])?.send().await?;

        self.handle_response(response).await
    }
}
