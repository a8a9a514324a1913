//! Status fetchers
//!
//! Adapters exposing the status endpoints as [`StatusFetcher`]s so each job
//! kind can be handed to a `JobStatusPoller`. The full response is the
//! polled status, letting callers render progress and results.

use std::sync::Arc;

use async_trait::async_trait;
use furrow_core::domain::JobId;
use furrow_core::dto::document::DocumentStatusResponse;
use furrow_core::dto::generation::GenerationStatusResponse;
use furrow_core::dto::import::ImportStatusResponse;
use furrow_poller::StatusFetcher;

use crate::FarmClient;
use crate::error::ClientError;

/// Polls document processing jobs
#[derive(Debug, Clone)]
pub struct DocumentStatusFetcher {
    client: Arc<FarmClient>,
}

impl DocumentStatusFetcher {
    pub fn new(client: Arc<FarmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusFetcher for DocumentStatusFetcher {
    type Status = DocumentStatusResponse;
    type Error = ClientError;

    async fn fetch_status(&self, job_id: &JobId) -> Result<Self::Status, Self::Error> {
        self.client.document_status(job_id).await
    }
}

/// Polls John Deere field imports
#[derive(Debug, Clone)]
pub struct ImportStatusFetcher {
    client: Arc<FarmClient>,
}

impl ImportStatusFetcher {
    pub fn new(client: Arc<FarmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusFetcher for ImportStatusFetcher {
    type Status = ImportStatusResponse;
    type Error = ClientError;

    async fn fetch_status(&self, job_id: &JobId) -> Result<Self::Status, Self::Error> {
        self.client.field_import_status(job_id).await
    }
}

/// Polls field plan generations
#[derive(Debug, Clone)]
pub struct FieldPlanStatusFetcher {
    client: Arc<FarmClient>,
}

impl FieldPlanStatusFetcher {
    pub fn new(client: Arc<FarmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusFetcher for FieldPlanStatusFetcher {
    type Status = GenerationStatusResponse;
    type Error = ClientError;

    async fn fetch_status(&self, job_id: &JobId) -> Result<Self::Status, Self::Error> {
        self.client.field_plan_status(job_id).await
    }
}

/// Polls report generations
#[derive(Debug, Clone)]
pub struct ReportStatusFetcher {
    client: Arc<FarmClient>,
}

impl ReportStatusFetcher {
    pub fn new(client: Arc<FarmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusFetcher for ReportStatusFetcher {
    type Status = GenerationStatusResponse;
    type Error = ClientError;

    async fn fetch_status(&self, job_id: &JobId) -> Result<Self::Status, Self::Error> {
        self.client.report_status(job_id).await
    }
}
