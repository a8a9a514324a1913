//! Furrow HTTP Client
//!
//! A small, type-safe HTTP client for the farm-management API endpoints that
//! start asynchronous backend jobs and report their status.
//!
//! # Example
//!
//! ```no_run
//! use furrow_client::FarmClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FarmClient::new("http://localhost:8000").with_token("secret");
//!
//!     let job = client.process_document("doc-42").await?;
//!     let status = client.document_status(&job.job_id).await?;
//!
//!     println!("Document {} is {}", job.document_id, status.status);
//!     Ok(())
//! }
//! ```

mod documents;
pub mod error;
pub mod fetchers;
mod generation;
mod imports;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use fetchers::{
    DocumentStatusFetcher, FieldPlanStatusFetcher, ImportStatusFetcher, ReportStatusFetcher,
};

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the farm-management API
///
/// Endpoints are organized into groups:
/// - Document and photo processing
/// - John Deere field imports
/// - Field plan and report generation
#[derive(Debug, Clone)]
pub struct FarmClient {
    /// Base URL of the API (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token sent with every request, if any
    token: Option<String>,
}

impl FarmClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use furrow_client::FarmClient;
    ///
    /// let client = FarmClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use furrow_client::FarmClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = FarmClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
        }
    }

    /// Authenticate every request with a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL under `/api`
    ///
    /// Every segment is percent-encoded on its own, so an id containing
    /// `/`, `?` or `#` stays a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "Base URL '{}' cannot have a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.authorize(self.client.get(self.url(segments)?)))
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.authorize(self.client.post(self.url(segments)?)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!("API request failed with status {}: {}", status, error_text);
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Rejects empty path segments before they reach a URL
fn require_segment<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} must not be empty", what)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = FarmClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert!(client.token.is_none());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = FarmClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = FarmClient::with_client("http://localhost:8000", http_client);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_url_building() {
        let client = FarmClient::new("https://farm.example.com/");
        assert_eq!(
            client.url(&["documents", "doc-1", "status"]).unwrap().as_str(),
            "https://farm.example.com/api/documents/doc-1/status"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = FarmClient::new("https://farm.example.com/v2/");
        assert_eq!(
            client.url(&["reports", "jobs", "r-1"]).unwrap().as_str(),
            "https://farm.example.com/v2/api/reports/jobs/r-1"
        );
    }

    #[test]
    fn test_url_encodes_reserved_characters_in_ids() {
        let client = FarmClient::new("http://localhost:8000");
        let url = client
            .url(&["documents", "jobs", "a/b?x=1", "status"])
            .unwrap();
        assert_eq!(url.path(), "/api/documents/jobs/a%2Fb%3Fx=1/status");
        assert_eq!(url.query(), None);

        let url = client.url(&["reports", "jobs", "r#1"]).unwrap();
        assert_eq!(url.path(), "/api/reports/jobs/r%231");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_status_request_targets_a_single_segment() {
        let client = FarmClient::new("http://localhost:8000");
        let request = client
            .get(&["documents", "jobs", "a/b?x=1", "status"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/documents/jobs/a%2Fb%3Fx=1/status"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let client = FarmClient::new("localhost:8000");
        assert!(matches!(
            client.url(&["reports"]),
            Err(ClientError::InvalidRequest(_))
        ));

        let client = FarmClient::new("not a url");
        assert!(matches!(
            client.get(&["reports"]),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_bearer_token_is_attached() {
        let client = FarmClient::new("http://localhost:8000").with_token("abc");
        let request = client.get(&["reports", "r-1"]).unwrap().build().unwrap();
        let header = request.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(header, "Bearer abc");
    }

    #[test]
    fn test_no_auth_header_without_token() {
        let client = FarmClient::new("http://localhost:8000");
        let request = client.get(&["reports", "r-1"]).unwrap().build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_require_segment() {
        assert_eq!(require_segment(" doc-1 ", "document id").unwrap(), "doc-1");
        assert!(matches!(
            require_segment("  ", "document id"),
            Err(ClientError::InvalidRequest(_))
        ));
    }
}
