//! Remote store client
//!
//! `RemoteStore` is the abstract surface the sync policy writes through;
//! `HttpStore` is the production implementation talking to spoke-ui. Tests
//! substitute in-memory implementations.

use async_trait::async_trait;
use spoke_common::api::types::{CreateAssessmentRequest, UpdateAssessmentRequest};
use spoke_common::db::models::Assessment;
use std::time::Duration;
use thiserror::Error;

/// Remote store failures, by how the caller should react
#[derive(Debug, Error)]
pub enum StoreError {
    /// Absent/expired/invalid credential. Background saves treat this like a
    /// connectivity failure; user-initiated operations surface it.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Record does not exist or belongs to another user. Surfaced, no retry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the payload. Retrying the same payload is futile.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Network or server failure. The next edit retries through the normal
    /// debounce path; there is no automatic retry loop.
    #[error("Transient failure: {0}")]
    Transient(String),
}

/// Abstract remote record store (create/update/fetch/delete)
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn create(&self, request: &CreateAssessmentRequest) -> Result<Assessment, StoreError>;
    async fn update(
        &self,
        id: &str,
        request: &UpdateAssessmentRequest,
    ) -> Result<Assessment, StoreError>;
    async fn get(&self, id: &str) -> Result<Assessment, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// HTTP client for the spoke-ui assessment API
pub struct HttpStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpStore {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:5750`) using a
    /// session token obtained from POST /api/login
    pub fn new(base_url: &str, token: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StoreError::Transient(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map an error response onto the store taxonomy
    async fn error_for(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(no body)"));

        match status.as_u16() {
            401 => StoreError::Auth(detail),
            404 => StoreError::NotFound(detail),
            400 => StoreError::Validation(detail),
            _ => StoreError::Transient(format!("HTTP {}: {}", status, detail)),
        }
    }

    async fn parse_assessment(response: reqwest::Response) -> Result<Assessment, StoreError> {
        response
            .json::<Assessment>()
            .await
            .map_err(|e| StoreError::Transient(format!("Malformed response: {}", e)))
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn create(&self, request: &CreateAssessmentRequest) -> Result<Assessment, StoreError> {
        let response = self
            .client
            .post(self.url("/api/assessments"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Self::parse_assessment(response).await
    }

    async fn update(
        &self,
        id: &str,
        request: &UpdateAssessmentRequest,
    ) -> Result<Assessment, StoreError> {
        let response = self
            .client
            .put(self.url(&format!("/api/assessments/{}", id)))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Self::parse_assessment(response).await
    }

    async fn get(&self, id: &str) -> Result<Assessment, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/api/assessments/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        // The detail response carries derived averages alongside the record
        // fields; unknown fields are ignored here.
        Self::parse_assessment(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/assessments/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(())
    }
}
