//! rankview-client
//!
//! `SearchService` over HTTP/JSON. Every call is a single request: no retry,
//! no backoff. Non-2xx answers become `ServiceError::Status`.
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use rankview_core::config::Settings;
use rankview_core::error::ServiceError;
use rankview_core::traits::SearchService;
use rankview_core::types::{ProgressUpdate, UserPersona};
use rankview_core::wire::{HealthStatus, SearchRequest, SearchResponse};

pub struct HttpSearchService {
    client: Client,
    base_url: String,
}

impl HttpSearchService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| ServiceError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ServiceError> {
        Self::new(settings.api.base_url.clone(), settings.request_timeout())
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self.client.get(self.url(path)).send().await.map_err(transport)?;
        decode(path, response).await
    }
}

fn transport(e: reqwest::Error) -> ServiceError { ServiceError::Transport(e.to_string()) }

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        warn!(endpoint, code = status.as_u16(), "search service returned an error status");
        return Err(ServiceError::Status {
            endpoint: endpoint.to_string(),
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        });
    }
    let bytes = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(format!("{endpoint}: {e}")))
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn start_search(&self, request: &SearchRequest) -> Result<String, ServiceError> {
        debug!(query = %request.query, customer = %request.customer, "starting search");
        let response = self.client.post(self.url("/api/search")).json(request).send().await.map_err(transport)?;
        decode("/api/search", response).await
    }

    async fn progress(&self, job_id: &str) -> Result<ProgressUpdate, ServiceError> {
        self.get_json(&format!("/api/search/{job_id}/progress")).await
    }

    async fn results(&self, job_id: &str) -> Result<SearchResponse, ServiceError> {
        self.get_json(&format!("/api/search/{job_id}")).await
    }

    async fn personas(&self) -> Result<Vec<UserPersona>, ServiceError> {
        let personas: Vec<UserPersona> = self.get_json("/api/personas").await?;
        for p in personas.iter().filter(|p| !p.has_valid_weights()) {
            warn!(persona = %p.id, "persona weights outside [0, 1]");
        }
        Ok(personas)
    }

    async fn health(&self) -> HealthStatus {
        match self.get_json::<HealthStatus>("/health").await {
            Ok(status) => status,
            Err(ServiceError::Status { reason, code, .. }) => HealthStatus::unhealthy(if reason.is_empty() { code.to_string() } else { reason }),
            Err(e) => HealthStatus::unhealthy(e.to_string()),
        }
    }
}
