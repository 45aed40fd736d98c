//! Request/response contracts of the remote search service. Field names are
//! part of the compatibility surface and must not change.

use serde::{Deserialize, Serialize};

use crate::types::{null_as_default, ComparisonSummary, ResultItem, SearchStage};

/// Feature switches copied into every `SearchRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub vector_search_enabled: bool,
    pub reranker_enabled: bool,
    pub reasoning_enabled: bool,
    pub model: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { vector_search_enabled: true, reranker_enabled: true, reasoning_enabled: true, model: None }
    }
}

/// Body of `POST search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub customer: String,
    pub vector_search_enabled: bool,
    pub reranker_enabled: bool,
    pub reasoning_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, customer: impl Into<String>, options: &SearchOptions) -> Self {
        Self {
            query: query.into(),
            customer: customer.into(),
            vector_search_enabled: options.vector_search_enabled,
            reranker_enabled: options.reranker_enabled,
            reasoning_enabled: options.reasoning_enabled,
            model: options.model.clone(),
        }
    }
}

/// Body of `GET search/{id}` once the job is complete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(rename = "search_id")]
    pub search_id: String,
    pub progress: SearchStage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub standard_results: Vec<ResultItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_results: Vec<ResultItem>,
    #[serde(default)]
    pub summary: Option<ComparisonSummary>,
}

/// Result of `GET /health`. Failures are folded into an `unhealthy` status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self { status: "unhealthy".to_string(), error: Some(error.into()), details: serde_json::Map::new() }
    }

    pub fn is_healthy(&self) -> bool { self.status == "healthy" || self.status == "ok" }
}
