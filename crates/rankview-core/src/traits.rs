use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{ProgressUpdate, ResultSet, UserPersona};
use crate::wire::{HealthStatus, SearchRequest, SearchResponse};

/// The remote search service. Accepts a job, reports its progress and hands
/// back the two ranked lists once it is complete.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// `POST search`; returns the opaque job id.
    async fn start_search(&self, request: &SearchRequest) -> Result<String, ServiceError>;
    /// `GET search/{id}/progress`.
    async fn progress(&self, job_id: &str) -> Result<ProgressUpdate, ServiceError>;
    /// `GET search/{id}`.
    async fn results(&self, job_id: &str) -> Result<SearchResponse, ServiceError>;
    async fn personas(&self) -> Result<Vec<UserPersona>, ServiceError>;
    async fn health(&self) -> HealthStatus;
}

/// Receives the final sets of a completed job.
///
/// Invoked while the orchestrator holds its state lock, so implementations
/// must not call back into the orchestrator.
pub trait ResultSink: Send + Sync {
    fn ingest_completed_job(&self, baseline: ResultSet, enhanced: ResultSet);
}

/// Vertical layout box of a rendered item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

/// Any rendering surface able to report where an item currently sits.
pub trait LayoutProvider {
    /// `None` when the item is not rendered.
    fn rect(&self, item_id: &str) -> Option<Rect>;
}
