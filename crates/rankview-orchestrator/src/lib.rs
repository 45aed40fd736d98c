//! rankview-orchestrator
//!
//! Submits a search job and polls it to a terminal stage.
//!
//! ```text
//! Idle ──submit──► Submitting ──job id──► Polling ──complete──► Complete
//!                       │                    │
//!                       └──────failure───────┴──error/failure──► Failed
//! ```
//!
//! Any phase accepts a new `submit`, which supersedes the current job. Every
//! continuation (submit response, progress response, result response) only
//! writes state if its job is still the current one; late answers for a
//! superseded job are dropped.
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use rankview_core::error::SearchError;
use rankview_core::schedule::ScheduledTask;
use rankview_core::state::StateContainer;
use rankview_core::traits::{ResultSink, SearchService};
use rankview_core::types::{ResultKind, ResultSet, SearchJob, SearchStage};
use rankview_core::wire::{SearchOptions, SearchRequest};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Complete,
    Failed,
}

/// Observable orchestrator state.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorState {
    pub phase: Phase,
    /// The current job, once the service has assigned an id.
    pub job: Option<SearchJob>,
    pub error: Option<SearchError>,
    ticket: u64,
    poll_task: Option<ScheduledTask>,
}

impl OrchestratorState {
    pub fn is_loading(&self) -> bool { matches!(self.phase, Phase::Submitting | Phase::Polling) }

    pub fn current_job_id(&self) -> Option<&str> { self.job.as_ref().map(|j| j.id.as_str()) }

    fn is_current(&self, job_id: &str) -> bool { self.phase == Phase::Polling && self.current_job_id() == Some(job_id) }
}

struct Inner {
    service: Arc<dyn SearchService>,
    sink: Arc<dyn ResultSink>,
    state: StateContainer<OrchestratorState>,
    poll_interval: Duration,
}

impl Inner {
    /// Runs `f` only if `job_id` is still the job being polled. Returns whether
    /// it was.
    fn apply_if_current<F>(&self, job_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut OrchestratorState) -> bool,
    {
        let mut current = false;
        self.state.update_if(|s| {
            if !s.is_current(job_id) { return false; }
            current = true;
            f(s)
        });
        if !current { debug!(job_id, "dropping result of superseded job"); }
        current
    }

    fn fail_if_current(&self, job_id: &str, error: SearchError) {
        let message = error.to_string();
        let failed = self.apply_if_current(job_id, |s| {
            s.phase = Phase::Failed;
            s.error = Some(error);
            s.poll_task = None;
            true
        });
        if failed { warn!(job_id, error = %message, "search job failed"); }
    }
}

/// Cheap to clone; clones drive the same state.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    pub fn new(service: Arc<dyn SearchService>, sink: Arc<dyn ResultSink>) -> Self {
        Self::with_poll_interval(service, sink, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(service: Arc<dyn SearchService>, sink: Arc<dyn ResultSink>, poll_interval: Duration) -> Self {
        Self { inner: Arc::new(Inner { service, sink, state: StateContainer::default(), poll_interval }) }
    }

    pub fn state(&self) -> OrchestratorState { self.inner.state.snapshot() }

    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> { self.inner.state.subscribe() }

    pub fn is_loading(&self) -> bool { self.inner.state.read(OrchestratorState::is_loading) }

    /// Starts a new job and makes it current.
    ///
    /// An empty query is rejected before anything changes. Otherwise the
    /// previous job (if any) is superseded immediately: its pending poll is
    /// cancelled and its in-flight answers are ignored from now on.
    ///
    /// Returns the job id assigned by the service. If another `submit`
    /// superseded this one while the request was in flight the id is still
    /// returned, but the job is not polled.
    pub async fn submit(&self, query: &str, customer_id: &str, options: &SearchOptions) -> Result<String, SearchError> {
        let query = query.trim();
        if query.is_empty() { return Err(SearchError::Submission("query must not be empty".to_string())); }

        let mut ticket = 0;
        self.inner.state.update(|s| {
            if let Some(task) = s.poll_task.take() { task.cancel(); }
            s.ticket += 1;
            ticket = s.ticket;
            s.phase = Phase::Submitting;
            s.job = None;
            s.error = None;
        });
        info!(ticket, query, customer = customer_id, "submitting search");

        let request = SearchRequest::new(query, customer_id, options);
        let job_id = match self.inner.service.start_search(&request).await {
            Ok(id) => id,
            Err(e) => {
                let error = SearchError::Submission(e.to_string());
                warn!(ticket, %error, "search submission failed");
                self.inner.state.update_if(|s| {
                    if s.ticket != ticket { return false; }
                    s.phase = Phase::Failed;
                    s.error = Some(error.clone());
                    true
                });
                return Err(error);
            }
        };

        let task = ScheduledTask::new();
        let accepted = self.inner.state.update_if(|s| {
            if s.ticket != ticket { return false; }
            s.phase = Phase::Polling;
            s.job = Some(SearchJob::new(job_id.clone()));
            s.poll_task = Some(task.clone());
            true
        });
        if accepted {
            info!(job_id = %job_id, "search accepted, polling");
            tokio::spawn(poll_job(self.inner.clone(), job_id.clone(), task));
        } else {
            debug!(job_id = %job_id, "submission superseded before it was accepted");
        }
        Ok(job_id)
    }
}

async fn poll_job(inner: Arc<Inner>, job_id: String, task: ScheduledTask) {
    loop {
        let update = match inner.service.progress(&job_id).await {
            Ok(update) => update,
            Err(e) => return inner.fail_if_current(&job_id, SearchError::Poll(e.to_string())),
        };

        let mut status = None;
        let current = inner.apply_if_current(&job_id, |s| match s.job.as_mut() {
            Some(job) => {
                let changed = job.apply(&update);
                status = Some(job.status);
                changed
            }
            None => false,
        });
        if !current { return; }
        debug!(job_id = %job_id, stage = ?update.stage, percentage = update.percentage, "progress");

        match status {
            Some(SearchStage::Complete) => return fetch_results(&inner, &job_id).await,
            Some(SearchStage::Error) => return inner.fail_if_current(&job_id, SearchError::Job(update.message)),
            _ => {}
        }

        if !task.sleep(inner.poll_interval).await {
            debug!(job_id = %job_id, "poll cancelled");
            return;
        }
    }
}

async fn fetch_results(inner: &Inner, job_id: &str) {
    let response = match inner.service.results(job_id).await {
        Ok(response) => response,
        Err(e) => return inner.fail_if_current(job_id, SearchError::Poll(e.to_string())),
    };
    let baseline = ResultSet::new(ResultKind::Baseline, response.standard_results);
    let enhanced = ResultSet::new(ResultKind::Enhanced, response.ai_results);
    if let Some(reported) = response.summary {
        let computed = rankview_diff::diff(&baseline, &enhanced);
        if computed != reported { debug!(job_id, ?reported, ?computed, "service summary differs from local diff"); }
    }

    let sink = inner.sink.clone();
    let (baseline_len, enhanced_len) = (baseline.len(), enhanced.len());
    let ingested = inner.apply_if_current(job_id, move |s| {
        sink.ingest_completed_job(baseline, enhanced);
        s.phase = Phase::Complete;
        s.poll_task = None;
        true
    });
    if ingested { info!(job_id, baseline = baseline_len, enhanced = enhanced_len, "search complete"); }
}
