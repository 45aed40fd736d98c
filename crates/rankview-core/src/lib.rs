//! Shared model, contracts and plumbing for the rankview crates.

pub mod config;
pub mod error;
pub mod schedule;
pub mod state;
pub mod traits;
pub mod types;
pub mod wire;

pub use error::{SearchError, ServiceError};
pub use traits::{LayoutProvider, Rect, ResultSink, SearchService};
pub use types::{ComparisonSummary, ResultItem, ResultKind, ResultSet, SearchJob, SearchStage};
