//! Domain types shared by the orchestrator, the diff engine, the reconciler
//! and the store.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub type ItemId = String;

/// Pipeline stage reported by the search service.
///
/// Declaration order is pipeline order; `Error` may follow any stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    Initiated,
    StandardSearch,
    QueryRewriting,
    EnhancedSearch,
    Reranking,
    Reasoning,
    Complete,
    Error,
}

impl SearchStage {
    pub fn is_terminal(self) -> bool { matches!(self, Self::Complete | Self::Error) }

    fn ordinal(self) -> u8 {
        match self {
            Self::Initiated => 0,
            Self::StandardSearch => 1,
            Self::QueryRewriting => 2,
            Self::EnhancedSearch => 3,
            Self::Reranking => 4,
            Self::Reasoning => 5,
            Self::Complete => 6,
            Self::Error => 7,
        }
    }

    /// Whether a job sitting in `self` may move to `next`.
    ///
    /// Terminal stages accept nothing. Otherwise stages only move forward
    /// (skipping is allowed) or straight to `Error`.
    pub fn can_advance_to(self, next: SearchStage) -> bool {
        if self.is_terminal() { return false; }
        next == Self::Error || next.ordinal() >= self.ordinal()
    }

    /// Human readable label for progress displays.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Initiated => "Initiating Search",
            Self::StandardSearch => "Standard Search",
            Self::QueryRewriting => "Optimizing Query",
            Self::EnhancedSearch => "Enhanced Search",
            Self::Reranking => "Reranking Results",
            Self::Reasoning => "Generating AI Reasoning",
            Self::Complete => "Search Complete",
            Self::Error => "Search Error",
        }
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.display_name()) }
}

/// One progress report for a job, as returned by `GET search/{id}/progress`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub search_id: String,
    pub stage: SearchStage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub percentage: u32,
}

/// Client-side view of one asynchronous search execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchJob {
    pub id: String,
    pub status: SearchStage,
    pub percentage: u8,
    pub message: String,
}

impl SearchJob {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), status: SearchStage::Initiated, percentage: 0, message: String::new() }
    }

    pub fn is_terminal(&self) -> bool { self.status.is_terminal() }

    /// Folds a progress report into the job. Returns `true` when anything
    /// observable changed.
    ///
    /// A backward stage is ignored and a lower percentage never replaces a
    /// higher one while the job is running. Terminal reports are taken as is
    /// (clamped to 100).
    pub fn apply(&mut self, update: &ProgressUpdate) -> bool {
        if self.is_terminal() {
            debug!(job_id = %self.id, stage = ?update.stage, "ignoring progress for finished job");
            return false;
        }
        let before = self.clone();
        let reported = update.percentage.min(100) as u8;
        if self.status.can_advance_to(update.stage) {
            self.status = update.stage;
        } else {
            warn!(job_id = %self.id, current = ?self.status, reported = ?update.stage, "service reported a backward stage");
        }
        if self.status.is_terminal() {
            self.percentage = reported;
        } else if reported >= self.percentage {
            self.percentage = reported;
        } else {
            debug!(job_id = %self.id, current = self.percentage, reported, "ignoring decreasing percentage");
        }
        self.message = update.message.clone();
        *self != before
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReasoningFactor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub factor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Explanation attached to an enhanced result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiReasoning {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub factors: Vec<ReasoningFactor>,
}

/// Free-form retrieval details. Any JSON object is accepted; the known rank
/// keys are read through accessors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ResultMetadata(pub serde_json::Map<String, serde_json::Value>);

impl ResultMetadata {
    pub fn vector_rank(&self) -> Option<u32> { self.rank("vectorRank") }
    pub fn text_rank(&self) -> Option<u32> { self.rank("textRank") }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> { self.0.get(key) }

    /// Non-negative whole number under `key`; integral floats count.
    fn rank(&self, key: &str) -> Option<u32> {
        let value = self.0.get(key)?;
        if let Some(n) = value.as_u64() { return u32::try_from(n).ok(); }
        let f = value.as_f64()?;
        (f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
    }
}

/// One ranked product.
///
/// Optional presentation fields that the service may omit or send as `null`
/// fall back to zero/empty so a partial payload never fails ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub img: String,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub discount: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default)]
    pub sustainability: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: u64,
    #[serde(default, rename = "match")]
    pub match_score: Option<i64>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub delivery: Option<String>,
    #[serde(default)]
    pub standard_rank: Option<i64>,
    #[serde(default)]
    pub ai_rank: Option<i64>,
    #[serde(default)]
    pub rank_change: Option<i64>,
    #[serde(default)]
    pub ai_reasoning: Option<AiReasoning>,
    #[serde(default)]
    pub metadata: Option<ResultMetadata>,
}

impl ResultItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), ..Self::default() }
    }
}

/// Which of the two ranked lists a set (or the display) refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    #[default]
    Baseline,
    Enhanced,
}

impl ResultKind {
    pub fn toggled(self) -> Self {
        match self { Self::Baseline => Self::Enhanced, Self::Enhanced => Self::Baseline }
    }
}

/// An ordered, uniquely keyed list where position encodes rank
/// (index 0 is rank 1).
///
/// Items are shared behind an `Arc` and never mutated; replacing a set means
/// building a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    kind: ResultKind,
    items: Arc<[ResultItem]>,
}

impl ResultSet {
    /// Builds a set, dropping later duplicates of an id already seen.
    pub fn new(kind: ResultKind, items: Vec<ResultItem>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let total = items.len();
        let items: Vec<ResultItem> = items.into_iter().filter(|item| seen.insert(item.id.clone())).collect();
        if items.len() != total {
            warn!(kind = ?kind, dropped = total - items.len(), "dropped duplicate result ids");
        }
        Self { kind, items: items.into() }
    }

    pub fn empty(kind: ResultKind) -> Self { Self { kind, items: Arc::from(Vec::new()) } }

    pub fn kind(&self) -> ResultKind { self.kind }
    pub fn items(&self) -> &[ResultItem] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, ResultItem> { self.items.iter() }
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ { self.items.iter().map(|i| i.id.as_str()) }

    /// 0-based position of `id`, if present.
    pub fn position(&self, id: &str) -> Option<usize> { self.items.iter().position(|i| i.id == id) }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultItem;
    type IntoIter = std::slice::Iter<'a, ResultItem>;
    fn into_iter(self) -> Self::IntoIter { self.items.iter() }
}

/// Aggregate statistics describing how an enhanced set differs from a
/// baseline one. Always derived, never edited.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_product_count: usize,
    pub improved_rank_count: usize,
    pub new_product_count: usize,
    pub removed_product_count: usize,
    pub average_rank_improvement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonaPreferences {
    pub price_weight: f64,
    pub quality_weight: f64,
    pub brand_weight: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Shopper profile used to personalize the enhanced ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPersona {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,
    pub preferences: PersonaPreferences,
}

impl UserPersona {
    /// Weights are expected in `[0, 1]`.
    pub fn has_valid_weights(&self) -> bool {
        let p = &self.preferences;
        [p.price_weight, p.quality_weight, p.brand_weight].iter().all(|w| (0.0..=1.0).contains(w))
    }
}

/// Treats an explicit JSON `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
