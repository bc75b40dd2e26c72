//! Helper search
//!
//! Features:
//! - Criteria compilation with per-field invalid-value recovery
//! - Deterministic filtering and ranking of helper listings
//! - Quick filter presets
//! - Per-category summaries

pub mod criteria;
pub mod quick;
pub mod ranking;
pub mod summary;

pub use criteria::{CompiledCriteria, ExperienceBand};
pub use quick::{apply_quick_filters, QuickFilter, AFFORDABLE_MAX_RATE, TOP_RATED_MIN};
pub use ranking::{rank, rank_with_diagnostics, RankOutcome};
pub use summary::{category_summaries, CategorySummary};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Unknown quick filter: {0}")]
    UnknownQuickFilter(String),
}
