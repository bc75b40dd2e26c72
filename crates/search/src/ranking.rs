//! Helper ranking
//!
//! Filter, then stable-sort by the selected key with `id` ascending as the
//! final tiebreak. Input records are never modified.

use std::cmp::Ordering;

use serde::Serialize;

use peer_support_core::{Degradation, FilterCriteria, HelperRecord, SortKey};

use crate::criteria::CompiledCriteria;

/// Ranked helpers plus any criteria fields that had to be ignored
#[derive(Debug, Clone, Serialize)]
pub struct RankOutcome {
    pub helpers: Vec<HelperRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<Degradation>,
}

fn compare(sort: SortKey, a: &HelperRecord, b: &HelperRecord) -> Ordering {
    let primary = match sort {
        SortKey::Rating => b.rating.total_cmp(&a.rating),
        SortKey::PriceAsc => a.hourly_rate.total_cmp(&b.hourly_rate),
        SortKey::PriceDesc => b.hourly_rate.total_cmp(&a.hourly_rate),
        SortKey::Experience => b.experience_years.cmp(&a.experience_years),
        SortKey::Reviews => b.review_count.cmp(&a.review_count),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Filter and order `helpers` by `criteria`
pub fn rank(helpers: &[HelperRecord], criteria: &FilterCriteria) -> Vec<HelperRecord> {
    rank_with_diagnostics(helpers, criteria).helpers
}

/// [`rank`], also reporting criteria fields that were ignored as invalid
pub fn rank_with_diagnostics(helpers: &[HelperRecord], criteria: &FilterCriteria) -> RankOutcome {
    let (compiled, degradations) = CompiledCriteria::compile(criteria);

    let mut ranked: Vec<HelperRecord> = helpers
        .iter()
        .filter(|h| compiled.matches(h))
        .cloned()
        .collect();
    ranked.sort_by(|a, b| compare(compiled.sort, a, b));

    metrics::histogram!("peer_support_rank_results").record(ranked.len() as f64);
    tracing::debug!(
        candidates = helpers.len(),
        matched = ranked.len(),
        sort = compiled.sort.as_str(),
        ignored = degradations.len(),
        "Ranked helpers"
    );

    RankOutcome {
        helpers: ranked,
        degradations,
    }
}
