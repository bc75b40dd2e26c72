//! Per-category helper statistics

use serde::Serialize;

use peer_support_core::{Category, HelperRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub display_name: &'static str,
    pub description: &'static str,
    pub helper_count: usize,
    pub online_count: usize,
    /// `None` when the category has no helpers
    pub average_rating: Option<f64>,
}

/// One row per category in priority order, including empty categories
pub fn category_summaries(helpers: &[HelperRecord]) -> Vec<CategorySummary> {
    Category::ALL
        .iter()
        .map(|&category| {
            let members: Vec<&HelperRecord> = helpers
                .iter()
                .filter(|h| h.category_id == category)
                .collect();
            let average_rating = (!members.is_empty()).then(|| {
                let total: f64 = members.iter().map(|h| h.rating).sum();
                (total / members.len() as f64 * 10.0).round() / 10.0
            });

            CategorySummary {
                category,
                display_name: category.display_name(),
                description: category.description(),
                helper_count: members.len(),
                online_count: members.iter().filter(|h| h.is_online()).count(),
                average_rating,
            }
        })
        .collect()
}
