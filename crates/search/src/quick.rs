//! Quick filter presets
//!
//! Each preset tightens a [`FilterCriteria`] and never loosens a stricter
//! value that is already set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use peer_support_core::FilterCriteria;

use crate::criteria::MAX_RATING;
use crate::SearchError;

/// Minimum rating applied by [`QuickFilter::TopRated`]
pub const TOP_RATED_MIN: f64 = 4.5;
/// Hourly ceiling applied by [`QuickFilter::Affordable`]
pub const AFFORDABLE_MAX_RATE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    /// Online now
    Available,
    TopRated,
    Affordable,
    /// Offers video sessions
    Video,
    /// Offers voice sessions
    VoiceAi,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 5] = [
        QuickFilter::Available,
        QuickFilter::TopRated,
        QuickFilter::Affordable,
        QuickFilter::Video,
        QuickFilter::VoiceAi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickFilter::Available => "available",
            QuickFilter::TopRated => "top-rated",
            QuickFilter::Affordable => "affordable",
            QuickFilter::Video => "video",
            QuickFilter::VoiceAi => "voice-ai",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickFilter::Available => "Available Now",
            QuickFilter::TopRated => "Top Rated (4.5+)",
            QuickFilter::Affordable => "Under $70/hr",
            QuickFilter::Video => "Video Enabled",
            QuickFilter::VoiceAi => "Voice AI",
        }
    }

    pub fn apply(&self, mut criteria: FilterCriteria) -> FilterCriteria {
        match self {
            QuickFilter::Available => criteria.online_only = true,
            QuickFilter::TopRated => {
                criteria.min_rating = if valid_rating(criteria.min_rating) {
                    criteria.min_rating.max(TOP_RATED_MIN)
                } else {
                    TOP_RATED_MIN
                }
            },
            QuickFilter::Affordable => {
                criteria.max_rate = if valid_rate(criteria.max_rate) {
                    criteria.max_rate.min(AFFORDABLE_MAX_RATE)
                } else {
                    AFFORDABLE_MAX_RATE
                }
            },
            QuickFilter::Video => criteria.video_only = true,
            QuickFilter::VoiceAi => criteria.voice_only = true,
        }
        criteria
    }
}

// Out-of-range values are dropped at compile time, so a preset replaces them
// outright instead of comparing against them.
fn valid_rating(rating: f64) -> bool {
    rating.is_finite() && (0.0..=MAX_RATING).contains(&rating)
}

fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

/// Apply several presets in order
pub fn apply_quick_filters(criteria: FilterCriteria, filters: &[QuickFilter]) -> FilterCriteria {
    filters.iter().fold(criteria, |acc, filter| filter.apply(acc))
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickFilter {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        match needle.as_str() {
            "available" | "online" => Ok(QuickFilter::Available),
            "top-rated" | "toprated" => Ok(QuickFilter::TopRated),
            "affordable" => Ok(QuickFilter::Affordable),
            "video" => Ok(QuickFilter::Video),
            "voice-ai" | "voice" => Ok(QuickFilter::VoiceAi),
            _ => Err(SearchError::UnknownQuickFilter(s.to_string())),
        }
    }
}
