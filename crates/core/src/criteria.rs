//! Helper search criteria
//!
//! Criteria arrive raw from the caller. Every field has an "unset" sentinel;
//! the ranking engine interprets malformed values as unset rather than
//! rejecting the request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rating floor that disables the rating predicate
pub const UNSET_MIN_RATING: f64 = 0.0;
/// Rate ceiling that disables the price predicate
pub const UNSET_MAX_RATE: f64 = 500.0;

/// Result ordering for a helper search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Rating descending
    #[default]
    Rating,
    /// Hourly rate ascending
    PriceAsc,
    /// Hourly rate descending
    PriceDesc,
    /// Years of experience descending
    Experience,
    /// Review count descending
    Reviews,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::PriceAsc => "price-low",
            SortKey::PriceDesc => "price-high",
            SortKey::Experience => "experience",
            SortKey::Reviews => "reviews",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "rating" => Ok(SortKey::Rating),
            "price-low" | "priceasc" | "price_asc" => Ok(SortKey::PriceAsc),
            "price-high" | "pricedesc" | "price_desc" => Ok(SortKey::PriceDesc),
            "experience" => Ok(SortKey::Experience),
            "reviews" => Ok(SortKey::Reviews),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Search, filter and sort request for the helper list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text query over name, title, description and specialties
    #[serde(default)]
    pub query: String,
    /// Category slug
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    #[serde(default = "default_max_rate")]
    pub max_rate: f64,
    /// Experience band, `"min-max"` or `"min+"`
    #[serde(default, alias = "experience_band")]
    pub experience: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub online_only: bool,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub video_only: bool,
    #[serde(default)]
    pub voice_only: bool,
    /// Sort key name, see [`SortKey`]
    #[serde(default = "default_sort_by", alias = "sort_key")]
    pub sort_by: String,
}

fn default_min_rating() -> f64 {
    UNSET_MIN_RATING
}

fn default_max_rate() -> f64 {
    UNSET_MAX_RATE
}

fn default_sort_by() -> String {
    SortKey::Rating.as_str().to_string()
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            min_rating: default_min_rating(),
            max_rate: default_max_rate(),
            experience: None,
            location: None,
            online_only: false,
            languages: Vec::new(),
            video_only: false,
            voice_only: false,
            sort_by: default_sort_by(),
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = rating;
        self
    }

    pub fn max_rate(mut self, rate: f64) -> Self {
        self.max_rate = rate;
        self
    }

    pub fn experience(mut self, band: impl Into<String>) -> Self {
        self.experience = Some(band.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn online_only(mut self, online_only: bool) -> Self {
        self.online_only = online_only;
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort_by = key.as_str().to_string();
        self
    }

    /// Number of predicates not at their unset sentinel
    pub fn active_filter_count(&self) -> usize {
        let is_set = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        [
            !self.query.trim().is_empty(),
            is_set(&self.category),
            self.min_rating != UNSET_MIN_RATING,
            self.max_rate != UNSET_MAX_RATE,
            is_set(&self.experience),
            is_set(&self.location),
            self.online_only,
            !self.languages.is_empty(),
            self.video_only,
            self.voice_only,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}
