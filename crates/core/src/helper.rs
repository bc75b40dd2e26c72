//! Marketplace helper listings

use serde::{Deserialize, Serialize};

use crate::{Category, Error, Result};

/// Current availability of a helper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Online,
    Busy,
    #[default]
    Offline,
}

/// Peer helper offering support services
///
/// Owned by the data layer; the ranking engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelperRecord {
    pub id: String,
    pub display_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Average rating in [0, 5]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub hourly_rate: f64,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub category_id: Category,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub video_enabled: bool,
    #[serde(default)]
    pub voice_enabled: bool,
}

impl HelperRecord {
    /// Rating must lie in [0, 5] and the hourly rate must be positive
    pub fn validate(&self) -> Result<()> {
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(Error::InvalidRecord(format!(
                "helper {} has rating {} outside [0, 5]",
                self.id, self.rating
            )));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate <= 0.0 {
            return Err(Error::InvalidRecord(format!(
                "helper {} has non-positive hourly rate {}",
                self.id, self.hourly_rate
            )));
        }
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        self.availability_status == AvailabilityStatus::Online
    }

    /// Case-insensitive substring match on name, title, description or any specialty
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.display_name.to_lowercase().contains(needle)
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .specialties
                .iter()
                .any(|s| s.to_lowercase().contains(needle))
    }

    /// Speaks at least one of `languages` (case-insensitive)
    pub fn speaks_any(&self, languages: &[String]) -> bool {
        languages
            .iter()
            .any(|wanted| self.languages.iter().any(|l| l.eq_ignore_ascii_case(wanted)))
    }
}
