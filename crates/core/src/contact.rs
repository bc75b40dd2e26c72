//! Emergency contacts

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{ContactCategory, Error, Result};

/// Country value used by contacts that apply everywhere
pub const GLOBAL_COUNTRY: &str = "Global";

/// Crisis line, hotline or support organisation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub country: String,
    pub category: ContactCategory,
    #[serde(default, alias = "available_24_7")]
    pub available_24x7: bool,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl EmergencyContact {
    /// A contact must be reachable by phone or website
    pub fn validate(&self) -> Result<()> {
        let has_phone = self.phone.as_deref().is_some_and(|p| !p.trim().is_empty());
        let has_website = self.website.as_deref().is_some_and(|w| !w.trim().is_empty());
        if !has_phone && !has_website {
            return Err(Error::InvalidRecord(format!(
                "emergency contact {} has neither phone nor website",
                self.id
            )));
        }
        Ok(())
    }

    /// 24/7 first, then name ascending (case-insensitive), then id
    pub fn by_availability(a: &Self, b: &Self) -> Ordering {
        b.available_24x7
            .cmp(&a.available_24x7)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Case-insensitive match over name, description and category
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.category.as_str().contains(&term.replace(' ', "_"))
    }

    /// Serves `country`, either directly or as a global resource
    pub fn serves_country(&self, country: &str) -> bool {
        self.country.eq_ignore_ascii_case(country)
            || self.country.eq_ignore_ascii_case(GLOBAL_COUNTRY)
    }
}
