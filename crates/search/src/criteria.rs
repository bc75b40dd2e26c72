//! Criteria compilation
//!
//! Raw [`FilterCriteria`] fields are parsed once per ranking call. A field
//! that is malformed or out of range is dropped (treated as unset) and
//! reported as [`Degradation::InvalidCriteria`]; the remaining fields
//! still filter.

use std::fmt;
use std::str::FromStr;

use peer_support_core::{
    Category, Degradation, FilterCriteria, HelperRecord, SortKey, UNSET_MAX_RATE, UNSET_MIN_RATING,
};

pub(crate) const MAX_RATING: f64 = 5.0;

/// Inclusive years-of-experience band: `"min-max"` or `"min+"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceBand {
    pub min: u32,
    /// `None` for open-ended bands
    pub max: Option<u32>,
}

impl ExperienceBand {
    pub fn contains(&self, years: u32) -> bool {
        years >= self.min && self.max.map_or(true, |max| years <= max)
    }
}

impl fmt::Display for ExperienceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

impl FromStr for ExperienceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid experience band '{}'", s))
        };

        let band = s.trim();
        if let Some(min) = band.strip_suffix('+') {
            return Ok(Self {
                min: parse(min)?,
                max: None,
            });
        }

        let (min, max) = band
            .split_once('-')
            .ok_or_else(|| format!("invalid experience band '{}'", s))?;
        let (min, max) = (parse(min)?, parse(max)?);
        if min > max {
            return Err(format!("experience band '{}' has min above max", s));
        }
        Ok(Self {
            min,
            max: Some(max),
        })
    }
}

/// Parsed, validated predicates; `None` means the predicate is skipped
#[derive(Debug, Clone, Default)]
pub struct CompiledCriteria {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub min_rating: Option<f64>,
    pub max_rate: Option<f64>,
    pub experience: Option<ExperienceBand>,
    pub location: Option<String>,
    pub online_only: bool,
    pub languages: Vec<String>,
    pub video_only: bool,
    pub voice_only: bool,
    pub sort: SortKey,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl CompiledCriteria {
    /// Compile raw criteria, collecting a degradation for each dropped field
    pub fn compile(criteria: &FilterCriteria) -> (Self, Vec<Degradation>) {
        let mut invalid = Vec::new();
        let mut reject = |field: &str, reason: String| {
            tracing::warn!(field, reason = %reason, "Ignoring invalid filter criterion");
            invalid.push(Degradation::InvalidCriteria(format!("{}: {}", field, reason)));
        };

        let query = non_blank(Some(criteria.query.as_str())).map(str::to_lowercase);

        let category = match non_blank(criteria.category.as_deref()) {
            None => None,
            Some(name) if name.eq_ignore_ascii_case("all") => None,
            Some(name) => {
                let parsed = Category::from_name(name);
                if parsed.is_none() {
                    reject("category", format!("unknown category '{}'", name));
                }
                parsed
            },
        };

        let min_rating = match criteria.min_rating {
            r if r == UNSET_MIN_RATING => None,
            r if r.is_finite() && (0.0..=MAX_RATING).contains(&r) => Some(r),
            r => {
                reject("min_rating", format!("{} is outside 0-5", r));
                None
            },
        };

        let max_rate = match criteria.max_rate {
            r if r == UNSET_MAX_RATE => None,
            r if r.is_finite() && r >= 0.0 => Some(r),
            r => {
                reject("max_rate", format!("{} is not a valid hourly rate", r));
                None
            },
        };

        let experience = non_blank(criteria.experience.as_deref()).and_then(|band| {
            band.parse::<ExperienceBand>()
                .map_err(|reason| reject("experience", reason))
                .ok()
        });

        let location = non_blank(criteria.location.as_deref()).map(str::to_lowercase);

        let languages = criteria
            .languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        let sort = criteria.sort_by.parse::<SortKey>().unwrap_or_else(|reason| {
            reject("sort_by", reason);
            SortKey::default()
        });

        let compiled = Self {
            query,
            category,
            min_rating,
            max_rate,
            experience,
            location,
            online_only: criteria.online_only,
            languages,
            video_only: criteria.video_only,
            voice_only: criteria.voice_only,
            sort,
        };
        (compiled, invalid)
    }

    /// True when `helper` passes every active predicate
    pub fn matches(&self, helper: &HelperRecord) -> bool {
        self.query.as_deref().map_or(true, |q| helper.matches_query(q))
            && self.category.map_or(true, |c| helper.category_id == c)
            && self.min_rating.map_or(true, |r| helper.rating >= r)
            && self.max_rate.map_or(true, |r| helper.hourly_rate <= r)
            && self
                .experience
                .map_or(true, |band| band.contains(helper.experience_years))
            && self
                .location
                .as_deref()
                .map_or(true, |l| helper.location.to_lowercase().contains(l))
            && (!self.online_only || helper.is_online())
            && (self.languages.is_empty() || helper.speaks_any(&self.languages))
            && (!self.video_only || helper.video_enabled)
            && (!self.voice_only || helper.voice_enabled)
    }
}
