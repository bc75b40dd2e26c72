//! Support categories and emergency-contact categories
//!
//! Categories are a closed set. The order of [`Category::ALL`] is the
//! classifier's default priority order; anything that needs a stable
//! category ordering (summaries, keyword tables) iterates it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplace support category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    MentalHealth,
    Career,
    Relationships,
    LifeTransitions,
    Education,
    Community,
}

/// Static metadata for one category
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub category: Category,
    pub slug: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Contact category offered when a category page asks for emergency resources
    pub emergency: ContactCategory,
}

const CATEGORY_TABLE: [CategoryInfo; 6] = [
    CategoryInfo {
        category: Category::MentalHealth,
        slug: "mental-health",
        display_name: "Mental Health",
        description: "Support for anxiety, depression, stress and emotional wellbeing",
        emergency: ContactCategory::MentalHealth,
    },
    CategoryInfo {
        category: Category::Career,
        slug: "career",
        display_name: "Career Development",
        description: "Job search, interviews, career changes and workplace challenges",
        emergency: ContactCategory::General,
    },
    CategoryInfo {
        category: Category::Relationships,
        slug: "relationships",
        display_name: "Relationships",
        description: "Communication, dating, family and partner relationships",
        emergency: ContactCategory::DomesticViolence,
    },
    CategoryInfo {
        category: Category::LifeTransitions,
        slug: "life-transitions",
        display_name: "Life Transitions",
        description: "Moving, loss, retirement and other major life changes",
        emergency: ContactCategory::Crisis,
    },
    CategoryInfo {
        category: Category::Education,
        slug: "education",
        display_name: "Education",
        description: "Study strategies, exams and academic pressure",
        emergency: ContactCategory::General,
    },
    CategoryInfo {
        category: Category::Community,
        slug: "community",
        display_name: "Community & Social",
        description: "Loneliness, friendship and finding belonging",
        emergency: ContactCategory::General,
    },
];

impl Category {
    /// All categories in default priority order
    pub const ALL: [Category; 6] = [
        Category::MentalHealth,
        Category::Career,
        Category::Relationships,
        Category::LifeTransitions,
        Category::Education,
        Category::Community,
    ];

    /// Metadata row for this category
    pub fn info(&self) -> &'static CategoryInfo {
        // Table rows are declared in enum order
        &CATEGORY_TABLE[*self as usize]
    }

    pub fn slug(&self) -> &'static str {
        self.info().slug
    }

    pub fn display_name(&self) -> &'static str {
        self.info().display_name
    }

    pub fn description(&self) -> &'static str {
        self.info().description
    }

    /// Emergency-contact category associated with this support category
    pub fn emergency_category(&self) -> ContactCategory {
        self.info().emergency
    }

    /// Resolve either a slug or a display name, as stored by external databases
    pub fn from_name(name: &str) -> Option<Category> {
        name.parse().ok().or_else(|| {
            let name = name.trim();
            CATEGORY_TABLE
                .iter()
                .find(|row| row.display_name.eq_ignore_ascii_case(name))
                .map(|row| row.category)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Returned when a category slug is not part of the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        CATEGORY_TABLE
            .iter()
            .find(|row| row.slug == needle)
            .map(|row| row.category)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Emergency contact category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactCategory {
    Suicide,
    Crisis,
    MentalHealth,
    DomesticViolence,
    SubstanceAbuse,
    General,
}

impl ContactCategory {
    pub const ALL: [ContactCategory; 6] = [
        ContactCategory::Suicide,
        ContactCategory::Crisis,
        ContactCategory::MentalHealth,
        ContactCategory::DomesticViolence,
        ContactCategory::SubstanceAbuse,
        ContactCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactCategory::Suicide => "suicide",
            ContactCategory::Crisis => "crisis",
            ContactCategory::MentalHealth => "mental_health",
            ContactCategory::DomesticViolence => "domestic_violence",
            ContactCategory::SubstanceAbuse => "substance_abuse",
            ContactCategory::General => "general",
        }
    }
}

impl fmt::Display for ContactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        ContactCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
