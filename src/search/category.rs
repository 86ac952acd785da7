//! POI categories and their search queries.

use std::fmt;

/// Kinds of maritime infrastructure the search discovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiCategory {
    Marina,
    FishingSpot,
    BaitShop,
    SafetyStation,
    Port,
    FishingCharter,
    BoatRamp,
}

impl PoiCategory {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PoiCategory::Marina => "Marina",
            PoiCategory::FishingSpot => "Fishing spot",
            PoiCategory::BaitShop => "Bait shop",
            PoiCategory::SafetyStation => "Safety station",
            PoiCategory::Port => "Port",
            PoiCategory::FishingCharter => "Fishing charter",
            PoiCategory::BoatRamp => "Boat ramp",
        }
    }

    /// Default keyword string used to query the provider.
    pub fn default_keywords(&self) -> &'static str {
        match self {
            PoiCategory::Marina => "marina boat dock",
            PoiCategory::FishingSpot => "fishing spot pier",
            PoiCategory::BaitShop => "bait tackle shop",
            PoiCategory::SafetyStation => "coast guard station",
            PoiCategory::Port => "harbor port",
            PoiCategory::FishingCharter => "fishing charter",
            PoiCategory::BoatRamp => "boat ramp launch",
        }
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One categorized query in the search batch.
#[derive(Debug, Clone)]
pub struct CategoryQuery {
    /// Category assigned to every result of this query.
    pub category: PoiCategory,
    /// Keyword string sent to the provider.
    pub keywords: String,
}

impl CategoryQuery {
    /// Creates a query with explicit keywords.
    pub fn new(category: PoiCategory, keywords: impl Into<String>) -> Self {
        Self {
            category,
            keywords: keywords.into(),
        }
    }

    /// Creates a query with the category's default keywords.
    pub fn with_defaults(category: PoiCategory) -> Self {
        Self::new(category, category.default_keywords())
    }
}

/// The standard category batch, in dispatch order.
pub fn default_categories() -> Vec<CategoryQuery> {
    [
        PoiCategory::Marina,
        PoiCategory::FishingSpot,
        PoiCategory::BaitShop,
        PoiCategory::SafetyStation,
        PoiCategory::Port,
        PoiCategory::FishingCharter,
        PoiCategory::BoatRamp,
    ]
    .into_iter()
    .map(CategoryQuery::with_defaults)
    .collect()
}
