use serde::{Deserialize, Serialize};

/// Placeholder for place fields no strategy could resolve.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for review ratings and dates no strategy could resolve.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Coordinates {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Information about a single place, filled once per target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: String,
    pub total_reviews: String,
    pub categories: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl Default for PlaceRecord {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            address: UNKNOWN.to_string(),
            phone: UNKNOWN.to_string(),
            website: UNKNOWN.to_string(),
            rating: UNKNOWN.to_string(),
            total_reviews: UNKNOWN.to_string(),
            categories: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

impl PlaceRecord {
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.latitude = coordinates.latitude;
        self.longitude = coordinates.longitude;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewer: String,
    pub rating: String,
    pub date: String,
    pub text: String,
}

impl Default for ReviewRecord {
    fn default() -> Self {
        Self {
            reviewer: UNKNOWN.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            date: NOT_AVAILABLE.to_string(),
            text: String::new(),
        }
    }
}

/// Steps of the per-target navigation script, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Loaded,
    ResultClicked,
    CoordinatesResolved,
    InfoExtracted,
    ReviewsTabOpen,
    ReviewsScrolled,
    ReviewsExpanded,
    ReviewsExtracted,
    Saved,
}

/// What happens to a target when a stage fails outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// The target is abandoned, logged and skipped.
    AbortTarget,
    /// The stage yields its placeholder and the script carries on.
    Degrade,
}

impl Stage {
    pub fn policy(self) -> StepPolicy {
        match self {
            Stage::Loaded | Stage::Saved => StepPolicy::AbortTarget,
            _ => StepPolicy::Degrade,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Loaded => "loaded",
            Stage::ResultClicked => "result_clicked",
            Stage::CoordinatesResolved => "coordinates_resolved",
            Stage::InfoExtracted => "info_extracted",
            Stage::ReviewsTabOpen => "reviews_tab_open",
            Stage::ReviewsScrolled => "reviews_scrolled",
            Stage::ReviewsExpanded => "reviews_expanded",
            Stage::ReviewsExtracted => "reviews_extracted",
            Stage::Saved => "saved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScrape {
    pub url: String,
    pub place: PlaceRecord,
    /// `None` when the page had no review nodes at all.
    pub reviews: Option<Vec<ReviewRecord>>,
    pub stage: Stage,
}

impl PageScrape {
    pub fn review_count(&self) -> usize {
        self.reviews.as_ref().map_or(0, Vec::len)
    }
}
