use serde::{Deserialize, Serialize};

/// A catalog destination after normalization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Destination {
    pub name: String,
    pub duration_minutes: u32,
    pub price: String,
    pub location: String,
    pub description: String,
    pub rating: Option<f64>,
}

impl Destination {
    /// Destination with placeholder display fields, mostly useful for tests and fixtures.
    pub fn new(name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
            price: "N/A".to_string(),
            location: "N/A".to_string(),
            description: "N/A".to_string(),
            rating: None,
        }
    }
}

/// One record of `destinationReview.json`.
///
/// Records are checked one at a time when loaded. Individual reviews stay
/// loosely typed: a review may lack a rating or carry
/// a non-numeric one, and both count as zero when averaged.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ReviewEntry {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub reviews: Option<serde_json::Value>,
}
