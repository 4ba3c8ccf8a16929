use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw feed payload as returned from the upstream NEO API
pub type RawFeedResponse = serde_json::Value;

/// Flat asteroid record served to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAsteroid {
    pub id: String,
    pub name: String,
    /// Max estimated diameter in kilometers, 3 decimal places
    pub diameter: f64,
    /// Miss distance in astronomical units, 5 decimal places
    pub distance: f64,
    /// Relative velocity in km/s, 2 decimal places
    pub velocity: f64,
    pub hazardous: bool,
}

/// Identifies a raw object that failed to normalize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Id(String),
    Position { date: String, index: usize },
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Id(id) => write!(f, "id {}", id),
            RecordRef::Position { date, index } => write!(f, "{}[{}]", date, index),
        }
    }
}

/// How the normalizer reacts to a malformed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeStrategy {
    /// Abort on the first malformed object
    #[default]
    FailFast,
    /// Skip malformed objects and report them alongside the results
    Lenient,
}
