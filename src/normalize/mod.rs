//! Feed normalization
//!
//! Flattens the upstream date-bucketed `near_earth_objects` mapping into a
//! list of [`NormalizedAsteroid`] records. Date keys are visited in ascending
//! order (the ISO date strings sort chronologically); objects inside a date
//! keep their upstream order.

pub mod rounding;

use serde_json::Value;

use crate::constants::{DIAMETER_PLACES, DISTANCE_PLACES, VELOCITY_PLACES};
use crate::error::{NeoError, Result};
use crate::types::{NormalizeStrategy, NormalizedAsteroid, RawFeedResponse, RecordRef};
use rounding::round_to;

const FIELD_ID: &str = "id";
const FIELD_NAME: &str = "name";
const FIELD_DIAMETER: &str = "estimated_diameter.kilometers.estimated_diameter_max";
const FIELD_APPROACH: &str = "close_approach_data";
const FIELD_DISTANCE: &str = "close_approach_data[0].miss_distance.astronomical";
const FIELD_VELOCITY: &str = "close_approach_data[0].relative_velocity.kilometers_per_second";
const FIELD_HAZARD: &str = "is_potentially_hazardous_asteroid";

/// Result of a normalization pass
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub asteroids: Vec<NormalizedAsteroid>,
    /// Objects skipped under [`NormalizeStrategy::Lenient`]; always empty for fail-fast
    pub errors: Vec<NeoError>,
}

/// Normalize a feed, failing on the first malformed object.
pub fn normalize(raw: &RawFeedResponse) -> Result<Vec<NormalizedAsteroid>> {
    normalize_with(raw, NormalizeStrategy::FailFast).map(|outcome| outcome.asteroids)
}

/// Normalize a feed with an explicit malformed-object strategy.
pub fn normalize_with(raw: &RawFeedResponse, strategy: NormalizeStrategy) -> Result<NormalizeOutcome> {
    let buckets = match raw.get("near_earth_objects") {
        None | Some(Value::Null) => return Ok(NormalizeOutcome::default()),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(NeoError::MalformedFeed(
                "near_earth_objects is not an object".to_string(),
            ))
        }
    };

    let mut outcome = NormalizeOutcome::default();

    // serde_json's default Map is ordered by key
    for (date, objects) in buckets {
        let objects = objects.as_array().ok_or_else(|| {
            NeoError::MalformedFeed(format!("date bucket {} is not an array", date))
        })?;

        for (index, obj) in objects.iter().enumerate() {
            match normalize_object(obj, date, index) {
                Ok(asteroid) => outcome.asteroids.push(asteroid),
                Err(e) => match strategy {
                    NormalizeStrategy::FailFast => return Err(e),
                    NormalizeStrategy::Lenient => outcome.errors.push(e),
                },
            }
        }
    }

    Ok(outcome)
}

/// Extract one flat record from a raw upstream object.
pub fn normalize_object(obj: &Value, date: &str, index: usize) -> Result<NormalizedAsteroid> {
    let id = obj.get("id").and_then(Value::as_str);
    let record = match id {
        Some(id) => RecordRef::Id(id.to_string()),
        None => RecordRef::Position { date: date.to_string(), index },
    };
    let malformed = |field: &'static str| NeoError::MalformedRecord { record: record.clone(), field };

    let id = id.ok_or_else(|| malformed(FIELD_ID))?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(FIELD_NAME))?;
    let diameter = obj
        .pointer("/estimated_diameter/kilometers/estimated_diameter_max")
        .and_then(as_finite_f64)
        .ok_or_else(|| malformed(FIELD_DIAMETER))?;

    let approach = obj
        .get("close_approach_data")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .ok_or_else(|| malformed(FIELD_APPROACH))?;
    let distance = approach
        .pointer("/miss_distance/astronomical")
        .and_then(as_finite_f64)
        .ok_or_else(|| malformed(FIELD_DISTANCE))?;
    let velocity = approach
        .pointer("/relative_velocity/kilometers_per_second")
        .and_then(as_finite_f64)
        .ok_or_else(|| malformed(FIELD_VELOCITY))?;

    let hazardous = obj
        .get("is_potentially_hazardous_asteroid")
        .and_then(Value::as_bool)
        .ok_or_else(|| malformed(FIELD_HAZARD))?;

    Ok(NormalizedAsteroid {
        id: id.to_string(),
        name: name.to_string(),
        diameter: round_to(diameter, DIAMETER_PLACES),
        distance: round_to(distance, DISTANCE_PLACES),
        velocity: round_to(velocity, VELOCITY_PLACES),
        hazardous,
    })
}

/// Upstream sends approach figures as decimal strings and diameters as numbers.
fn as_finite_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
