//! Maps raw catalog records onto [`Destination`].
//!
//! The catalog file is hand-maintained, so keys come in a few spellings and
//! values are not always the expected type. Each field has a list of accepted
//! keys and a fallback; only a record that is not an object, or whose name is
//! not usable text, is rejected outright.

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::{seq::SliceRandom, Rng};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::destination::Destination;

pub const DURATION_CANDIDATES: [u32; 4] = [90, 120, 150, 180];
pub const UNKNOWN_PLACE: &str = "Unknown Place";
pub const NOT_AVAILABLE: &str = "N/A";

const NAME_KEYS: &[&str] = &["Place", "place", "name", "Name"];
const PRICE_KEYS: &[&str] = &["Tourism/Visitor Fee (approx in USD)", "price", "Price"];
const LOCATION_KEYS: &[&str] = &["Location", "location"];
const DESCRIPTION_KEYS: &[&str] = &["Description", "description"];
const RATING_KEYS: &[&str] = &["Google Maps Rating", "rating", "Rating"];
const DURATION_KEYS: &[&str] = &["duration", "duration_minutes", "Duration"];

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("place name must be non-empty text, got {0}")]
    InvalidName(String),
}

fn usd_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\$?(\d+\.?\d*)\s*USD").expect("USD price pattern"))
}

/// First present, non-null value among `keys`.
fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn normalize_name(record: &Map<String, Value>) -> Result<String, NormalizeError> {
    match field(record, NAME_KEYS) {
        None => Ok(UNKNOWN_PLACE.to_string()),
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.clone()),
        Some(other) => Err(NormalizeError::InvalidName(other.to_string())),
    }
}

/// `"USD 12.50"` for numbers and strings carrying a USD amount, the raw string
/// otherwise, `"N/A"` when there is no usable price.
pub fn normalize_price(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(amount) => format!("USD {:.2}", amount),
            None => NOT_AVAILABLE.to_string(),
        },
        Some(Value::String(text)) => usd_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|amount| amount.as_str().parse::<f64>().ok())
            .map(|amount| format!("USD {:.2}", amount))
            .unwrap_or_else(|| text.clone()),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn display_text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Positive whole minutes, or `None` when the raw value cannot be used.
fn valid_duration(raw: Option<&Value>) -> Option<u32> {
    let minutes = raw?.as_f64()?.round();
    (minutes >= 1.0 && minutes <= f64::from(u32::MAX)).then_some(minutes as u32)
}

fn random_duration<R: Rng>(rng: &mut R) -> u32 {
    *DURATION_CANDIDATES.choose(rng).unwrap_or(&DURATION_CANDIDATES[0])
}

/// Normalize one raw record. `ratings` is the review-derived index used when
/// the record carries no rating of its own.
pub fn normalize_destination<R: Rng>(
    raw: &Value,
    ratings: &HashMap<String, f64>,
    rng: &mut R,
) -> Result<Destination, NormalizeError> {
    let record = raw.as_object().ok_or(NormalizeError::NotAnObject)?;
    let name = normalize_name(record)?;

    let rating = field(record, RATING_KEYS)
        .and_then(Value::as_f64)
        .or_else(|| ratings.get(&name).copied());

    let duration_minutes =
        valid_duration(field(record, DURATION_KEYS)).unwrap_or_else(|| random_duration(rng));

    Ok(Destination {
        price: normalize_price(field(record, PRICE_KEYS)),
        location: display_text(field(record, LOCATION_KEYS)),
        description: display_text(field(record, DESCRIPTION_KEYS)),
        name,
        duration_minutes,
        rating,
    })
}

/// Normalize a whole catalog, dropping records that cannot be mapped.
pub fn normalize_catalog<R: Rng>(
    raw: &[Value],
    ratings: &HashMap<String, f64>,
    rng: &mut R,
) -> Vec<Destination> {
    raw.iter()
        .enumerate()
        .filter_map(|(position, record)| match normalize_destination(record, ratings, rng) {
            Ok(destination) => Some(destination),
            Err(e) => {
                log::warn!("Skipping catalog record #{}: {}", position, e);
                None
            }
        })
        .collect()
}
