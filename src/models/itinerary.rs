use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::destination::Destination;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScheduleSlot {
    pub destination_name: String,
    #[serde(with = "hh_mm")]
    pub start_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub price: String,
    pub location: String,
    pub description: String,
    pub rating: Option<f64>,
}

impl ScheduleSlot {
    /// Snapshot of `destination` placed at `[start, end)`.
    pub fn for_destination(destination: &Destination, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            destination_name: destination.name.clone(),
            start_time: start,
            end_time: end,
            duration_minutes: destination.duration_minutes,
            price: destination.price.clone(),
            location: destination.location.clone(),
            description: destination.description.clone(),
            rating: destination.rating,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DayPlan {
    pub day: u32,
    pub schedule: Vec<ScheduleSlot>,
}

/// Wall-clock times travel as `HH:MM`.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
