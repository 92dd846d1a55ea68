use std::env;
use std::path::PathBuf;

use chrono::NaiveTime;
use thiserror::Error;

use crate::services::itinerary_generation_service::{MealWindow, ScheduleConfig, ScheduleError};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 5000;
const DATA_DIR: &str = "data";
const DESTINATIONS_FILE: &str = "destinations.json";
const REVIEWS_FILE: &str = "destinationReview.json";
const GUIDES_FILE: &str = "tourGuides.json";
const UPLOAD_DIR: &str = "tour_guide_applications_data_cvs";
const MAX_CV_BYTES: usize = 10 * 1024 * 1024;
const MAX_DAYS: u32 = 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub data_dir: PathBuf,
    pub destinations_file: String,
    pub reviews_file: String,
    pub guides_file: String,
    pub upload_dir: PathBuf,
    pub max_cv_bytes: usize,
    pub max_days: u32,
    pub schedule: ScheduleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            environment: "development".to_string(),
            data_dir: PathBuf::from(DATA_DIR),
            destinations_file: DESTINATIONS_FILE.to_string(),
            reviews_file: REVIEWS_FILE.to_string(),
            guides_file: GUIDES_FILE.to_string(),
            upload_dir: PathBuf::from(UPLOAD_DIR),
            max_cv_bytes: MAX_CV_BYTES,
            max_days: MAX_DAYS,
            schedule: ScheduleConfig::default(),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_time(var: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::Invalid {
        var,
        expected: "a time in HH:MM",
        value: value.to_string(),
    })
}

/// `"11:00-13:00,17:00-19:00"`; an empty string means no meal windows.
pub fn parse_meal_windows(value: &str) -> Result<Vec<MealWindow>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (start, end) = part.split_once('-').ok_or_else(|| ConfigError::Invalid {
                var: "MEAL_WINDOWS",
                expected: "comma separated HH:MM-HH:MM ranges",
                value: value.to_string(),
            })?;
            Ok(MealWindow::new(
                parse_time("MEAL_WINDOWS", start)?,
                parse_time("MEAL_WINDOWS", end)?,
            ))
        })
        .collect()
}

impl AppConfig {
    /// Read settings from the environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                expected: "a port number",
                value: raw,
            })?,
            Err(_) => defaults.port,
        };

        let max_cv_bytes = match env::var("MAX_CV_BYTES") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| ConfigError::Invalid {
                var: "MAX_CV_BYTES",
                expected: "a size in bytes",
                value: raw,
            })?,
            Err(_) => defaults.max_cv_bytes,
        };

        let max_days = match env::var("MAX_DAYS") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::Invalid {
                    var: "MAX_DAYS",
                    expected: "a positive number of days",
                    value: raw,
                })?,
            Err(_) => defaults.max_days,
        };

        let mut schedule = defaults.schedule.clone();
        if let Ok(raw) = env::var("DAY_START") {
            schedule.day_start = parse_time("DAY_START", &raw)?;
        }
        if let Ok(raw) = env::var("DAY_END") {
            schedule.day_end = parse_time("DAY_END", &raw)?;
        }
        if let Ok(raw) = env::var("MEAL_WINDOWS") {
            schedule.meal_windows = parse_meal_windows(&raw)?;
        }
        schedule.validate()?;

        Ok(Self {
            host: var_or("HOST", &defaults.host),
            port,
            environment: var_or("RUST_ENV", &defaults.environment),
            data_dir: PathBuf::from(var_or("DATA_DIR", DATA_DIR)),
            destinations_file: var_or("DESTINATIONS_FILE", DESTINATIONS_FILE),
            reviews_file: var_or("REVIEWS_FILE", REVIEWS_FILE),
            guides_file: var_or("GUIDES_FILE", GUIDES_FILE),
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", UPLOAD_DIR)),
            max_cv_bytes,
            max_days,
            schedule,
        })
    }

    /// Defaults rooted at `data_dir`, with uploads under `data_dir/cvs`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            upload_dir: data_dir.join("cvs"),
            data_dir,
            ..Self::default()
        }
    }

    pub fn destinations_path(&self) -> PathBuf {
        self.data_dir.join(&self.destinations_file)
    }

    pub fn reviews_path(&self) -> PathBuf {
        self.data_dir.join(&self.reviews_file)
    }

    pub fn guides_path(&self) -> PathBuf {
        self.data_dir.join(&self.guides_file)
    }
}
