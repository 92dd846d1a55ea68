use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::db::json_file::{read_json, JsonFileError};
use crate::models::destination::ReviewEntry;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    File(#[from] JsonFileError),
}

fn review_entry(raw: Value) -> Option<ReviewEntry> {
    let Value::Object(mut record) = raw else {
        return None;
    };
    let place = match record.remove("place") {
        None | Some(Value::Null) => None,
        Some(Value::String(place)) => Some(place),
        Some(_) => return None,
    };
    Some(ReviewEntry {
        place,
        reviews: record.remove("reviews"),
    })
}

/// Reads the destination catalog and review data. Nothing is cached; every
/// call goes back to disk.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    destinations_path: PathBuf,
    reviews_path: PathBuf,
}

impl CatalogStore {
    pub fn new(destinations_path: impl Into<PathBuf>, reviews_path: impl Into<PathBuf>) -> Self {
        Self {
            destinations_path: destinations_path.into(),
            reviews_path: reviews_path.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.destinations_path(), config.reviews_path())
    }

    pub fn destinations_path(&self) -> &PathBuf {
        &self.destinations_path
    }

    /// Raw catalog records. The document must be a JSON array.
    pub async fn load_destinations(&self) -> Result<Vec<Value>, CatalogError> {
        Ok(read_json(&self.destinations_path).await?)
    }

    /// Review entries, parsed one by one. An entry that is not an object or
    /// whose `place` is not text is skipped on its own.
    pub async fn load_reviews(&self) -> Result<Vec<ReviewEntry>, CatalogError> {
        let raw: Vec<Value> = read_json(&self.reviews_path).await?;
        Ok(raw
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| match review_entry(entry) {
                Some(review) => Some(review),
                None => {
                    log::warn!("Skipping malformed review entry #{}", position);
                    None
                }
            })
            .collect())
    }

    /// Review data is optional: any failure is logged and treated as no reviews.
    pub async fn load_reviews_or_empty(&self) -> Vec<ReviewEntry> {
        match self.load_reviews().await {
            Ok(reviews) => reviews,
            Err(e) => {
                log::warn!(
                    "Review data unavailable, ratings will not use reviews: {}",
                    e
                );
                Vec::new()
            }
        }
    }
}
