use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::error::{ApiError, INVALID_DAYS_MESSAGE};
use crate::services::itinerary_generation_service::RandomOrdering;
use crate::services::normalization_service::normalize_catalog;
use crate::services::rating_service::RatingService;
use crate::state::AppState;

/// Bad or missing JSON bodies get the same answer as a bad `days` value.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        log::debug!("Rejected itinerary request body: {}", err);
        ApiError::Validation(INVALID_DAYS_MESSAGE.to_string()).into()
    })
}

/// `days` must be a JSON integer between 1 and `max_days`.
pub fn parse_days(body: &Value, max_days: u32) -> Result<u32, ApiError> {
    body.get("days")
        .and_then(Value::as_u64)
        .and_then(|days| u32::try_from(days).ok())
        .filter(|days| (1..=max_days).contains(days))
        .ok_or_else(|| ApiError::Validation(INVALID_DAYS_MESSAGE.to_string()))
}

/*
    /itinerary/generate
*/
pub async fn generate(
    state: web::Data<AppState>,
    input: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let num_days = parse_days(&input, state.config.max_days)?;

    let raw = state.catalog.load_destinations().await.map_err(|err| {
        log::error!(
            "Failed to load destinations from {}: {}",
            state.catalog.destinations_path().display(),
            err
        );
        ApiError::from(err)
    })?;
    let reviews = state.catalog.load_reviews_or_empty().await;

    if raw.is_empty() {
        return Err(ApiError::CatalogEmpty);
    }

    let ratings = RatingService::rating_index(&reviews);
    let mut rng = rand::thread_rng();
    let destinations = normalize_catalog(&raw, &ratings, &mut rng);

    let itinerary = state
        .generator
        .generate(&destinations, num_days, &mut RandomOrdering::new(rng))?;

    log::info!(
        "Generated {}-day itinerary from {} destinations",
        num_days,
        destinations.len()
    );
    Ok(HttpResponse::Ok().json(itinerary))
}
