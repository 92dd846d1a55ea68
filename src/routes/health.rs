use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn new(status: &str, details: String) -> Self {
        Self {
            status: status.to_string(),
            details: Some(details),
        }
    }
}

pub async fn home() -> impl Responder {
    "Travel planner backend is running! Try POST /itinerary/generate, GET /tour/guides or POST /tour/apply."
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog_result = check_catalog(&state).await;
    health
        .services
        .insert("destinations".to_string(), catalog_result.clone());

    health
        .services
        .insert("reviews".to_string(), check_reviews(&state).await);

    health
        .services
        .insert("tour_guides".to_string(), check_guides(&state).await);

    // Reviews and the guide listing are optional, only the catalog degrades the service
    if catalog_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_catalog(state: &AppState) -> ServiceStatus {
    match state.catalog.load_destinations().await {
        Ok(raw) if raw.is_empty() => ServiceStatus::new("error", "Catalog is empty".to_string()),
        Ok(raw) => ServiceStatus::new("ok", format!("{} destinations", raw.len())),
        Err(e) => {
            log::error!("Catalog health check failed: {}", e);
            ServiceStatus::new("error", e.to_string())
        }
    }
}

async fn check_reviews(state: &AppState) -> ServiceStatus {
    match state.catalog.load_reviews().await {
        Ok(reviews) => ServiceStatus::new("ok", format!("{} review entries", reviews.len())),
        Err(e) => ServiceStatus::new("unavailable", e.to_string()),
    }
}

async fn check_guides(state: &AppState) -> ServiceStatus {
    let guides = state.guides.list().await;
    ServiceStatus::new(
        "ok",
        format!(
            "{} guides listed in {}",
            guides.len(),
            state.guides.listing_path().display()
        ),
    )
}
