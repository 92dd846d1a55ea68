use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::catalog_service::CatalogError;
use crate::services::itinerary_generation_service::ScheduleError;

pub const INVALID_DAYS_MESSAGE: &str =
    "Please provide a valid number of days (e.g., {\"days\": 3})";
pub const EMPTY_CATALOG_MESSAGE: &str =
    "No destinations found in the local data file. Please add some destinations.";

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("application rejected: {}", .0.join("; "))]
    ApplicationRejected(Vec<String>),

    #[error("{0}")]
    CatalogUnavailable(String),

    #[error("{}", EMPTY_CATALOG_MESSAGE)]
    CatalogEmpty,

    #[error("Submission failed: {0}")]
    Storage(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::ApplicationRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::CatalogEmpty => StatusCode::NOT_FOUND,
            ApiError::CatalogUnavailable(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::ApplicationRejected(errors) => json!({ "errors": errors }),
            other => json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::CatalogUnavailable(format!("Error loading destination data: {}", err))
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidDayCount => ApiError::Validation(INVALID_DAYS_MESSAGE.to_string()),
            ScheduleError::EmptyCatalog => ApiError::CatalogEmpty,
            ScheduleError::InvalidConfig(msg) => ApiError::CatalogUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_rejected_application_lists_every_error() {
        let err = ApiError::ApplicationRejected(vec![
            "Full name is required.".to_string(),
            "CV (PDF) is required.".to_string(),
        ]);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_schedule_errors_map_to_http_statuses() {
        assert_eq!(
            ApiError::from(ScheduleError::InvalidDayCount).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ScheduleError::EmptyCatalog).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Storage("disk full".into()).to_string(),
            "Submission failed: disk full"
        );
    }
}
