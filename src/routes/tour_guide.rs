use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;

use crate::error::ApiError;
use crate::models::tour_guide::{ApplicationForm, ApplicationReceipt, CvUpload};
use crate::services::tour_guide_service::validate_application;
use crate::state::AppState;

const CV_FIELD: &str = "cvFile";
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/*
    /tour/guides
*/
pub async fn get_guides(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.guides.list().await)
}

/*
    /tour/apply
*/
pub async fn apply(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = read_application_form(payload, state.config.max_cv_bytes).await?;
    let application = validate_application(form).map_err(ApiError::ApplicationRejected)?;

    let cv_path = state
        .guides
        .save_cv(&application.name, &application.cv.bytes)
        .await
        .map_err(log_storage_failure)?;
    let guide = state
        .guides
        .register(&application)
        .await
        .map_err(log_storage_failure)?;

    log::info!("Registered tour guide {} ({})", guide.name, guide.id);

    Ok(HttpResponse::Created().json(ApplicationReceipt {
        message: "Application submitted successfully and added to tour guide list.".to_string(),
        cv_file_saved_at: cv_path.display().to_string(),
        guide_id: guide.id,
    }))
}

fn log_storage_failure(err: ApiError) -> ApiError {
    log::error!("Guide application failed: {}", err);
    err
}

fn malformed(err: impl std::fmt::Display) -> ApiError {
    ApiError::Validation(format!("Malformed form data: {}", err))
}

fn too_large(what: &str, limit: usize) -> ApiError {
    ApiError::ApplicationRejected(vec![format!(
        "{} exceeds the maximum size of {} bytes.",
        what, limit
    )])
}

/// Collect the multipart fields into an [`ApplicationForm`]. Unknown fields are
/// drained and ignored.
async fn read_application_form(
    mut payload: Multipart,
    max_cv_bytes: usize,
) -> Result<ApplicationForm, ApiError> {
    let mut form = ApplicationForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == CV_FIELD {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            let mut bytes = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(malformed)? {
                if bytes.len() + chunk.len() > max_cv_bytes {
                    return Err(too_large("CV file", max_cv_bytes));
                }
                bytes.extend_from_slice(&chunk);
            }
            form.cv = Some(CvUpload { filename, bytes });
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                return Err(too_large(&name, MAX_TEXT_FIELD_BYTES));
            }
            bytes.extend_from_slice(&chunk);
        }
        let value = String::from_utf8(bytes).map_err(malformed)?;

        match name.as_str() {
            "contact" => form.contact = Some(value),
            "name" => form.name = Some(value),
            "language" => form.language = Some(value),
            "price" => form.price = Some(value),
            "description" => form.description = Some(value),
            "picture" => form.picture = Some(value),
            _ => {}
        }
    }

    Ok(form)
}
