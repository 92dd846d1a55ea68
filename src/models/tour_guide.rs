use serde::{Deserialize, Serialize};

pub const DEFAULT_PICTURE: &str = "/assets/default_profile.jpg";

/// An entry of the public guide listing (`tourGuides.json`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TourGuide {
    pub id: String,
    pub name: String,
    pub language: String,
    pub price: String,
    pub description: String,
    pub picture: String,
}

/// Raw multipart form of `/tour/apply`, before validation.
#[derive(Debug, Default, Clone)]
pub struct ApplicationForm {
    pub contact: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub cv: Option<CvUpload>,
}

#[derive(Debug, Clone)]
pub struct CvUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A form that passed validation; every required field is present.
#[derive(Debug, Clone)]
pub struct GuideApplication {
    pub contact: String,
    pub name: String,
    pub language: String,
    pub price: String,
    pub description: String,
    pub picture: Option<String>,
    pub cv: CvUpload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    pub message: String,
    pub cv_file_saved_at: String,
    pub guide_id: String,
}
