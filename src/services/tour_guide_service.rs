//! Tour guide applications
//!
//! Applications arrive as multipart forms with a PDF CV. Accepted applicants
//! are added straight to the public listing in `tourGuides.json`; the CV is
//! kept on disk next to it.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::json_file::{read_json, write_json, JsonFileError};
use crate::error::ApiError;
use crate::models::tour_guide::{ApplicationForm, GuideApplication, TourGuide, DEFAULT_PICTURE};

struct Patterns {
    email: Regex,
    phone: Regex,
    price_code: Regex,
    price_dollar: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        email: Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email pattern"),
        phone: Regex::new(r"^\+?[0-9\s\-\(\)]{7,20}$").expect("phone pattern"),
        price_code: Regex::new(r"^[A-Z]{3}\s\d+(\.\d+)?$").expect("currency code price pattern"),
        price_dollar: Regex::new(r"^\$\d+(\.\d+)?(\s*-\s*\$\d+(\.\d+)?)?$")
            .expect("dollar price pattern"),
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &str, errors: &mut Vec<String>) -> Option<String> {
    let value = present(value);
    if value.is_none() {
        errors.push(message.to_string());
    }
    value
}

/// Check every field and collect all problems, not just the first.
pub fn validate_application(form: ApplicationForm) -> Result<GuideApplication, Vec<String>> {
    let patterns = patterns();
    let mut errors = Vec::new();
    let ApplicationForm {
        contact,
        name,
        language,
        price,
        description,
        picture,
        cv,
    } = form;

    let contact = required(contact, "Email address or phone number is required.", &mut errors);
    match contact.as_deref() {
        Some(contact) if contact.contains('@') => {
            if !patterns.email.is_match(contact) {
                errors.push("Invalid email address format.".to_string());
            }
        }
        Some(contact) => {
            if !patterns.phone.is_match(contact) {
                errors.push("Invalid phone number format.".to_string());
            }
        }
        None => {}
    }

    let name = required(name, "Full name is required.", &mut errors);
    let language = required(language, "Languages spoken is required.", &mut errors);
    let price = required(price, "Price range is required.", &mut errors);
    if let Some(price) = price.as_deref() {
        if !patterns.price_code.is_match(price) && !patterns.price_dollar.is_match(price) {
            errors.push(
                "Invalid price range format. Use currency symbol (e.g., IDR 100000 or $50 - $100)."
                    .to_string(),
            );
        }
    }
    let description = required(description, "Description is required.", &mut errors);

    let cv = match cv {
        None => {
            errors.push("CV (PDF) is required.".to_string());
            None
        }
        Some(cv) if cv.filename.is_empty() => {
            errors.push("No selected CV file.".to_string());
            None
        }
        Some(cv) => {
            if !secure_filename(&cv.filename).ends_with(".pdf") {
                errors.push("Only PDF files are allowed for CV.".to_string());
            }
            Some(cv)
        }
    };

    match (contact, name, language, price, description, cv) {
        (Some(contact), Some(name), Some(language), Some(price), Some(description), Some(cv))
            if errors.is_empty() =>
        {
            Ok(GuideApplication {
                contact,
                name,
                language,
                price,
                description,
                picture: present(picture),
                cv,
            })
        }
        _ => Err(errors),
    }
}

/// Last path component of an uploaded filename, limited to characters that
/// are safe on any filesystem.
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(&['/', '\\'][..]).next().unwrap_or_default();
    let cleaned: String = base
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_matches(&['.', '_'][..]).to_string()
}

/// The guide listing file plus the CV upload directory.
pub struct GuideStore {
    listing_path: PathBuf,
    upload_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl GuideStore {
    pub fn new(listing_path: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            listing_path: listing_path.into(),
            upload_dir: upload_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.guides_path(), config.upload_dir.clone())
    }

    pub fn listing_path(&self) -> &Path {
        &self.listing_path
    }

    /// Stored entries exactly as they are on disk. A missing, corrupt or
    /// non-array file reads as empty.
    async fn raw_entries(&self) -> Vec<Value> {
        match read_json::<Value>(&self.listing_path).await {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                log::warn!(
                    "{} does not hold a list, treating it as empty",
                    self.listing_path.display()
                );
                Vec::new()
            }
            Err(JsonFileError::NotFound { .. }) => Vec::new(),
            Err(e) => {
                log::warn!("Guide listing unreadable, treating it as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Current listing. Entries that are not complete guides are left out.
    pub async fn list(&self) -> Vec<TourGuide> {
        self.raw_entries()
            .await
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect()
    }

    /// Store the CV as `<applicant>_<timestamp>.pdf` and return its path.
    pub async fn save_cv(&self, applicant: &str, bytes: &[u8]) -> Result<PathBuf, ApiError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        let stem = secure_filename(applicant);
        let stem = if stem.is_empty() { "applicant".to_string() } else { stem };
        let timestamp = Local::now().format("%Y%m%d%H%M%S");
        let path = self.upload_dir.join(format!("{}_{}.pdf", stem, timestamp));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(path)
    }

    /// Append a new guide built from `application` to the listing.
    pub async fn register(&self, application: &GuideApplication) -> Result<TourGuide, ApiError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.raw_entries().await;
        let guide = TourGuide {
            id: Uuid::new_v4().to_string(),
            name: application.name.clone(),
            language: application.language.clone(),
            price: application.price.clone(),
            description: application.description.clone(),
            picture: application
                .picture
                .clone()
                .unwrap_or_else(|| DEFAULT_PICTURE.to_string()),
        };
        let entry = serde_json::to_value(&guide).map_err(|e| ApiError::Storage(e.to_string()))?;
        entries.push(entry);

        write_json(&self.listing_path, &entries)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(guide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tour_guide::CvUpload;

    fn complete_form() -> ApplicationForm {
        ApplicationForm {
            contact: Some("guide@example.com".to_string()),
            name: Some("Made Wirawan".to_string()),
            language: Some("Indonesian, English".to_string()),
            price: Some("IDR 100000".to_string()),
            description: Some("Ten years guiding around Ubud.".to_string()),
            picture: None,
            cv: Some(CvUpload {
                filename: "made cv.pdf".to_string(),
                bytes: b"%PDF-1.4".to_vec(),
            }),
        }
    }

    #[test]
    fn test_complete_form_is_accepted() {
        let application = validate_application(complete_form()).unwrap();
        assert_eq!(application.name, "Made Wirawan");
        assert!(application.picture.is_none());
    }

    #[test]
    fn test_empty_form_reports_every_missing_field() {
        let errors = validate_application(ApplicationForm::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Email address or phone number is required.",
                "Full name is required.",
                "Languages spoken is required.",
                "Price range is required.",
                "Description is required.",
                "CV (PDF) is required.",
            ]
        );
    }

    #[test]
    fn test_contact_formats() {
        for (contact, ok) in [
            ("+62 812-3456-7890", true),
            ("(0361) 123456", true),
            ("12345", false),
            ("someone@nowhere", false),
            ("a@b.co", true),
        ] {
            let form = ApplicationForm {
                contact: Some(contact.to_string()),
                ..complete_form()
            };
            assert_eq!(validate_application(form).is_ok(), ok, "contact {:?}", contact);
        }
    }

    #[test]
    fn test_price_formats() {
        for (price, ok) in [
            ("USD 50", true),
            ("IDR 150000.50", true),
            ("$50", true),
            ("$50 - $100", true),
            ("50 dollars", false),
            ("idr 100000", false),
        ] {
            let form = ApplicationForm {
                price: Some(price.to_string()),
                ..complete_form()
            };
            assert_eq!(validate_application(form).is_ok(), ok, "price {:?}", price);
        }
    }

    #[test]
    fn test_cv_must_be_a_named_pdf() {
        let unnamed = ApplicationForm {
            cv: Some(CvUpload {
                filename: String::new(),
                bytes: vec![],
            }),
            ..complete_form()
        };
        assert_eq!(
            validate_application(unnamed).unwrap_err(),
            vec!["No selected CV file."]
        );

        let docx = ApplicationForm {
            cv: Some(CvUpload {
                filename: "cv.docx".to_string(),
                bytes: vec![],
            }),
            ..complete_form()
        };
        assert_eq!(
            validate_application(docx).unwrap_err(),
            vec!["Only PDF files are allowed for CV."]
        );
    }

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\my cv.pdf"), "my_cv.pdf");
        assert_eq!(secure_filename("Made Wirawan"), "Made_Wirawan");
    }

    #[actix_rt::test]
    async fn test_register_appends_to_listing() {
        let dir = tempfile::tempdir().unwrap();
        let store = GuideStore::new(dir.path().join("tourGuides.json"), dir.path().join("cvs"));
        assert!(store.list().await.is_empty());

        let application = validate_application(complete_form()).unwrap();
        let first = store.register(&application).await.unwrap();
        let second = store.register(&application).await.unwrap();

        let guides = store.list().await;
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0], first);
        assert_ne!(first.id, second.id);
        assert_eq!(first.picture, DEFAULT_PICTURE);
    }

    #[actix_rt::test]
    async fn test_register_keeps_entries_it_cannot_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourGuides.json");
        std::fs::write(
            &path,
            r#"[{"id": "x", "name": "Old Guide", "language": "Javanese", "price": "$20", "description": "Kraton walks"}]"#,
        )
        .unwrap();
        let store = GuideStore::new(&path, dir.path().join("cvs"));

        let application = validate_application(complete_form()).unwrap();
        let guide = store.register(&application).await.unwrap();

        let stored: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["name"], "Old Guide");
        assert!(stored[0].get("picture").is_none());
        assert_eq!(stored[1]["id"], guide.id.as_str());
        assert_eq!(store.list().await, vec![guide]);
    }

    #[actix_rt::test]
    async fn test_corrupt_listing_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourGuides.json");
        let store = GuideStore::new(&path, dir.path().join("cvs"));

        std::fs::write(&path, "{ oops").unwrap();
        assert!(store.list().await.is_empty());

        std::fs::write(&path, r#"{"not": "a list"}"#).unwrap();
        assert!(store.list().await.is_empty());
    }

    #[actix_rt::test]
    async fn test_save_cv_names_file_after_applicant() {
        let dir = tempfile::tempdir().unwrap();
        let store = GuideStore::new(dir.path().join("tourGuides.json"), dir.path().join("cvs"));

        let path = store.save_cv("Made Wirawan", b"%PDF-1.4").await.unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Made_Wirawan_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }
}
