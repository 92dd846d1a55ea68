#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use serde_json::Value;
use tempfile::TempDir;

use travel_planner_api::{config::AppConfig, routes, state::AppState};

pub const BOUNDARY: &str = "----travelplannertestboundary";

/// Application wired to a throwaway data directory.
pub struct TestApp {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = AppConfig::with_data_dir(dir.path());
        adjust(&mut config);
        Self { dir, config }
    }

    pub fn with_catalog(catalog: &Value) -> Self {
        let app = Self::new();
        app.write_json("destinations.json", catalog);
        app
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        std::fs::write(self.dir.path().join(name), contents).expect("write fixture");
    }

    pub fn write_json(&self, name: &str, value: &Value) {
        self.write_file(name, &value.to_string());
    }

    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = AppState::new(self.config.clone()).expect("valid schedule config");

        App::new()
            .app_data(web::Data::new(state))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

/// Minutes after midnight for an `HH:MM` string.
pub fn minutes(hh_mm: &str) -> u32 {
    let (h, m) = hh_mm.split_once(':').expect("HH:MM");
    h.parse::<u32>().unwrap() * 60 + m.parse::<u32>().unwrap()
}

/// A multipart/form-data body with text fields and an optional `cvFile` part.
pub fn multipart_body(fields: &[(&str, &str)], cv: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = cv {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"cvFile\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

pub fn valid_application_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("contact", "guide@example.com"),
        ("name", "Made Wirawan"),
        ("language", "Indonesian, English"),
        ("price", "$50 - $100"),
        ("description", "Temple and rice terrace tours around Ubud."),
    ]
}
