//! JSON documents on disk, used in place of a database for the static catalog
//! and the guide listing.

use std::io;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("{path} not found")]
    NotFound { path: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => JsonFileError::NotFound { path: display(path) },
        _ => JsonFileError::Io {
            path: display(path),
            source,
        },
    })?;

    serde_json::from_slice(&bytes).map_err(|source| JsonFileError::Parse {
        path: display(path),
        source,
    })
}

/// Pretty-print `value` with a four-space indent and replace the file.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), JsonFileError> {
    let io_err = |source| JsonFileError::Io {
        path: display(path),
        source,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|source| JsonFileError::Parse {
            path: display(path),
            source,
        })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, buf).await.map_err(io_err)
}
