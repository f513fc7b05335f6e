//! Recognizing OpenAPI/Swagger files that already exist in a repository.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use ignore::WalkBuilder;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::document::DocumentFormat;
use crate::error::Result;

static DOCUMENT_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:swagger|openapi|api-docs|api-specification|swagger-config|openapi-config)\.(?:json|ya?ml)$",
    )
    .expect("Invalid regex")
});

const SKIPPED_DIRS: [&str; 3] = ["node_modules", "vendor", "third_party"];

/// What the validator learned from a recognized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedDocument {
    pub format: DocumentFormat,
    /// `"Swagger 2.0"`, `"OpenAPI 3.0.1"`, ...
    pub version: String,
    pub info: Value,
}

/// A recognized document found on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredDocument {
    /// Path relative to the scanned root.
    pub file: String,
    /// Absolute (or root-joined) path.
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub version: String,
    pub info: Value,
}

/// Check whether `content` is a Swagger or OpenAPI document.
///
/// JSON is tried first, then YAML. Anything that fails to parse, or lacks
/// a top-level `swagger`/`openapi` key, is not a document.
pub fn validate_api_document(content: &str) -> Option<ValidatedDocument> {
    let (format, data) = match serde_json::from_str::<Value>(content) {
        Ok(data) => (DocumentFormat::Json, data),
        Err(_) => match serde_yaml::from_str::<Value>(content) {
            Ok(data) => (DocumentFormat::Yaml, data),
            Err(e) => {
                debug!(error = %e, "not JSON or YAML");
                return None;
            }
        },
    };

    let object = data.as_object()?;
    let (label, version) = if let Some(version) = object.get("swagger") {
        ("Swagger", version)
    } else if let Some(version) = object.get("openapi") {
        ("OpenAPI", version)
    } else {
        return None;
    };

    let version = match version {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let info = object
        .get("info")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    Some(ValidatedDocument {
        format,
        version: format!("{} {}", label, version),
        info,
    })
}

/// Read and validate a file. Unreadable files are not documents.
pub fn validate_api_file(path: &Path) -> Option<ValidatedDocument> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(file = %path.display(), error = %e, "could not read candidate document");
            return None;
        }
    };
    validate_api_document(&String::from_utf8_lossy(&bytes))
}

/// Find recognized documents under `root`, sorted by relative path.
///
/// Only files whose names look like API descriptions are opened. Hidden
/// and ignore-listed files are included; files under `node_modules`,
/// `vendor` or `third_party` are not.
pub fn find_api_documents(root: &Path) -> Vec<DiscoveredDocument> {
    info!(root = %root.display(), "searching for API documents");

    // Hidden and ignored directories often hold published documents.
    let mut found: Vec<DiscoveredDocument> = WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let path = entry.into_path();
            let relative = path.strip_prefix(root).unwrap_or(path.as_path()).to_path_buf();
            let name = path.file_name()?.to_str()?;
            if !DOCUMENT_FILE_NAME.is_match(name) || in_skipped_dir(&relative) {
                return None;
            }

            let Some(validated) = validate_api_file(&path) else {
                debug!(file = %relative.display(), "name matches but content is not an API document");
                return None;
            };
            info!(file = %relative.display(), version = %validated.version, "found API document");
            Some(DiscoveredDocument {
                file: relative.to_string_lossy().replace('\\', "/"),
                path,
                format: validated.format,
                version: validated.version,
                info: validated.info,
            })
        })
        .collect();

    found.sort_by(|a, b| a.file.cmp(&b.file));
    found
}

fn in_skipped_dir(relative: &Path) -> bool {
    relative.components().any(|c| {
        let part = c.as_os_str().to_string_lossy().to_ascii_lowercase();
        SKIPPED_DIRS.iter().any(|dir| part.contains(dir))
    })
}

/// Copy a discovered document into `dir` under its own file name.
pub fn save_discovered(doc: &DiscoveredDocument, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let name = doc
        .path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("openapi.{}", doc.format.extension())));
    let target = dir.join(name);
    fs::copy(&doc.path, &target)?;
    info!(path = %target.display(), "saved discovered API document");
    Ok(target)
}
