//! OpenAPI 3.0 document types and serialization.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{FinderError, Result};

pub const OPENAPI_VERSION: &str = "3.0.0";

/// Operations of one path, keyed by lower-case verb.
pub type PathItem = IndexMap<String, Operation>;

/// Root of an assembled document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    pub openapi: String,
    pub info: Info,
    /// Cleaned path → verb → operation, in first-seen order.
    pub paths: IndexMap<String, PathItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub responses: IndexMap<String, Response>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "string_schema")]
    pub schema: Value,
}

impl Parameter {
    /// A string-typed parameter. Path parameters are always required.
    pub fn string(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == ParameterLocation::Path,
            description: None,
            schema: string_schema(),
        }
    }
}

fn string_schema() -> Value {
    json!({ "type": "string" })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub description: String,
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    /// Untyped JSON object body.
    pub fn json_object() -> Self {
        let mut content = IndexMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType {
                schema: json!({ "type": "object" }),
            },
        );
        Self {
            description: "Request body".to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
}

impl ApiDocument {
    /// An empty document titled after a repository.
    pub fn new(repo_name: &str) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: format!("API Documentation for {}", repo_name),
                description: format!("Automatically generated API documentation for {}", repo_name),
                version: "1.0.0".to_string(),
            },
            paths: IndexMap::new(),
        }
    }

    /// Number of operations across all paths.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.len()).sum()
    }

    /// Serialize as pretty JSON or YAML.
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            DocumentFormat::Yaml => Ok(serde_yaml::to_string(self)?),
        }
    }
}

/// Serialization format for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(FinderError::Config(format!(
                "unknown document format '{}' (expected json or yaml)",
                other
            ))),
        }
    }
}

/// Write `doc` to `<dir>/openapi-<repo>.<ext>`, creating `dir` if needed.
pub fn save_document(
    doc: &ApiDocument,
    dir: &Path,
    repo_name: &str,
    format: DocumentFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("openapi-{}.{}", repo_name, format.extension()));
    fs::write(&path, doc.render(format)?)?;
    info!(path = %path.display(), "saved generated API document");
    Ok(path)
}
