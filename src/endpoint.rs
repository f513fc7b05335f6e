//! The endpoint record every extractor produces.

use serde::{Deserialize, Serialize};

use crate::openapi::Parameter;

/// The seven verbs that can appear in an assembled document.
pub const STANDARD_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS", "HEAD"];

/// Method recorded for generic middleware mounts (`app.use(...)`).
pub const MOUNT_METHOD: &str = "USE";

/// Normalize a verb to its upper-case standard form, if it is one.
pub fn standard_method(verb: &str) -> Option<&'static str> {
    let upper = verb.to_ascii_uppercase();
    STANDARD_METHODS.iter().copied().find(|m| *m == upper)
}

/// One detected route declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// URL template as written in source (`/users/:id`, `<int:pk>/`, `/{id}`).
    pub path: String,
    /// Upper-case verb, `""` when the idiom carries none, or `"USE"` for mounts.
    pub method: String,
    pub framework: String,
    pub file: String,
    /// 1-indexed; 0 when unknown.
    pub line: usize,
    pub function: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookie_params: Vec<String>,
    /// Pre-shaped parameters copied into the operation as-is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub has_request_body: bool,
}

impl EndpointRecord {
    /// A record with empty parameter buckets. An empty `path` becomes `"/"`.
    pub fn new(
        path: impl Into<String>,
        method: impl Into<String>,
        framework: &str,
        file: &str,
        line: usize,
        function: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            method: method.into(),
            framework: framework.to_string(),
            file: file.to_string(),
            line,
            function: function.into(),
            description: String::new(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            header_params: Vec::new(),
            cookie_params: Vec::new(),
            parameters: Vec::new(),
            has_request_body: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_method() {
        assert_eq!(standard_method("get"), Some("GET"));
        assert_eq!(standard_method("Patch"), Some("PATCH"));
        assert_eq!(standard_method("trace"), None);
        assert_eq!(standard_method("use"), None);
    }

    #[test]
    fn test_empty_path_defaults_to_root() {
        let record = EndpointRecord::new("", "GET", "Flask", "app.py", 3, "index");
        assert_eq!(record.path, "/");
        assert!(!record.has_request_body);
    }

    #[test]
    fn test_empty_buckets_are_not_serialized() {
        let record = EndpointRecord::new("/a", "GET", "Express.js", "app.js", 1, "anonymous");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("query_params").is_none());
        assert_eq!(json["has_request_body"], false);
    }
}
