//! Text patterns for Python web frameworks.

use std::sync::LazyLock;

use regex::Regex;

use super::{compile, numbered_lines};
use crate::endpoint::{standard_method, EndpointRecord};

static ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"@\w+\.route\(['"]([^'"]+)['"](,\s*methods=\[([^\]]+)\])?"#)
});

static VERB: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"@\w+\.(get|post|put|delete|patch|options|head)\(['"]([^'"]+)['"]\s*[,)]"#)
});

static DJANGO_PATH: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"\b(?:path|url|re_path)\(['"]([^'"]+)['"]\s*,\s*(\w+(?:\.\w+)*)"#)
});

static FLASK_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?m)^\s*(?:from\s+flask[\s.]|import\s+flask\b)"));

/// Scan Python source line by line for route declarations.
pub fn extract_python_patterns(content: &str, file: &str) -> Vec<EndpointRecord> {
    let verb_framework = if FLASK_IMPORT.is_match(content) {
        "Flask"
    } else {
        "FastAPI"
    };
    let mut endpoints = Vec::new();

    for (line_no, line) in numbered_lines(content) {
        for caps in ROUTE.captures_iter(line) {
            let path = &caps[1];
            let methods: Vec<&str> = match caps.get(3) {
                Some(list) => list
                    .as_str()
                    .split(',')
                    .filter_map(|m| standard_method(m.trim().trim_matches(|c| c == '\'' || c == '"')))
                    .collect(),
                None => vec!["GET"],
            };
            for method in methods {
                endpoints.push(EndpointRecord::new(path, method, "Flask", file, line_no, "unknown"));
            }
        }

        for caps in VERB.captures_iter(line) {
            endpoints.push(EndpointRecord::new(
                &caps[2],
                caps[1].to_uppercase(),
                verb_framework,
                file,
                line_no,
                "unknown",
            ));
        }

        for caps in DJANGO_PATH.captures_iter(line) {
            endpoints.push(EndpointRecord::new(&caps[1], "", "Django", file, line_no, &caps[2]));
        }
    }
    endpoints
}
