//! Text patterns for Express.js routes.

use std::sync::LazyLock;

use regex::Regex;

use super::{compile, numbered_lines};
use crate::endpoint::{EndpointRecord, MOUNT_METHOD, STANDARD_METHODS};

static EXPRESS_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?:app|router|[A-Za-z_$][A-Za-z0-9_$]*)\.(get|post|put|delete|patch|options|head|all|use)\s*\(\s*['"]([^'"]+)['"]"#,
    )
});

/// Scan JavaScript/TypeScript source line by line for Express routes.
///
/// Any receiver is accepted here, so this is noisier than the structural
/// pass and only used when that pass cannot parse the file.
pub fn extract_express_patterns(content: &str, file: &str) -> Vec<EndpointRecord> {
    let mut endpoints = Vec::new();

    for (line_no, line) in numbered_lines(content) {
        for caps in EXPRESS_ROUTE.captures_iter(line) {
            let path = &caps[2];
            let methods: Vec<String> = match &caps[1] {
                "use" => vec![MOUNT_METHOD.to_string()],
                "all" => STANDARD_METHODS.iter().map(|m| m.to_string()).collect(),
                verb => vec![verb.to_uppercase()],
            };
            for method in methods {
                endpoints.push(EndpointRecord::new(
                    path,
                    method,
                    "Express.js",
                    file,
                    line_no,
                    "anonymous",
                ));
            }
        }
    }
    endpoints
}
