//! Text patterns for Spring controllers.
//!
//! The class-level `@RequestMapping` is the one that appears before the
//! first class declaration; it is excluded from the method pass.

use std::sync::LazyLock;

use regex::Regex;

use super::{compile, numbered_lines};
use crate::endpoint::{standard_method, EndpointRecord};
use crate::parser::paths::join_paths;

const PARAM_LOOKAHEAD: usize = 10;

static CONTROLLER: LazyLock<Regex> = LazyLock::new(|| compile(r"@(?:RestController|Controller)\b"));

static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| compile(r"\bclass\s+\w+"));

static CLASS_MAPPING: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"@RequestMapping\b(?:\s*\(\s*(?:(?:value|path)\s*=\s*)?\{?\s*["']([^"']*)["'])?"#)
});

/// `(pattern, verb)`; a `None` verb is read from the `method` attribute.
static METHOD_MAPPINGS: LazyLock<Vec<(Regex, Option<&'static str>)>> = LazyLock::new(|| {
    let verb_mapping = |name: &str| {
        compile(&format!(
            r#"@{name}\b(?:\s*\(\s*(?:(?:value|path)\s*=\s*)?(?:["']([^"']*)["'])?)?"#
        ))
    };
    vec![
        (verb_mapping("GetMapping"), Some("GET")),
        (verb_mapping("PostMapping"), Some("POST")),
        (verb_mapping("PutMapping"), Some("PUT")),
        (verb_mapping("DeleteMapping"), Some("DELETE")),
        (verb_mapping("PatchMapping"), Some("PATCH")),
        (verb_mapping("RequestMapping"), None),
    ]
});

static PATH_VARIABLE: LazyLock<Regex> = LazyLock::new(|| param_pattern("PathVariable"));
static REQUEST_PARAM: LazyLock<Regex> = LazyLock::new(|| param_pattern("RequestParam"));
static REQUEST_HEADER: LazyLock<Regex> = LazyLock::new(|| param_pattern("RequestHeader"));
static COOKIE_VALUE: LazyLock<Regex> = LazyLock::new(|| param_pattern("CookieValue"));
static REQUEST_BODY: LazyLock<Regex> = LazyLock::new(|| compile(r"@RequestBody\b"));

/// `method = RequestMethod.PUT` or `method = {RequestMethod.GET, POST}`.
static METHOD_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\bmethod\s*=\s*(\{[^}]*\}?|[\w.]+)"));
static METHOD_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"\b([A-Z]+)\b"));

static CLOSING_BRACE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*\}\s*$"));
static ANY_MAPPING: LazyLock<Regex> = LazyLock::new(|| compile(r"@\w+Mapping"));

fn param_pattern(annotation: &str) -> Regex {
    compile(&format!(
        r#"@{annotation}\s*(?:\(\s*(?:(?:value|name)\s*=\s*)?["']([^"']+)["'][^)]*)?\s*\)?\s*(?:\w+(?:<[^>]*>)?\s+)?(\w+)"#
    ))
}

/// Scan Java source line by line for Spring controller mappings.
pub fn extract_spring_patterns(content: &str, file: &str) -> Vec<EndpointRecord> {
    if !CONTROLLER.is_match(content) {
        return Vec::new();
    }
    let lines: Vec<(usize, &str)> = numbered_lines(content).collect();

    let mut base_path = "/".to_string();
    let mut class_mapping_line = None;
    for &(line_no, line) in &lines {
        if let Some(caps) = CLASS_MAPPING.captures(line) {
            base_path = caps.get(1).map_or("/", |m| m.as_str()).to_string();
            class_mapping_line = Some(line_no);
        }
        if CLASS_DECLARATION.is_match(line) {
            break;
        }
    }

    let mut endpoints = Vec::new();
    for (index, &(line_no, line)) in lines.iter().enumerate() {
        if Some(line_no) == class_mapping_line {
            continue;
        }
        for (pattern, verb) in METHOD_MAPPINGS.iter() {
            for caps in pattern.captures_iter(line) {
                let local = caps.get(1).map(|m| m.as_str()).unwrap_or("/");
                let methods = match verb {
                    Some(verb) => vec![*verb],
                    None => request_methods(line),
                };
                for method in methods {
                    let mut record = EndpointRecord::new(
                        join_paths(&base_path, local),
                        method,
                        "Spring Boot",
                        file,
                        line_no,
                        "unknown",
                    );
                    scan_parameters(&lines[index + 1..], &mut record);
                    endpoints.push(record);
                }
            }
        }
    }
    endpoints
}

/// Verbs of a `@RequestMapping` line. GET when no `method` is given;
/// unrecognised verbs are dropped.
fn request_methods(line: &str) -> Vec<&'static str> {
    let Some(caps) = METHOD_ATTRIBUTE.captures(line) else {
        return vec!["GET"];
    };
    METHOD_NAME
        .captures_iter(&caps[1])
        .filter_map(|m| standard_method(&m[1]))
        .collect()
}

/// Fill parameter buckets from the lines following a mapping annotation.
fn scan_parameters(following: &[(usize, &str)], record: &mut EndpointRecord) {
    for &(_, line) in following.iter().take(PARAM_LOOKAHEAD) {
        record.path_params.extend(param_names(&PATH_VARIABLE, line));
        record.query_params.extend(param_names(&REQUEST_PARAM, line));
        record
            .header_params
            .extend(param_names(&REQUEST_HEADER, line).map(|name| {
                if name.eq_ignore_ascii_case("authorization") {
                    "Authorization".to_string()
                } else {
                    name
                }
            }));
        record.cookie_params.extend(param_names(&COOKIE_VALUE, line));
        if REQUEST_BODY.is_match(line) {
            record.has_request_body = true;
        }

        if CLOSING_BRACE.is_match(line) || ANY_MAPPING.is_match(line) {
            break;
        }
    }
}

/// Annotation value when present, otherwise the variable name.
fn param_names<'a>(pattern: &'a Regex, line: &'a str) -> impl Iterator<Item = String> + 'a {
    pattern.captures_iter(line).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}
