//! Assembles endpoint records into an OpenAPI document.
//!
//! Records are grouped by raw path. Each group's path is cleaned once;
//! a group whose path cannot be cleaned is dropped as a whole. Within a
//! group, every record with a standard verb becomes one operation and a
//! later record for the same verb replaces an earlier one.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, info, warn};

use super::document::{
    ApiDocument, DocumentFormat, Operation, Parameter, ParameterLocation, RequestBody, Response,
};
use crate::endpoint::{standard_method, EndpointRecord};

static PATH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex"));

const BODY_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Strip extraction artifacts from a raw path.
///
/// Everything from the first quote on is dropped, then trailing commas,
/// quotes and whitespace. Returns `None` when nothing usable remains.
pub fn clean_path(raw: &str) -> Option<String> {
    let truncated = match raw.find(is_quote) {
        Some(index) => &raw[..index],
        None => raw,
    };
    let cleaned = truncated
        .trim_end_matches(|c: char| c == ',' || is_quote(c) || c.is_whitespace())
        .trim();

    if cleaned.is_empty() || cleaned.ends_with(is_quote) {
        return None;
    }
    Some(cleaned.to_string())
}

/// Names of `{name}` placeholders, in order of appearance.
pub fn extract_path_parameters(path: &str) -> Vec<String> {
    PATH_PLACEHOLDER
        .captures_iter(path)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Build a document for one repository.
///
/// `format` only records how the caller intends to serialize the result;
/// the document is the same for every format. Feed records in a fixed
/// order to get a reproducible winner for duplicate (path, verb) pairs.
pub fn assemble(records: &[EndpointRecord], repo_name: &str, format: DocumentFormat) -> ApiDocument {
    info!(
        repo = %repo_name,
        endpoints = records.len(),
        format = %format,
        "assembling API document"
    );
    let mut doc = ApiDocument::new(repo_name);

    let mut groups: IndexMap<&str, Vec<&EndpointRecord>> = IndexMap::new();
    for record in records {
        groups.entry(record.path.as_str()).or_default().push(record);
    }

    for (raw_path, group) in groups {
        let Some(path) = clean_path(raw_path) else {
            warn!(path = %raw_path, "skipping path that could not be cleaned");
            continue;
        };
        if path != raw_path {
            debug!(original = %raw_path, cleaned = %path, "cleaned path");
        }

        let url_params = extract_path_parameters(&path);
        let item = doc.paths.entry(path.clone()).or_default();

        for record in group {
            let Some(method) = standard_method(&record.method) else {
                continue;
            };
            let operation = build_operation(record, method, &path, &url_params);
            item.insert(method.to_ascii_lowercase(), operation);
        }
    }

    doc
}

fn build_operation(
    record: &EndpointRecord,
    method: &str,
    path: &str,
    url_params: &[String],
) -> Operation {
    let mut parameters: Vec<Parameter> = url_params
        .iter()
        .map(|name| Parameter::string(name.as_str(), ParameterLocation::Path))
        .collect();

    for name in &record.path_params {
        if !url_params.contains(name) {
            parameters.push(Parameter::string(name.as_str(), ParameterLocation::Path));
        }
    }

    parameters.extend(record.parameters.iter().cloned());

    let buckets = [
        (&record.query_params, ParameterLocation::Query),
        (&record.header_params, ParameterLocation::Header),
        (&record.cookie_params, ParameterLocation::Cookie),
    ];
    for (names, location) in buckets {
        parameters.extend(names.iter().map(|name| Parameter::string(name.as_str(), location)));
    }

    let request_body = (BODY_METHODS.contains(&method) || record.has_request_body)
        .then(RequestBody::json_object);

    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: "Successful operation".to_string(),
        },
    );

    Operation {
        summary: format!("{} {}", method, path),
        description: format!("Source: {}", record.file),
        parameters,
        responses,
        request_body,
    }
}
