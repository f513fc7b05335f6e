//! Scan reports in text, CSV or JSON.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FinderError, Result};
use crate::scanner::{RepositoryOutcome, ScanResults};

const CSV_HEADER: [&str; 8] = [
    "Repository",
    "Path",
    "Method",
    "Framework",
    "File",
    "Line",
    "Function",
    "Description",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Text => "text",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(FinderError::Config(format!(
                "unknown report format '{}' (expected text, csv or json)",
                other
            ))),
        }
    }
}

/// Render scan results in the requested format.
pub fn render(results: &ScanResults, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(results)),
        ReportFormat::Csv => Ok(render_csv(results)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    }
}

/// Print a rendered report, or write it to `output_file`.
pub fn write(report: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, report)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", report),
    }
    Ok(())
}

fn render_text(results: &ScanResults) -> String {
    TextReport(results).to_string()
}

/// Human-readable layout of a scan.
struct TextReport<'a>(&'a ScanResults);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.0;
        let rule = "=".repeat(80);

        writeln!(f, "{rule}\nENDPOINT FINDER SCAN RESULTS\n{rule}\n")?;
        writeln!(f, "Total repositories scanned: {}", results.total_repositories)?;
        writeln!(f, "Total endpoints found: {}\n", results.total_endpoints)?;

        writeln!(f, "Language Statistics:\n{}", "-".repeat(40))?;
        for (language, stats) in &results.languages {
            writeln!(f, "  {}:", language)?;
            writeln!(f, "    Files scanned: {}", stats.files_scanned)?;
            writeln!(f, "    Endpoints found: {}", stats.endpoints_found)?;
        }
        writeln!(f)?;

        for (index, repo) in results.repositories.iter().enumerate() {
            writeln!(f, "Repository {}: {}\n{}", index + 1, repo.repository(), "-".repeat(80))?;
            let scan = match repo {
                RepositoryOutcome::Failed { error, .. } => {
                    writeln!(f, "Error: {}\n", error)?;
                    continue;
                }
                RepositoryOutcome::Scanned(scan) => scan,
            };

            writeln!(f, "Endpoints found: {}\n", scan.endpoint_count)?;
            if !scan.endpoints.is_empty() {
                writeln!(f, "Endpoints:")?;
                for (i, e) in scan.endpoints.iter().enumerate() {
                    writeln!(f, "  {}. {} {}", i + 1, e.method, e.path)?;
                    writeln!(f, "     Framework: {}", e.framework)?;
                    writeln!(f, "     File: {}:{}", e.file, e.line)?;
                    writeln!(f, "     Function: {}", e.function)?;
                    if !e.description.is_empty() {
                        writeln!(f, "     Description: {}", e.description)?;
                    }
                    writeln!(f)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn render_csv(results: &ScanResults) -> String {
    let mut out = String::new();
    push_csv_row(&mut out, CSV_HEADER.iter().map(|s| s.to_string()));

    for repo in &results.repositories {
        match repo {
            RepositoryOutcome::Failed { repository, error } => {
                push_csv_row(
                    &mut out,
                    [repository.as_str(), "ERROR", "", "", "", "", "", error.as_str()]
                        .into_iter()
                        .map(str::to_string),
                );
            }
            RepositoryOutcome::Scanned(scan) => {
                for e in &scan.endpoints {
                    push_csv_row(
                        &mut out,
                        [
                            scan.repository.clone(),
                            e.path.clone(),
                            e.method.clone(),
                            e.framework.clone(),
                            e.file.clone(),
                            e.line.to_string(),
                            e.function.clone(),
                            e.description.clone(),
                        ],
                    );
                }
            }
        }
    }
    out
}

fn push_csv_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let row: Vec<String> = fields.into_iter().map(|f| csv_field(&f)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
