//! Scanner configuration, loaded from TOML.
//!
//! ```toml
//! [scan]
//! languages = ["python", "java"]
//! exclude_dirs = [".git", "node_modules", "build"]
//!
//! [output]
//! format = "csv"
//! file = "endpoints.csv"
//!
//! [openapi]
//! find_existing = true
//! generate_if_none = true
//! output_dir = "openapi-docs"
//! output_format = "yaml"
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FinderError, Result};
use crate::openapi::DocumentFormat;
use crate::parser::Language;
use crate::report::ReportFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub openapi: OpenApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Registry identifiers of the languages to scan.
    pub languages: Vec<String>,
    /// Directory names skipped anywhere in the tree.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            languages: Language::ALL.iter().map(|l| l.id().to_string()).collect(),
            exclude_dirs: [".git", "node_modules", "venv", ".venv", "__pycache__"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    /// Report destination; stdout when unset.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenApiConfig {
    /// Look for API description files already in each repository.
    pub find_existing: bool,
    /// Write an assembled document for repositories that have none.
    pub generate_if_none: bool,
    pub output_dir: PathBuf,
    pub output_format: DocumentFormat,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            find_existing: true,
            generate_if_none: true,
            output_dir: PathBuf::from("openapi-docs"),
            output_format: DocumentFormat::Json,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub languages: Option<Vec<String>>,
    pub output_format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub find_existing: Option<bool>,
    pub generate_if_none: Option<bool>,
    pub openapi_dir: Option<PathBuf>,
    pub openapi_format: Option<DocumentFormat>,
}

impl FinderConfig {
    /// Load a config file. Missing keys take their defaults; a missing or
    /// malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FinderError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: FinderConfig = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reject language identifiers no parser handles.
    pub fn validate(&self) -> Result<()> {
        for language in &self.scan.languages {
            if Language::from_id(language).is_none() {
                return Err(FinderError::UnsupportedLanguage(language.clone()));
            }
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(languages) = overrides.languages {
            self.scan.languages = languages;
        }
        if let Some(format) = overrides.output_format {
            self.output.format = format;
        }
        if overrides.output_file.is_some() {
            self.output.file = overrides.output_file;
        }
        if let Some(find) = overrides.find_existing {
            self.openapi.find_existing = find;
        }
        if let Some(generate) = overrides.generate_if_none {
            self.openapi.generate_if_none = generate;
        }
        if let Some(dir) = overrides.openapi_dir {
            self.openapi.output_dir = dir;
        }
        if let Some(format) = overrides.openapi_format {
            self.openapi.output_format = format;
        }
    }

    /// Languages selected for scanning.
    pub fn languages(&self) -> Vec<Language> {
        self.scan
            .languages
            .iter()
            .filter_map(|id| Language::from_id(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FinderConfig::default();
        assert_eq!(config.languages(), Language::ALL.to_vec());
        assert!(config.scan.exclude_dirs.contains(&"node_modules".to_string()));
        assert_eq!(config.output.format, ReportFormat::Text);
        assert!(config.openapi.find_existing);
        assert_eq!(config.openapi.output_dir, PathBuf::from("openapi-docs"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[scan]\nlanguages = [\"java\"]\n\n[openapi]\noutput_format = \"yaml\"\n"
        )
        .unwrap();

        let config = FinderConfig::load(file.path()).unwrap();
        assert_eq!(config.languages(), vec![Language::Java]);
        assert_eq!(config.openapi.output_format, DocumentFormat::Yaml);
        assert!(config.openapi.generate_if_none);
        assert_eq!(config.scan.exclude_dirs, ScanConfig::default().exclude_dirs);
    }

    #[test]
    fn test_load_errors() {
        assert!(FinderConfig::load(Path::new("/nonexistent/finder.toml")).is_err());

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "[scan\nlanguages = 3").unwrap();
        assert!(matches!(FinderConfig::load(bad.path()), Err(FinderError::Toml(_))));

        let mut unknown = tempfile::NamedTempFile::new().unwrap();
        writeln!(unknown, "[scan]\nlanguages = [\"cobol\"]").unwrap();
        assert!(matches!(
            FinderConfig::load(unknown.path()),
            Err(FinderError::UnsupportedLanguage(l)) if l == "cobol"
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = FinderConfig::default();
        config.apply_overrides(ConfigOverrides {
            languages: Some(vec!["python".into()]),
            output_format: Some(ReportFormat::Json),
            find_existing: Some(false),
            ..Default::default()
        });
        assert_eq!(config.languages(), vec![Language::Python]);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(!config.openapi.find_existing);
        assert!(config.openapi.generate_if_none);
        assert!(config.output.file.is_none());
    }
}
