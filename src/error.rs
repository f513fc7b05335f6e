//! Error types for endpoint-finder.
//!
//! Structural extractors report `Grammar` and `Syntax` failures; the language
//! parsers turn those into a text-pattern fallback, so neither ever reaches a
//! caller of [`Parser::parse`](crate::parser::Parser::parse).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The tree-sitter grammar could not be loaded.
    #[error("{language} grammar unavailable: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },

    /// The parse tree contains error or missing nodes.
    #[error("syntax error in {path} ({language})")]
    Syntax {
        path: String,
        language: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FinderError>;
