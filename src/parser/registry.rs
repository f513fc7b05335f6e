//! Language identifier → parser lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::{JavaParser, JavaScriptParser, Language, Parser, PythonParser};

/// Maps a language identifier (case-insensitive) to its parser.
///
/// Parsers are shared behind `Arc`, so a registry can be handed to
/// worker threads and the same parser used for many files at once.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn Parser>>,
}

impl ParserRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the Python, JavaScript and Java parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_parser(Language::Python.id(), Arc::new(PythonParser::new()));
        registry.register_parser(Language::JavaScript.id(), Arc::new(JavaScriptParser::new()));
        registry.register_parser(Language::Java.id(), Arc::new(JavaParser::new()));
        registry
    }

    /// Look up the parser for a language, or `None` if none is registered.
    pub fn get_parser(&self, language: &str) -> Option<Arc<dyn Parser>> {
        let parser = self.parsers.get(&language.to_ascii_lowercase()).cloned();
        if parser.is_none() {
            warn!(language = %language, "no parser registered");
        }
        parser
    }

    /// Add or replace the parser for a language.
    pub fn register_parser(&mut self, language: &str, parser: Arc<dyn Parser>) {
        info!(language = %language, "registered parser");
        self.parsers.insert(language.to_ascii_lowercase(), parser);
    }

    /// Registered identifiers, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.parsers.keys().cloned().collect();
        languages.sort();
        languages
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointRecord;

    struct FixedParser;

    impl Parser for FixedParser {
        fn parse(&self, _content: &str, path: &str) -> Vec<EndpointRecord> {
            vec![EndpointRecord::new("/fixed", "GET", "Test", path, 1, "fixed")]
        }
    }

    #[test]
    fn test_defaults() {
        let registry = ParserRegistry::with_defaults();
        assert_eq!(registry.languages(), vec!["java", "javascript", "python"]);
        assert!(registry.get_parser("Python").is_some());
        assert!(registry.get_parser("ruby").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ParserRegistry::with_defaults();
        registry.register_parser("python", Arc::new(FixedParser));
        let parser = registry.get_parser("python").unwrap();
        let endpoints = parser.parse("", "x.py");
        assert_eq!(endpoints[0].path, "/fixed");
        assert_eq!(registry.languages().len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ParserRegistry::new();
        assert!(registry.languages().is_empty());
        assert!(registry.get_parser("java").is_none());
    }
}
