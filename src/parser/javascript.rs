//! JavaScript/TypeScript endpoint parser (Express.js).

use tracing::{debug, warn};
use tree_sitter::Language as Grammar;

use super::patterns::javascript::extract_express_patterns;
use super::queries::{javascript::extract_express_endpoints, parse_tree};
use super::{Language, Parser};
use crate::endpoint::EndpointRecord;
use crate::error::Result;

/// Structural extraction with the JavaScript grammar, then the TypeScript
/// grammar; the text patterns replace both when neither parses the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaScriptParser;

impl JavaScriptParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_with(
        &self,
        grammar: &Grammar,
        language: &'static str,
        content: &str,
        path: &str,
    ) -> Result<Vec<EndpointRecord>> {
        let tree = parse_tree(grammar, language, content, path)?;
        Ok(extract_express_endpoints(
            tree.root_node(),
            content.as_bytes(),
            path,
        ))
    }

    /// Grammar used when the JavaScript grammar rejects a file.
    fn typescript_grammar(path: &str) -> (Grammar, &'static str) {
        if path.to_ascii_lowercase().ends_with(".tsx") {
            (tree_sitter_typescript::LANGUAGE_TSX.into(), "TSX")
        } else {
            (tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "TypeScript")
        }
    }
}

impl Parser for JavaScriptParser {
    fn parse(&self, content: &str, path: &str) -> Vec<EndpointRecord> {
        let javascript = Language::JavaScript.grammar();
        let first = match self.parse_with(&javascript, Language::JavaScript.name(), content, path) {
            Ok(endpoints) => return endpoints,
            Err(e) => e,
        };
        debug!(file = %path, error = %first, "retrying with TypeScript grammar");

        let (grammar, language) = Self::typescript_grammar(path);
        match self.parse_with(&grammar, language, content, path) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(file = %path, error = %e, "structural parse failed, using text patterns");
                extract_express_patterns(content, path)
            }
        }
    }
}
