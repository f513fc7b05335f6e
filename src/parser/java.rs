//! Java endpoint parser (Spring MVC / Spring Boot).

use tracing::{debug, warn};

use super::patterns::java::extract_spring_patterns;
use super::queries::{java::extract_spring_endpoints, parse_tree};
use super::{Language, Parser};
use crate::endpoint::EndpointRecord;
use crate::error::Result;

/// Structural extraction, replaced by the text patterns only when the
/// parse itself fails. A clean parse with no controller returns nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaParser;

impl JavaParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_structural(&self, content: &str, path: &str) -> Result<Vec<EndpointRecord>> {
        let grammar = Language::Java.grammar();
        let tree = parse_tree(&grammar, Language::Java.name(), content, path)?;
        Ok(extract_spring_endpoints(
            tree.root_node(),
            content.as_bytes(),
            path,
        ))
    }
}

impl Parser for JavaParser {
    fn parse(&self, content: &str, path: &str) -> Vec<EndpointRecord> {
        match self.parse_structural(content, path) {
            Ok(endpoints) => {
                if endpoints.is_empty() {
                    debug!(file = %path, "no controller mappings");
                }
                endpoints
            }
            Err(e) => {
                warn!(file = %path, error = %e, "structural parse failed, using text patterns");
                extract_spring_patterns(content, path)
            }
        }
    }
}
