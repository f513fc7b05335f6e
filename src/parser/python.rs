//! Python endpoint parser (Flask, FastAPI, Django).

use tracing::{debug, warn};

use super::patterns::python::extract_python_patterns;
use super::queries::{parse_tree, python::extract_python_endpoints};
use super::{Language, Parser};
use crate::endpoint::EndpointRecord;
use crate::error::Result;

/// Structural extraction first; the text patterns run whenever that
/// leaves nothing, whether or not the parse succeeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_structural(&self, content: &str, path: &str) -> Result<Vec<EndpointRecord>> {
        let grammar = Language::Python.grammar();
        let tree = parse_tree(&grammar, Language::Python.name(), content, path)?;
        Ok(extract_python_endpoints(
            tree.root_node(),
            content.as_bytes(),
            path,
        ))
    }
}

impl Parser for PythonParser {
    fn parse(&self, content: &str, path: &str) -> Vec<EndpointRecord> {
        let mut endpoints = match self.parse_structural(content, path) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(file = %path, error = %e, "structural parse failed");
                Vec::new()
            }
        };

        if endpoints.is_empty() {
            debug!(file = %path, "no structural matches, trying text patterns");
            endpoints.extend(extract_python_patterns(content, path));
        }
        endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_with_two_methods() {
        let source = r#"
from flask import Flask

app = Flask(__name__)

@app.route('/api/users', methods=['GET','POST'])
def list_users():
    return []
"#;
        let endpoints = PythonParser::new().parse(source, "app.py");
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].path, "/api/users");
        assert_eq!(endpoints[0].method, "GET");
        assert_eq!(endpoints[0].function, "list_users");
        assert_eq!(endpoints[1].method, "POST");
        assert_eq!(endpoints[1].function, "list_users");
    }

    #[test]
    fn test_syntax_error_falls_back_to_patterns() {
        let source = "@app.route('/broken')\ndef broken(:\n    pass\n";
        let endpoints = PythonParser::new().parse(source, "app.py");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/broken");
        assert_eq!(endpoints[0].function, "unknown");
        assert_eq!(endpoints[0].line, 1);
    }

    #[test]
    fn test_clean_parse_without_matches_still_tries_patterns() {
        // Dynamic path: invisible to the structural pass, visible to the
        // line pattern inside the string.
        let source = "ROUTES = \"@app.route('/hidden')\"\n";
        let endpoints = PythonParser::new().parse(source, "conf.py");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/hidden");
    }

    #[test]
    fn test_structural_hit_skips_patterns() {
        let source = "@app.get('/a')\ndef a():\n    pass\n\nNOTE = \"@app.route('/b')\"\n";
        let endpoints = PythonParser::new().parse(source, "main.py");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/a");
        assert_eq!(endpoints[0].framework, "FastAPI");
    }

    #[test]
    fn test_empty_file() {
        assert!(PythonParser::new().parse("", "empty.py").is_empty());
    }
}
