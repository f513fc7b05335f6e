//! # endpoint-finder
//!
//! Finds HTTP API endpoints in source code and assembles them into an
//! OpenAPI 3.0 document.
//!
//! ## Key Features
//!
//! - **Two strategies**: tree-sitter extraction, with line patterns as fallback
//! - **Multi-framework**: Flask, FastAPI, Django, Express.js, Spring
//! - **Parameter-aware**: Spring path/query/header/cookie/body annotations
//! - **Discovery**: picks up Swagger/OpenAPI files already in a repository
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use endpoint_finder::{assemble, DocumentFormat, ParserRegistry};
//!
//! let registry = ParserRegistry::with_defaults();
//! let parser = registry.get_parser("python").unwrap();
//!
//! let source = "@app.route('/users', methods=['GET', 'POST'])\ndef users():\n    pass\n";
//! let endpoints = parser.parse(source, "app.py");
//!
//! let doc = assemble(&endpoints, "my-service", DocumentFormat::Json);
//! println!("{}", doc.render(DocumentFormat::Json).unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod openapi;
pub mod parser;
pub mod report;
pub mod scanner;

// Re-exports for convenience
pub use config::FinderConfig;
pub use endpoint::{EndpointRecord, MOUNT_METHOD, STANDARD_METHODS};
pub use error::{FinderError, Result};

pub use openapi::{
    assemble, clean_path, extract_path_parameters, find_api_documents, validate_api_document,
    validate_api_file, ApiDocument, DocumentFormat, ValidatedDocument,
};
pub use parser::{
    join_paths, JavaParser, JavaScriptParser, Language, Parser, ParserRegistry, PythonParser,
};
pub use report::ReportFormat;
pub use scanner::{scan_repositories, scan_repository, RepositoryScan, ScanResults};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_invariant_across_parsers() {
        let registry = ParserRegistry::with_defaults();
        let inputs = [
            (
                "python",
                "app.py",
                "@app.route('/a', methods=['get', 'Put'])\ndef a():\n    pass\n\nurlpatterns = [path('b/', views.b)]\n",
            ),
            (
                "javascript",
                "app.js",
                "app.all('/c', h);\napp.use('/d', r);\napp.options('/e', h);\n",
            ),
            (
                "java",
                "C.java",
                "@RestController\nclass C {\n    @RequestMapping(value = \"/f\", method = RequestMethod.HEAD)\n    void f() {}\n}\n",
            ),
        ];

        for (language, path, source) in inputs {
            let parser = registry.get_parser(language).unwrap();
            let endpoints = parser.parse(source, path);
            assert!(!endpoints.is_empty(), "{language} found nothing");
            for e in endpoints {
                assert!(!e.path.is_empty());
                assert!(
                    e.method.is_empty()
                        || e.method == MOUNT_METHOD
                        || STANDARD_METHODS.contains(&e.method.as_str()),
                    "unexpected method {:?}",
                    e.method
                );
            }
        }
    }

    #[test]
    fn test_empty_and_garbage_sources() {
        let registry = ParserRegistry::with_defaults();
        for language in registry.languages() {
            let parser = registry.get_parser(&language).unwrap();
            assert!(parser.parse("", "empty").is_empty());
            assert!(parser.parse("}}}{{{ ((( \u{0}", "garbage").is_empty());
        }
    }

    #[test]
    fn test_unicode_source() {
        let source = "# -*- coding: utf-8 -*-\n\n@app.get('/café/{id}')\nasync def café(id: int):\n    \"\"\"Récupère un café.\"\"\"\n    return {}\n";
        let endpoints = PythonParser::new().parse(source, "cafe.py");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/café/{id}");
        assert_eq!(endpoints[0].function, "café");
        assert_eq!(endpoints[0].description, "Récupère un café.");
    }

    #[test]
    fn test_tsx_component_file() {
        let source = r#"
import express from 'express';
const app = express();
const render = () => <div className="home">Home</div>;
app.get('/home', (req, res) => res.send(render()));
"#;
        let endpoints = JavaScriptParser::new().parse(source, "server.tsx");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/home");
        assert_eq!(endpoints[0].line, 5);
    }
}
