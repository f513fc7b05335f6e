//! Endpoint parsers.
//!
//! Each language parser runs a structural extractor (`queries`) over a
//! tree-sitter parse and, according to its own fallback policy, the
//! line-oriented text-pattern extractor (`patterns`).

pub mod java;
pub mod javascript;
pub mod language;
pub mod paths;
pub mod patterns;
pub mod python;
pub mod queries;
pub mod registry;

pub use java::JavaParser;
pub use javascript::JavaScriptParser;
pub use language::Language;
pub use paths::join_paths;
pub use python::PythonParser;
pub use registry::ParserRegistry;

use crate::endpoint::EndpointRecord;

/// The capability every language parser provides.
///
/// Implementations never fail: a strategy that cannot handle the input
/// contributes no records and the other strategy gets its chance. They
/// hold no state between calls.
pub trait Parser: Send + Sync {
    /// Extract endpoint records from one file, in source order.
    fn parse(&self, content: &str, path: &str) -> Vec<EndpointRecord>;
}
