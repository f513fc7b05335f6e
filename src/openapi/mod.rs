//! OpenAPI document model, assembly from endpoint records, and discovery
//! of description files already present in a repository.

pub mod assemble;
pub mod discovery;
pub mod document;

pub use assemble::{assemble, clean_path, extract_path_parameters};
pub use discovery::{
    find_api_documents, save_discovered, validate_api_document, validate_api_file,
    DiscoveredDocument, ValidatedDocument,
};
pub use document::{
    save_document, ApiDocument, DocumentFormat, Info, MediaType, Operation, Parameter,
    ParameterLocation, PathItem, RequestBody, Response,
};
