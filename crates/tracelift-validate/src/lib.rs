//! Validation for workflow trace documents
//!
//! Two independent passes over a trace document:
//!
//! # Core Concepts
//!
//! - **Schema validation**: the document's shape, checked against a Draft 4
//!   JSON Schema resolved from a file, a conventional local copy, or the
//!   published schema
//! - **Semantic validation**: the document's cross-references, checked by
//!   resolving every machine and parent reference against the declarations
//!   in the same document
//!
//! Both passes collect every problem they find instead of stopping at the
//! first, and both run on documents at any schema version.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! use tracelift_format::TraceDocument;
//! use tracelift_validate::{check_document, SchemaSource, SchemaValidator};
//!
//! let doc = TraceDocument::load(Path::new("trace.json"))?;
//! let validator = SchemaValidator::compile(&SchemaSource::Auto.load()?)?;
//!
//! let syntax = validator.validate(&doc.clone().into_value());
//! let semantics = check_document(&doc)?;
//! assert!(syntax.is_valid() && semantics.is_valid());
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod schema;
pub mod semantic;

pub use error::{ValidateError, ValidateResult};
pub use schema::{
    SchemaSource, SchemaValidator, SyntaxReport, SyntaxViolation, SCHEMA_FILE_NAME, SCHEMA_URL,
};
pub use semantic::{check_document, SemanticReport, Violation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
