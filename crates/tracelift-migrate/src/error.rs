//! Error types for the migration pipeline
//!
//! Steps raise on missing required structure instead of guessing defaults.

use tracelift_format::DocumentError;

/// Errors raised while walking a document up the version ladder
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Structural problem in the document
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Legacy byte volumes present but the document names no producing tool
    #[error("cannot scale byte volumes for task '{task}': document names no runtime system")]
    UnknownByteUnits {
        /// Task carrying the legacy fields
        task: String,
    },
}

impl MigrateError {
    /// Create missing-field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Document(DocumentError::missing(field))
    }

    /// Create unexpected-type error
    pub fn unexpected_type(field: impl Into<String>) -> Self {
        Self::Document(DocumentError::unexpected_type(field))
    }
}

/// Result type alias for migration operations
pub type MigrateResult<T> = Result<T, MigrateError>;
