//! Error types for schema loading and validation
//!
//! A malformed document (no workflow, no task list) is an error here; a
//! dangling reference inside a well-formed document is a violation carried
//! by the reports instead.

use std::path::PathBuf;

use tracelift_format::DocumentError;

/// Errors from schema resolution and document validation
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// IO error reading a schema file
    #[error("io error reading schema {}: {source}", .path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Published schema could not be fetched
    #[error("failed to fetch schema from {url}: {source}")]
    SchemaFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Schema bytes are not valid JSON
    #[error("schema is not valid json: {0}")]
    SchemaJson(#[from] serde_json::Error),

    /// Schema was rejected by the validator backend
    #[error("schema does not compile: {0}")]
    SchemaCompile(String),

    /// Running executable could not be located for the conventional lookup
    #[error("cannot locate the running executable: {0}")]
    ExecutablePath(#[source] std::io::Error),

    /// Structural problem in the document under validation
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ValidateError {
    /// Create schema read error for path
    pub(crate) fn schema_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SchemaRead {
            path: path.into(),
            source,
        }
    }

    /// Create missing-field error for a structurally lacking document
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::Document(DocumentError::missing(field))
    }
}

/// Convenience alias for validation results
pub type ValidateResult<T> = Result<T, ValidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display() {
        let err = ValidateError::missing("workflow.specification.tasks");
        assert_eq!(
            err.to_string(),
            "missing required field: workflow.specification.tasks"
        );
    }

    #[test]
    fn document_error_converts() {
        let err: ValidateError = DocumentError::NotAnObject.into();
        assert!(matches!(err, ValidateError::Document(_)));
    }
}
