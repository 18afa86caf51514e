//! Error types for the document model
//!
//! Covers the two edges every tool shares:
//! - Load operations (file → [`TraceDocument`])
//! - Save operations ([`TraceDocument`] → file)
//! plus structural access inside a loaded document.
//!
//! [`TraceDocument`]: crate::document::TraceDocument

use std::path::PathBuf;

/// Errors from version tag handling
#[derive(Debug, Clone, thiserror::Error)]
pub enum VersionError {
    /// Tag is not in the known ladder
    #[error("unknown schema version: '{0}'")]
    Unknown(String),
}

/// Errors while loading, inspecting or writing a trace document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// IO error during file read
    #[error("io error reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during file write
    #[error("io error writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Serialization logic failed
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Document root is not a JSON object
    #[error("document root is not an object")]
    NotAnObject,

    /// A field the format requires is absent
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field exists but carries the wrong JSON type
    #[error("field has unexpected type: {0}")]
    UnexpectedType(String),

    /// Version tag problem
    #[error(transparent)]
    Version(#[from] VersionError),
}

impl DocumentError {
    /// Create read error for path
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create missing-field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create unexpected-type error
    pub fn unexpected_type(field: impl Into<String>) -> Self {
        Self::UnexpectedType(field.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_error_display() {
        let err = VersionError::Unknown("2.0".to_string());
        assert_eq!(err.to_string(), "unknown schema version: '2.0'");
    }

    #[test]
    fn missing_field_display() {
        let err = DocumentError::missing("workflow");
        assert_eq!(err.to_string(), "missing required field: workflow");
    }

    #[test]
    fn version_error_converts() {
        let err: DocumentError = VersionError::Unknown("9.9".to_string()).into();
        assert!(matches!(err, DocumentError::Version(_)));
    }
}
