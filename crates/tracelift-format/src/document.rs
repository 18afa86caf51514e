//! Trace document wrapper
//!
//! A [`TraceDocument`] owns the parsed JSON object of one trace file and
//! exposes the handful of structural accessors every tool needs: the version
//! tag, the workflow object, and the runtime-system descriptor in its several
//! historical spellings. Everything else stays raw JSON; migration steps
//! reshape the maps in place.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use tracing::debug;

use crate::error::DocumentError;
use crate::version::SchemaVersion;

/// Root key carrying the version tag.
pub const VERSION_FIELD: &str = "schemaVersion";

/// Root key carrying the workflow object.
pub const WORKFLOW_FIELD: &str = "workflow";

/// One trace file, parsed and owned.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceDocument {
    root: Map<String, Value>,
}

impl TraceDocument {
    /// Wrap a parsed JSON value.
    ///
    /// # Errors
    /// Returns [`DocumentError::NotAnObject`] when the root is not an object.
    pub fn new(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(DocumentError::NotAnObject),
        }
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    /// Returns error if the text is not JSON or its root is not an object.
    pub fn parse(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::new(value)
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    /// Returns error on IO failure or invalid content.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text =
            fs::read_to_string(path).map_err(|e| DocumentError::read_error(path, e))?;
        let doc = Self::parse(&text)?;
        debug!(path = %path.display(), "loaded trace document");
        Ok(doc)
    }

    /// Write the document back to disk, pretty-printed with 4-space indent.
    ///
    /// The file is only touched after the in-memory render succeeded.
    ///
    /// # Errors
    /// Returns error on render or IO failure.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let rendered = self.to_json_pretty()?;
        fs::write(path, rendered).map_err(|e| DocumentError::write_error(path, e))?;
        debug!(path = %path.display(), "wrote trace document");
        Ok(())
    }

    /// Render the document as pretty JSON with 4-space indentation.
    ///
    /// # Errors
    /// Returns error if rendering fails (rare for plain JSON values).
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        self.root
            .serialize(&mut serializer)
            .map_err(|e| DocumentError::Serialization(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| DocumentError::Serialization(e.to_string()))
    }

    /// Root object, borrowed.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Root object, mutable.
    #[inline]
    pub fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    /// Give the document back as a plain JSON value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Raw version tag, if present and a string.
    #[inline]
    #[must_use]
    pub fn version_tag(&self) -> Option<&str> {
        self.root.get(VERSION_FIELD).and_then(Value::as_str)
    }

    /// Parsed version tag.
    ///
    /// # Errors
    /// Returns [`DocumentError::MissingField`] when the tag is absent or not
    /// a string, and a version error when the tag is not a known version.
    pub fn version(&self) -> Result<SchemaVersion, DocumentError> {
        let tag = self
            .version_tag()
            .ok_or_else(|| DocumentError::missing(VERSION_FIELD))?;
        Ok(tag.parse()?)
    }

    /// Stamp a version tag, replacing any existing one in place.
    pub fn set_version(&mut self, version: SchemaVersion) {
        self.root.insert(
            VERSION_FIELD.to_string(),
            Value::String(version.as_str().to_string()),
        );
    }

    /// The workflow object.
    ///
    /// # Errors
    /// Returns error when the field is absent or not an object.
    pub fn workflow(&self) -> Result<&Map<String, Value>, DocumentError> {
        match self.root.get(WORKFLOW_FIELD) {
            Some(Value::Object(workflow)) => Ok(workflow),
            Some(_) => Err(DocumentError::unexpected_type(WORKFLOW_FIELD)),
            None => Err(DocumentError::missing(WORKFLOW_FIELD)),
        }
    }

    /// The workflow object, mutable.
    ///
    /// # Errors
    /// Returns error when the field is absent or not an object.
    pub fn workflow_mut(&mut self) -> Result<&mut Map<String, Value>, DocumentError> {
        match self.root.get_mut(WORKFLOW_FIELD) {
            Some(Value::Object(workflow)) => Ok(workflow),
            Some(_) => Err(DocumentError::unexpected_type(WORKFLOW_FIELD)),
            None => Err(DocumentError::missing(WORKFLOW_FIELD)),
        }
    }

    /// Name of the runtime system that produced the trace.
    ///
    /// Checks the current `runtimeSystem` spelling first, then the pre-1.5
    /// `wms` spelling. Either may be an object with a `name` string or a bare
    /// string. Returns `None` when the document names no producer.
    #[must_use]
    pub fn runtime_system_name(&self) -> Option<&str> {
        for key in ["runtimeSystem", "wms"] {
            match self.root.get(key) {
                Some(Value::Object(descriptor)) => {
                    if let Some(name) = descriptor.get("name").and_then(Value::as_str) {
                        return Some(name);
                    }
                }
                Some(Value::String(name)) => return Some(name),
                _ => {}
            }
        }
        None
    }
}
