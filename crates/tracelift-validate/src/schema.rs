//! Schema validation and schema resolution
//!
//! Wraps a compiled JSON Schema (Draft 4, matching the schema documents in
//! the wild) and renders its errors into stable, diffable reports: one
//! violation per schema error, instance path segments joined with `" > "`,
//! sorted by rendered form.
//!
//! Schema resolution follows a three-stop chain: an explicit file wins,
//! then a conventional `tracelift-schema.json` next to the executable, then
//! the published copy fetched over HTTPS.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::paths::{JSONPointer, PathChunk};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

use crate::error::{ValidateError, ValidateResult};

/// Conventional schema file name looked up next to the executable
pub const SCHEMA_FILE_NAME: &str = "tracelift-schema.json";

/// Published schema used when no local copy exists
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/example/tracelift/master/tracelift-schema.json";

/// Where the schema document comes from
#[derive(Debug, Clone, Default)]
pub enum SchemaSource {
    /// Schema file named explicitly by the caller
    File(PathBuf),
    /// Conventional local copy, falling back to the published schema
    #[default]
    Auto,
}

impl SchemaSource {
    /// Load the schema document this source points at.
    ///
    /// # Errors
    /// Returns error when the file cannot be read, the fetch fails, or the
    /// bytes are not valid JSON.
    pub fn load(&self) -> ValidateResult<Value> {
        match self {
            Self::File(path) => read_schema(path),
            Self::Auto => {
                let exe = std::env::current_exe().map_err(ValidateError::ExecutablePath)?;
                let local = exe.with_file_name(SCHEMA_FILE_NAME);
                if local.exists() {
                    debug!(path = %local.display(), "using schema found next to the executable");
                    read_schema(&local)
                } else {
                    debug!(url = SCHEMA_URL, "fetching published schema");
                    fetch_schema(SCHEMA_URL)
                }
            }
        }
    }
}

fn read_schema(path: &Path) -> ValidateResult<Value> {
    let text =
        std::fs::read_to_string(path).map_err(|source| ValidateError::schema_read(path, source))?;
    Ok(serde_json::from_str(&text)?)
}

fn fetch_schema(url: &str) -> ValidateResult<Value> {
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| ValidateError::SchemaFetch {
            url: url.to_string(),
            source,
        })?;
    response.json().map_err(|source| ValidateError::SchemaFetch {
        url: url.to_string(),
        source,
    })
}

/// One schema error at one location in the instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxViolation {
    /// Instance path segments joined with `" > "`; empty at the root
    pub path: String,
    /// The schema error message
    pub message: String,
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result of validating one instance against the schema
#[derive(Debug, Default)]
pub struct SyntaxReport {
    violations: Vec<SyntaxViolation>,
}

impl SyntaxReport {
    /// Whether the instance conforms to the schema
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every violation, sorted by rendered form
    #[must_use]
    pub fn violations(&self) -> &[SyntaxViolation] {
        &self.violations
    }
}

/// A compiled Draft 4 schema ready to validate instances.
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl SchemaValidator {
    /// Compile the schema document.
    ///
    /// # Errors
    /// Returns error when the document is not a usable Draft 4 schema.
    pub fn compile(schema: &Value) -> ValidateResult<Self> {
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft4)
            .compile(schema)
            .map_err(|e| ValidateError::SchemaCompile(e.to_string()))?;
        Ok(Self { schema })
    }

    /// Validate one instance, collecting every schema error.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> SyntaxReport {
        let mut violations = Vec::new();
        if let Err(errors) = self.schema.validate(instance) {
            for error in errors {
                violations.push(SyntaxViolation {
                    path: render_path(&error.instance_path),
                    message: error.to_string(),
                });
            }
        }
        violations.sort_by_cached_key(ToString::to_string);
        SyntaxReport { violations }
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

fn render_path(pointer: &JSONPointer) -> String {
    let segments: Vec<String> = pointer
        .iter()
        .map(|chunk| match chunk {
            PathChunk::Property(name) => name.to_string(),
            PathChunk::Index(index) => index.to_string(),
            PathChunk::Keyword(keyword) => (*keyword).to_string(),
        })
        .collect();
    segments.join(" > ")
}
