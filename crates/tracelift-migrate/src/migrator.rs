//! Migration orchestrator
//!
//! Reads a document's version tag, walks the version ladder forward one step
//! at a time (never skipping, never going backward), then runs cleanup. The
//! unsupported-version case is the one recoverable condition: the document is
//! handed back untouched so a directory-wide batch keeps going.

use serde_json::Value;
use tracing::debug;

use tracelift_format::document::VERSION_FIELD;
use tracelift_format::{SchemaVersion, TraceDocument};

use crate::cleanup::cleanup;
use crate::error::{MigrateError, MigrateResult};
use crate::step::{ladder, MigrationStep};

/// Outcome of one document's walk up the ladder.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// Document was behind and has been brought to the latest version.
    Migrated {
        /// The migrated document
        document: TraceDocument,
        /// Version the document declared before migration
        from: SchemaVersion,
    },
    /// Document already carried the latest version; only cleanup ran.
    UpToDate {
        /// The cleaned document
        document: TraceDocument,
    },
    /// Version tag outside the supported set; document untouched.
    Skipped {
        /// The document, exactly as it came in
        document: TraceDocument,
        /// The unsupported tag, rendered
        version: String,
    },
}

impl MigrationOutcome {
    /// Borrow the carried document.
    #[must_use]
    pub fn document(&self) -> &TraceDocument {
        match self {
            Self::Migrated { document, .. }
            | Self::UpToDate { document }
            | Self::Skipped { document, .. } => document,
        }
    }

    /// Take the carried document.
    #[must_use]
    pub fn into_document(self) -> TraceDocument {
        match self {
            Self::Migrated { document, .. }
            | Self::UpToDate { document }
            | Self::Skipped { document, .. } => document,
        }
    }

    /// Whether the document was left untouched.
    #[inline]
    #[must_use]
    pub fn was_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Walks documents up the version ladder.
///
/// Steps are pure document-to-document functions; the migrator keeps no
/// state between documents, so one instance can serve a whole batch.
#[derive(Debug)]
pub struct Migrator {
    steps: Vec<Box<dyn MigrationStep>>,
}

impl Migrator {
    /// Create a migrator with the standard ladder.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: ladder() }
    }

    /// Create a migrator with a custom step sequence.
    #[must_use]
    pub fn with_steps(steps: Vec<Box<dyn MigrationStep>>) -> Self {
        Self { steps }
    }

    /// Migrate one document to the latest version.
    ///
    /// An unsupported version tag is not an error: the document comes back
    /// in [`MigrationOutcome::Skipped`] exactly as it went in. A document
    /// already at the latest version still gets the cleanup pass.
    ///
    /// # Errors
    /// Returns error when the version tag is absent, or when a step finds
    /// the document structurally lacking.
    pub fn migrate(&self, doc: TraceDocument) -> MigrateResult<MigrationOutcome> {
        let tag = match doc.root().get(VERSION_FIELD).cloned() {
            Some(Value::String(tag)) => tag,
            Some(other) => other.to_string(),
            None => return Err(MigrateError::missing(VERSION_FIELD)),
        };
        let from = match tag.parse::<SchemaVersion>() {
            Ok(version) => version,
            Err(_) => {
                debug!(version = %tag, "document version is unsupported");
                return Ok(MigrationOutcome::Skipped {
                    document: doc,
                    version: tag,
                });
            }
        };

        let mut current = from;
        let mut doc = doc;
        for step in &self.steps {
            if step.source_versions().contains(&current) {
                debug!(
                    step = step.name(),
                    from = %current,
                    to = %step.target(),
                    "applying migration step"
                );
                doc = step.apply(doc)?;
                current = step.target();
            }
        }

        let document = cleanup(doc)?;
        if from.is_latest() {
            Ok(MigrationOutcome::UpToDate { document })
        } else {
            Ok(MigrationOutcome::Migrated { document, from })
        }
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::steps::ContainerRename;

    #[test]
    fn custom_ladders_stop_at_their_last_step() {
        let doc = TraceDocument::new(json!({
            "schemaVersion": "1.2",
            "workflow": {"jobs": [{"name": "a_ID0000001", "id": "ID0000001"}]}
        }))
        .unwrap();

        let migrator = Migrator::with_steps(vec![Box::new(ContainerRename::new())]);
        let outcome = migrator.migrate(doc).unwrap();

        assert!(matches!(
            &outcome,
            MigrationOutcome::Migrated { from: SchemaVersion::V1_2, .. }
        ));
        assert_eq!(outcome.document().version().unwrap(), SchemaVersion::V1_3);

        let document = outcome.into_document();
        let workflow = document.workflow().unwrap();
        assert!(workflow.contains_key("tasks"));
        assert!(!workflow.contains_key("jobs"));
    }

    #[test]
    fn skips_future_versions_untouched() {
        let original = json!({
            "schemaVersion": "2.0",
            "workflow": {"whatever": true}
        });
        let doc = TraceDocument::new(original.clone()).unwrap();

        let outcome = Migrator::new().migrate(doc).unwrap();
        match outcome {
            MigrationOutcome::Skipped { document, version } => {
                assert_eq!(version, "2.0");
                assert_eq!(document.into_value(), original);
            }
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn skips_non_string_version_tags() {
        let doc = TraceDocument::new(json!({
            "schemaVersion": 1.5,
            "workflow": {}
        }))
        .unwrap();

        let outcome = Migrator::new().migrate(doc).unwrap();
        assert!(outcome.was_skipped());
    }

    #[test]
    fn missing_version_tag_is_fatal() {
        let doc = TraceDocument::new(json!({"workflow": {}})).unwrap();
        let err = Migrator::new().migrate(doc).unwrap_err();
        assert!(err.to_string().contains("schemaVersion"));
    }

    #[test]
    fn up_to_date_documents_still_get_cleanup() {
        let doc = TraceDocument::new(json!({
            "schemaVersion": "1.5",
            "wms": "pegasus",
            "runtimeSystem": {"name": "pegasus"},
            "workflow": {"specification": {"tasks": [], "files": []}, "execution": {"tasks": []}}
        }))
        .unwrap();

        let outcome = Migrator::new().migrate(doc).unwrap();
        match outcome {
            MigrationOutcome::UpToDate { document } => {
                assert!(!document.root().contains_key("wms"));
            }
            other => panic!("expected up-to-date, got {other:?}"),
        }
    }
}
