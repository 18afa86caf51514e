//! Container rename (1.2 → 1.3)

use tracelift_format::field::rename_field;
use tracelift_format::{SchemaVersion, TraceDocument};

use crate::error::{MigrateError, MigrateResult};
use crate::step::MigrationStep;

/// Renames the legacy `jobs` container to `tasks` (1.2 → 1.3).
///
/// Order and contents are untouched; only the key changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerRename;

impl ContainerRename {
    /// Create the step
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationStep for ContainerRename {
    fn source_versions(&self) -> &'static [SchemaVersion] {
        &[SchemaVersion::V1_2]
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V1_3
    }

    fn name(&self) -> &'static str {
        "ContainerRename"
    }

    fn apply(&self, mut doc: TraceDocument) -> MigrateResult<TraceDocument> {
        doc.set_version(self.target());
        let workflow = doc.workflow_mut()?;
        if !rename_field(workflow, "jobs", "tasks") {
            return Err(MigrateError::missing("workflow.jobs"));
        }
        Ok(doc)
    }
}
