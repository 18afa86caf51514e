//! Migration step seam
//!
//! Provides the [`MigrationStep`] trait for the version-to-version transforms
//! and the [`ladder`] that chains them. Steps are pure functions over an
//! owned document: each consumes the previous step's output and returns a new
//! value, so a failed step can never leave a half-written file behind.

use tracelift_format::{SchemaVersion, TraceDocument};

use crate::error::MigrateResult;
use crate::steps::{ContainerRename, SpecificationSplit, TaskIdentification, UnitNormalization};

/// One rung of the version ladder.
///
/// # Safety
/// Implementations must stamp the target version before reshaping anything,
/// so a crash mid-step leaves a well-defined intermediate version rather than
/// a half-migrated document tagged with the old one.
pub trait MigrationStep: Send + Sync + std::fmt::Debug {
    /// Versions this step accepts as input.
    fn source_versions(&self) -> &'static [SchemaVersion];

    /// Version the document carries after this step.
    fn target(&self) -> SchemaVersion;

    /// Step name (for logging/diagnostics)
    fn name(&self) -> &'static str;

    /// Transform the document.
    ///
    /// # Errors
    /// Returns error when the document lacks structure the source version
    /// requires.
    fn apply(&self, doc: TraceDocument) -> MigrateResult<TraceDocument>;
}

/// The full ladder, oldest step first.
///
/// A single in-order pass over this list carries a document from any
/// supported version to [`SchemaVersion::LATEST`]: each step's target is the
/// next step's source, so once one step fires, every later one does too.
#[must_use]
pub fn ladder() -> Vec<Box<dyn MigrationStep>> {
    vec![
        Box::new(TaskIdentification::new()),
        Box::new(ContainerRename::new()),
        Box::new(UnitNormalization::new()),
        Box::new(SpecificationSplit::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_targets_chain_to_latest() {
        let steps = ladder();
        assert!(!steps.is_empty());

        for pair in steps.windows(2) {
            assert!(
                pair[1].source_versions().contains(&pair[0].target()),
                "{} should feed {}",
                pair[0].name(),
                pair[1].name()
            );
        }
        let last = steps.last().map(|s| s.target());
        assert_eq!(last, Some(SchemaVersion::LATEST));
    }

    #[test]
    fn ladder_covers_every_old_version() {
        let steps = ladder();
        for version in SchemaVersion::ALL {
            if version.is_latest() {
                continue;
            }
            assert!(
                steps.iter().any(|s| s.source_versions().contains(&version)),
                "no step accepts version {version}"
            );
        }
    }
}
