//! Unit normalization (1.3 → 1.4)
//!
//! Moves timing, memory and volume fields to explicit-unit names. Seconds
//! fields rename without scaling; memory moves from kilobytes to bytes; the
//! read/write volumes scale according to the producing tool, the one place
//! domain knowledge about the source tool enters the transform.

use serde_json::{Map, Value};

use tracelift_format::field::{rename_field, rename_field_scaled};
use tracelift_format::units::KILOBYTE_FACTOR;
use tracelift_format::{ByteUnits, SchemaVersion, TraceDocument};

use crate::error::{MigrateError, MigrateResult};
use crate::step::MigrationStep;
use crate::steps::{task_list_mut, task_object_mut};

/// Legacy/renamed byte volume field pairs.
pub(crate) const BYTE_VOLUME_PAIRS: &[(&str, &str)] =
    &[("bytesRead", "readBytes"), ("bytesWritten", "writtenBytes")];

/// Renames resource fields to explicit-unit names (1.3 → 1.4).
///
/// # Characteristics
/// - `makespan` and `runtime` are required; their absence is fatal
/// - memory fields scale by 1000 when present
/// - byte volumes scale by the tool policy; a document carrying them while
///   naming no runtime system fails rather than guessing a unit
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitNormalization;

impl UnitNormalization {
    /// Create the step
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationStep for UnitNormalization {
    fn source_versions(&self) -> &'static [SchemaVersion] {
        &[SchemaVersion::V1_3]
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V1_4
    }

    fn name(&self) -> &'static str {
        "UnitNormalization"
    }

    fn apply(&self, mut doc: TraceDocument) -> MigrateResult<TraceDocument> {
        doc.set_version(self.target());

        // Resolved lazily: documents carrying no byte volumes migrate fine
        // without naming their producer.
        let units = doc.runtime_system_name().map(ByteUnits::for_tool);

        let workflow = doc.workflow_mut()?;

        if !rename_field(workflow, "makespan", "makespanInSeconds") {
            return Err(MigrateError::missing("workflow.makespan"));
        }

        if let Some(Value::Array(machines)) = workflow.get_mut("machines") {
            for machine in machines.iter_mut() {
                if let Some(machine) = machine.as_object_mut() {
                    rename_field_scaled(machine, "memory", "memoryInBytes", KILOBYTE_FACTOR);
                }
            }
        }

        let tasks = task_list_mut(workflow, "tasks")?;
        for (index, entry) in tasks.iter_mut().enumerate() {
            let task = task_object_mut(entry, "tasks", index)?;

            if !rename_field(task, "runtime", "runtimeInSeconds") {
                return Err(MigrateError::missing(format!(
                    "workflow.tasks[{index}].runtime"
                )));
            }

            convert_byte_volumes(task, units)?;
            rename_field_scaled(task, "memory", "memoryInBytes", KILOBYTE_FACTOR);

            if let Some(Value::Array(files)) = task.get_mut("files") {
                for file in files.iter_mut() {
                    if let Some(file) = file.as_object_mut() {
                        rename_field(file, "size", "sizeInBytes");
                    }
                }
            }
        }

        Ok(doc)
    }
}

/// Move a task's legacy byte volumes to their explicit-unit names, scaled by
/// the document's unit policy.
///
/// `units` is `None` when the document names no runtime system; tasks that
/// carry neither legacy field never force the policy to resolve.
///
/// # Errors
/// Returns [`MigrateError::UnknownByteUnits`] for a task carrying a legacy
/// volume while no policy can be decided.
pub(crate) fn convert_byte_volumes(
    task: &mut Map<String, Value>,
    units: Option<ByteUnits>,
) -> MigrateResult<()> {
    for (legacy, renamed) in BYTE_VOLUME_PAIRS {
        if !task.contains_key(*legacy) {
            continue;
        }
        let units = units.ok_or_else(|| MigrateError::UnknownByteUnits {
            task: task_label(task),
        })?;
        rename_field_scaled(task, legacy, renamed, units.factor());
    }
    Ok(())
}

/// Best identifying string for a task in an error message.
fn task_label(task: &Map<String, Value>) -> String {
    task.get("name")
        .or_else(|| task.get("id"))
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string()
}
