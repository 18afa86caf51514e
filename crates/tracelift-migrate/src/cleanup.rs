//! Legacy-field cleanup
//!
//! Idempotent safety pass for documents touched by a partially-applied or
//! re-entrant pipeline: wherever a legacy field and its renamed successor
//! coexist, the legacy one is dropped. The byte-volume conversion is the one
//! rename whose information would be lost by dropping, so tasks still
//! carrying only the legacy volume fields get the unit conversion re-applied
//! here instead.

use serde_json::{Map, Value};

use tracelift_format::{ByteUnits, TraceDocument};

use crate::error::MigrateResult;
use crate::steps::convert_byte_volumes;

/// Pairs swept at the document root.
const ROOT_PAIRS: &[(&str, &str)] = &[("wms", "runtimeSystem")];

/// Pairs swept on the workflow object.
const WORKFLOW_PAIRS: &[(&str, &str)] = &[
    ("jobs", "tasks"),
    ("makespan", "makespanInSeconds"),
];

/// Pairs swept on every task record.
const TASK_PAIRS: &[(&str, &str)] = &[
    ("runtime", "runtimeInSeconds"),
    ("memory", "memoryInBytes"),
    ("cores", "coreCount"),
    ("energy", "energyInKWh"),
    ("avgPower", "avgPowerInW"),
    ("bytesRead", "readBytes"),
    ("bytesWritten", "writtenBytes"),
    ("machine", "machines"),
];

/// Pairs swept on every machine record.
const MACHINE_PAIRS: &[(&str, &str)] = &[("memory", "memoryInBytes")];

/// Pairs swept on a machine's cpu descriptor.
const CPU_PAIRS: &[(&str, &str)] = &[("count", "coreCount"), ("speed", "speedInMHz")];

/// Pairs swept on every file record.
const FILE_PAIRS: &[(&str, &str)] = &[("size", "sizeInBytes")];

/// Drop every legacy field whose renamed successor is also present.
fn drop_legacy(map: &mut Map<String, Value>, pairs: &[(&str, &str)]) {
    for (legacy, renamed) in pairs {
        if map.contains_key(*renamed) {
            map.remove(*legacy);
        }
    }
}

fn sweep_machines(machines: &mut [Value]) {
    for machine in machines {
        if let Some(machine) = machine.as_object_mut() {
            drop_legacy(machine, MACHINE_PAIRS);
            if let Some(Value::Object(cpu)) = machine.get_mut("cpu") {
                drop_legacy(cpu, CPU_PAIRS);
            }
        }
    }
}

fn sweep_files(files: &mut [Value]) {
    for file in files {
        if let Some(file) = file.as_object_mut() {
            drop_legacy(file, FILE_PAIRS);
        }
    }
}

fn sweep_tasks(tasks: &mut [Value], units: Option<ByteUnits>) -> MigrateResult<()> {
    for task in tasks {
        let Some(task) = task.as_object_mut() else { continue };
        drop_legacy(task, TASK_PAIRS);
        // Only legacy-without-successor volumes remain now; convert them.
        convert_byte_volumes(task, units)?;
        if let Some(Value::Array(files)) = task.get_mut("files") {
            sweep_files(files);
        }
    }
    Ok(())
}

/// Sweep the whole document for legacy/renamed field pairs.
///
/// Safe to run repeatedly: a second pass finds nothing left to drop or
/// convert and returns the document unchanged.
///
/// # Errors
/// Returns error when the document has no workflow, or when a task carries a
/// legacy byte volume while the document names no runtime system.
pub fn cleanup(mut doc: TraceDocument) -> MigrateResult<TraceDocument> {
    let units = doc.runtime_system_name().map(ByteUnits::for_tool);

    drop_legacy(doc.root_mut(), ROOT_PAIRS);

    let workflow = doc.workflow_mut()?;
    drop_legacy(workflow, WORKFLOW_PAIRS);

    for key in ["jobs", "tasks"] {
        if let Some(Value::Array(tasks)) = workflow.get_mut(key) {
            sweep_tasks(tasks, units)?;
        }
    }
    if let Some(Value::Array(machines)) = workflow.get_mut("machines") {
        sweep_machines(machines);
    }

    if let Some(Value::Object(execution)) = workflow.get_mut("execution") {
        if let Some(Value::Array(tasks)) = execution.get_mut("tasks") {
            sweep_tasks(tasks, units)?;
        }
        if let Some(Value::Array(machines)) = execution.get_mut("machines") {
            sweep_machines(machines);
        }
    }

    if let Some(Value::Object(specification)) = workflow.get_mut("specification") {
        if let Some(Value::Array(files)) = specification.get_mut("files") {
            sweep_files(files);
        }
    }

    Ok(doc)
}
