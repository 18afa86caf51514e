//! Specification split and dependency inference (1.4 → 1.5)
//!
//! Partitions every task into a structural record under
//! `workflow.specification` and a measurement record under
//! `workflow.execution`, then reconstructs the full dependency graph:
//! declared parent links become mutual parent/child edges, and tasks that
//! declare no parents at all have edges inferred from file provenance (a task
//! reading a file gains the file's first writer as a parent).

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use tracelift_format::field::{rename_field, transfer_field};
use tracelift_format::naming::NAME_DELIMITER;
use tracelift_format::{DocumentError, SchemaVersion, TraceDocument};

use crate::error::{MigrateError, MigrateResult};
use crate::step::MigrationStep;
use crate::steps::task_name;

/// Static half of a task after the split.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpecTask {
    id: String,
    name: String,
    parents: Vec<String>,
    children: Vec<String>,
    input_files: Vec<String>,
    output_files: Vec<String>,
}

/// One entry of the de-duplicated global file table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpecFile {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_in_bytes: Option<Value>,
}

/// Measurement fields that move onto the execution task, renamed where the
/// explicit-unit spelling differs.
const EXECUTION_FIELDS: &[(&str, &str)] = &[
    ("runtimeInSeconds", "runtimeInSeconds"),
    ("command", "command"),
    ("cores", "coreCount"),
    ("avgCPU", "avgCPU"),
    ("readBytes", "readBytes"),
    ("writtenBytes", "writtenBytes"),
    ("memoryInBytes", "memoryInBytes"),
    ("energy", "energyInKWh"),
    ("avgPower", "avgPowerInW"),
    ("priority", "priority"),
];

/// Splits the flat task list into specification and execution (1.4 → 1.5).
///
/// # Characteristics
/// - Stable specification ids tolerate documents that skipped the
///   identification step (name, `{name}_{id}`, or `{name}_{index}`)
/// - Parent references resolve through a legacy-name table so edges stay
///   closed after ids change; unresolvable references survive verbatim for
///   the validator to flag
/// - Dependency inference fills in parents only for tasks declaring none
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationSplit;

impl SpecificationSplit {
    /// Create the step
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationStep for SpecificationSplit {
    fn source_versions(&self) -> &'static [SchemaVersion] {
        &[SchemaVersion::V1_4]
    }

    fn target(&self) -> SchemaVersion {
        SchemaVersion::V1_5
    }

    fn name(&self) -> &'static str {
        "SpecificationSplit"
    }

    fn apply(&self, mut doc: TraceDocument) -> MigrateResult<TraceDocument> {
        doc.set_version(self.target());

        rename_field(doc.root_mut(), "wms", "runtimeSystem");

        let workflow = doc.workflow_mut()?;

        if let Some(Value::Array(machines)) = workflow.get_mut("machines") {
            for machine in machines.iter_mut() {
                if let Some(machine) = machine.as_object_mut() {
                    if let Some(Value::Object(cpu)) = machine.get_mut("cpu") {
                        rename_field(cpu, "count", "coreCount");
                        rename_field(cpu, "speed", "speedInMHz");
                    }
                }
            }
        }

        // Execution header: run-level fields leave the workflow level.
        let mut execution = Map::new();
        transfer_field(workflow, &mut execution, "makespanInSeconds", "makespanInSeconds");
        transfer_field(workflow, &mut execution, "executedAt", "executedAt");
        transfer_field(workflow, &mut execution, "machines", "machines");

        let legacy = match workflow.remove("tasks") {
            Some(Value::Array(list)) => list,
            Some(_) => return Err(MigrateError::unexpected_type("workflow.tasks")),
            None => return Err(MigrateError::missing("workflow.tasks")),
        };

        let mut spec_tasks: Vec<SpecTask> = Vec::with_capacity(legacy.len());
        let mut exec_tasks: Vec<Value> = Vec::with_capacity(legacy.len());
        let mut files: IndexMap<String, SpecFile> = IndexMap::new();
        // file key -> id of its first writer
        let mut producers: HashMap<String, String> = HashMap::new();
        // legacy task name -> stable id, first declaration wins
        let mut alias: HashMap<String, String> = HashMap::new();

        for (index, entry) in legacy.into_iter().enumerate() {
            let mut task = match entry {
                Value::Object(task) => task,
                _ => {
                    return Err(MigrateError::unexpected_type(format!(
                        "workflow.tasks[{index}]"
                    )))
                }
            };
            let name = task_name(&task, "tasks", index)?;
            let id = stable_id(&name, task.remove("id"), index);
            alias.entry(name.clone()).or_insert_with(|| id.clone());

            let parents = take_parents(&mut task, index)?;

            let mut spec = SpecTask {
                id: id.clone(),
                name,
                parents,
                children: Vec::new(),
                input_files: Vec::new(),
                output_files: Vec::new(),
            };

            collect_files(&mut task, index, &mut spec, &mut files, &mut producers)?;
            spec_tasks.push(spec);

            exec_tasks.push(Value::Object(execution_task(&mut task, id)));
        }

        // Declared edges: resolve parent references, then record the reverse
        // edge each one implies. A forward-reference table is required since
        // a parent may appear before or after its child in iteration order.
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for task in &mut spec_tasks {
            for parent in &mut task.parents {
                if let Some(resolved) = alias.get(parent.as_str()) {
                    if resolved != parent {
                        *parent = resolved.clone();
                    }
                }
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(task.id.clone());
            }
        }

        // Inference: only tasks declaring no parents gain edges, and only
        // from files whose producer is known.
        let mut inferred = 0_usize;
        for task in &mut spec_tasks {
            if !task.parents.is_empty() {
                continue;
            }
            let mut gained: Vec<String> = Vec::new();
            for key in &task.input_files {
                if let Some(producer) = producers.get(key) {
                    if !gained.contains(producer) {
                        gained.push(producer.clone());
                    }
                }
            }
            for producer in gained {
                children
                    .entry(producer.clone())
                    .or_default()
                    .push(task.id.clone());
                task.parents.push(producer);
                inferred += 1;
            }
        }

        for task in &mut spec_tasks {
            if let Some(kids) = children.remove(&task.id) {
                task.children = kids;
            }
        }
        for reference in children.keys() {
            debug!(
                parent = %reference,
                "parent reference matches no task; reverse edge dropped"
            );
        }

        debug!(
            tasks = spec_tasks.len(),
            files = files.len(),
            inferred,
            "specification split complete"
        );

        let mut specification = Map::new();
        specification.insert("tasks".to_string(), to_value(&spec_tasks)?);
        specification.insert(
            "files".to_string(),
            to_value(&files.into_values().collect::<Vec<SpecFile>>())?,
        );
        workflow.insert("specification".to_string(), Value::Object(specification));

        execution.insert("tasks".to_string(), Value::Array(exec_tasks));
        workflow.insert("execution".to_string(), Value::Object(execution));

        Ok(doc)
    }
}

/// Stable specification id for one task.
///
/// A legacy id embedded in the name means the name already identifies the
/// task; a legacy id not embedded is appended; no usable id falls back to the
/// zero-based list position. Deterministic and unique without depending on
/// the identification step's counter.
fn stable_id(name: &str, legacy_id: Option<Value>, index: usize) -> String {
    match legacy_id {
        Some(Value::String(id)) if name.contains(&id) => name.to_string(),
        Some(Value::String(id)) => format!("{name}{NAME_DELIMITER}{id}"),
        _ => format!("{name}{NAME_DELIMITER}{index}"),
    }
}

/// Detach the legacy parents list, insisting every entry is a string.
fn take_parents(task: &mut Map<String, Value>, index: usize) -> MigrateResult<Vec<String>> {
    match task.remove("parents") {
        Some(Value::Array(entries)) => {
            let mut parents = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry {
                    Value::String(reference) => parents.push(reference),
                    _ => {
                        return Err(MigrateError::unexpected_type(format!(
                            "workflow.tasks[{index}].parents"
                        )))
                    }
                }
            }
            Ok(parents)
        }
        Some(_) => Err(MigrateError::unexpected_type(format!(
            "workflow.tasks[{index}].parents"
        ))),
        None => Ok(Vec::new()),
    }
}

/// Consume the task's file references: register each in the global table
/// (first occurrence wins for size), sort the key into the task's input or
/// output list, and record the first writer of every written file.
fn collect_files(
    task: &mut Map<String, Value>,
    index: usize,
    spec: &mut SpecTask,
    files: &mut IndexMap<String, SpecFile>,
    producers: &mut HashMap<String, String>,
) -> MigrateResult<()> {
    let entries = match task.remove("files") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(MigrateError::unexpected_type(format!(
                "workflow.tasks[{index}].files"
            )))
        }
        None => return Ok(()),
    };

    for (file_index, entry) in entries.into_iter().enumerate() {
        let file = match entry {
            Value::Object(file) => file,
            _ => {
                return Err(MigrateError::unexpected_type(format!(
                    "workflow.tasks[{index}].files[{file_index}]"
                )))
            }
        };
        let name = file.get("name").and_then(Value::as_str).ok_or_else(|| {
            MigrateError::missing(format!("workflow.tasks[{index}].files[{file_index}].name"))
        })?;

        // The global key is path and name concatenated verbatim.
        let key = match file.get("path").and_then(Value::as_str) {
            Some(path) => format!("{path}{name}"),
            None => name.to_string(),
        };

        files.entry(key.clone()).or_insert_with(|| SpecFile {
            id: key.clone(),
            size_in_bytes: file.get("sizeInBytes").cloned(),
        });

        if file.get("link").and_then(Value::as_str) == Some("input") {
            spec.input_files.push(key);
        } else {
            producers
                .entry(key.clone())
                .or_insert_with(|| spec.id.clone());
            spec.output_files.push(key);
        }
    }
    Ok(())
}

/// Build the execution task, moving every remaining measurement field off the
/// legacy record. A legacy singular `machine` becomes a singleton `machines`
/// list; an already-plural list moves as-is.
fn execution_task(task: &mut Map<String, Value>, id: String) -> Map<String, Value> {
    let mut exec = Map::new();
    exec.insert("id".to_string(), Value::String(id));
    for (legacy, renamed) in EXECUTION_FIELDS {
        transfer_field(task, &mut exec, legacy, renamed);
    }
    match task.remove("machine") {
        Some(machine) => {
            exec.insert("machines".to_string(), Value::Array(vec![machine]));
        }
        None => {
            transfer_field(task, &mut exec, "machines", "machines");
        }
    }
    exec
}

fn to_value<T: Serialize>(value: &T) -> MigrateResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| MigrateError::Document(DocumentError::Serialization(e.to_string())))
}
