//! Testing utilities for Tracelift workspace
//!
//! Shared trace-document fixtures, one per schema version, all describing
//! the same three-task pipeline (preprocess, align, stats) so stepwise and
//! full-ladder tests can assert against a single known workflow.

#![allow(missing_docs)]

use serde_json::{json, Value};
use tracelift_format::TraceDocument;

/// Wrap a fixture value in a document.
pub fn document(value: Value) -> TraceDocument {
    TraceDocument::new(value).unwrap()
}

/// Version 1.0 instance: name-keyed jobs, raw units, singular machine refs.
pub fn legacy_instance() -> Value {
    json!({
        "name": "epigenomics-chr21",
        "schemaVersion": "1.0",
        "wms": {"name": "pegasus", "version": "5.0.1"},
        "workflow": {
            "makespan": 127.43,
            "executedAt": "20250301T120000-0500",
            "machines": [
                {
                    "nodeName": "worker-1",
                    "system": "linux",
                    "cpu": {"count": 8, "speed": 2400},
                    "memory": 64
                }
            ],
            "jobs": [
                {
                    "name": "preprocess_00001",
                    "type": "compute",
                    "runtime": 12.5,
                    "arguments": ["-i", "reads.fastq"],
                    "parents": [],
                    "bytesRead": 2048,
                    "bytesWritten": 1024,
                    "memory": 512,
                    "cores": 2,
                    "machine": "worker-1",
                    "files": [
                        {"name": "reads.fastq", "link": "input", "size": 4096},
                        {"name": "reads.clean.fastq", "link": "output", "size": 4000}
                    ]
                },
                {
                    "name": "align_ID0000007",
                    "type": "compute",
                    "runtime": 88.1,
                    "parents": ["preprocess_00001"],
                    "bytesRead": 4000,
                    "bytesWritten": 9000,
                    "memory": 2048,
                    "cores": 4,
                    "machine": "worker-1",
                    "files": [
                        {"name": "reads.clean.fastq", "link": "input", "size": 4000},
                        {"name": "aligned.bam", "link": "output", "size": 8192}
                    ]
                },
                {
                    "name": "stats_00002",
                    "type": "compute",
                    "runtime": 3.25,
                    "arguments": [],
                    "parents": ["align_ID0000007"],
                    "bytesRead": 8192,
                    "bytesWritten": 128,
                    "memory": 256,
                    "cores": 1,
                    "machine": "worker-1",
                    "files": [
                        {"name": "aligned.bam", "link": "input", "size": 8192},
                        {"name": "stats.txt", "link": "output", "size": 128}
                    ]
                }
            ]
        }
    })
}

/// Version 1.0 instance produced by a tool that already reports bytes.
pub fn makeflow_legacy_instance() -> Value {
    json!({
        "name": "blast-batch",
        "schemaVersion": "1.0",
        "wms": {"name": "makeflow", "version": "7.1.1"},
        "workflow": {
            "makespan": 42.0,
            "machines": [
                {"nodeName": "node-a", "cpu": {"count": 4}}
            ],
            "jobs": [
                {
                    "name": "blast_00001",
                    "type": "compute",
                    "runtime": 40.5,
                    "parents": [],
                    "bytesRead": 1048576,
                    "bytesWritten": 2048,
                    "machine": "node-a",
                    "files": []
                }
            ]
        }
    })
}

/// Version 1.2 instance: jobs carry synthesized ids, categories, commands.
pub fn identified_instance() -> Value {
    json!({
        "name": "epigenomics-chr21",
        "schemaVersion": "1.2",
        "wms": {"name": "pegasus", "version": "5.0.1"},
        "workflow": {
            "makespan": 127.43,
            "executedAt": "20250301T120000-0500",
            "machines": [
                {
                    "nodeName": "worker-1",
                    "system": "linux",
                    "cpu": {"count": 8, "speed": 2400},
                    "memory": 64
                }
            ],
            "jobs": [
                {
                    "name": "preprocess_00001_ID0000001",
                    "id": "ID0000001",
                    "category": "preprocess",
                    "type": "compute",
                    "runtime": 12.5,
                    "command": {"program": "preprocess", "arguments": ["-i", "reads.fastq"]},
                    "parents": [],
                    "bytesRead": 2048,
                    "bytesWritten": 1024,
                    "memory": 512,
                    "cores": 2,
                    "machine": "worker-1",
                    "files": [
                        {"name": "reads.fastq", "link": "input", "size": 4096},
                        {"name": "reads.clean.fastq", "link": "output", "size": 4000}
                    ]
                },
                {
                    "name": "align_ID0000007",
                    "id": "ID0000007",
                    "category": "align",
                    "type": "compute",
                    "runtime": 88.1,
                    "command": {"program": "align", "arguments": []},
                    "parents": ["preprocess_00001_ID0000001"],
                    "bytesRead": 4000,
                    "bytesWritten": 9000,
                    "memory": 2048,
                    "cores": 4,
                    "machine": "worker-1",
                    "files": [
                        {"name": "reads.clean.fastq", "link": "input", "size": 4000},
                        {"name": "aligned.bam", "link": "output", "size": 8192}
                    ]
                },
                {
                    "name": "stats_00002_ID0000002",
                    "id": "ID0000002",
                    "category": "stats",
                    "type": "compute",
                    "runtime": 3.25,
                    "command": {"program": "stats", "arguments": []},
                    "parents": ["align_ID0000007"],
                    "bytesRead": 8192,
                    "bytesWritten": 128,
                    "memory": 256,
                    "cores": 1,
                    "machine": "worker-1",
                    "files": [
                        {"name": "aligned.bam", "link": "input", "size": 8192},
                        {"name": "stats.txt", "link": "output", "size": 128}
                    ]
                }
            ]
        }
    })
}

/// Version 1.3 instance: the task container has its modern name.
pub fn renamed_instance() -> Value {
    let mut value = identified_instance();
    value["schemaVersion"] = json!("1.3");
    let workflow = value["workflow"].as_object_mut().unwrap();
    let jobs = workflow.remove("jobs").unwrap();
    workflow.insert("tasks".to_string(), jobs);
    value
}

/// Version 1.4 instance: unit-qualified field names, byte-valued volumes.
pub fn normalized_instance() -> Value {
    json!({
        "name": "epigenomics-chr21",
        "schemaVersion": "1.4",
        "wms": {"name": "pegasus", "version": "5.0.1"},
        "workflow": {
            "makespanInSeconds": 127.43,
            "executedAt": "20250301T120000-0500",
            "machines": [
                {
                    "nodeName": "worker-1",
                    "system": "linux",
                    "cpu": {"count": 8, "speed": 2400},
                    "memoryInBytes": 64000
                }
            ],
            "tasks": [
                {
                    "name": "preprocess_00001_ID0000001",
                    "id": "ID0000001",
                    "category": "preprocess",
                    "type": "compute",
                    "runtimeInSeconds": 12.5,
                    "command": {"program": "preprocess", "arguments": ["-i", "reads.fastq"]},
                    "parents": [],
                    "readBytes": 2048000,
                    "writtenBytes": 1024000,
                    "memoryInBytes": 512000,
                    "cores": 2,
                    "machine": "worker-1",
                    "files": [
                        {"name": "reads.fastq", "link": "input", "sizeInBytes": 4096},
                        {"name": "reads.clean.fastq", "link": "output", "sizeInBytes": 4000}
                    ]
                },
                {
                    "name": "align_ID0000007",
                    "id": "ID0000007",
                    "category": "align",
                    "type": "compute",
                    "runtimeInSeconds": 88.1,
                    "command": {"program": "align", "arguments": []},
                    "parents": ["preprocess_00001_ID0000001"],
                    "readBytes": 4000000,
                    "writtenBytes": 9000000,
                    "memoryInBytes": 2048000,
                    "cores": 4,
                    "machine": "worker-1",
                    "files": [
                        {"name": "reads.clean.fastq", "link": "input", "sizeInBytes": 4000},
                        {"name": "aligned.bam", "link": "output", "sizeInBytes": 8192}
                    ]
                },
                {
                    "name": "stats_00002_ID0000002",
                    "id": "ID0000002",
                    "category": "stats",
                    "type": "compute",
                    "runtimeInSeconds": 3.25,
                    "command": {"program": "stats", "arguments": []},
                    "parents": ["align_ID0000007"],
                    "readBytes": 8192000,
                    "writtenBytes": 128000,
                    "memoryInBytes": 256000,
                    "cores": 1,
                    "machine": "worker-1",
                    "files": [
                        {"name": "aligned.bam", "link": "input", "sizeInBytes": 8192},
                        {"name": "stats.txt", "link": "output", "sizeInBytes": 128}
                    ]
                }
            ]
        }
    })
}

/// Version 1.5 instance: specification and execution sections fully split.
pub fn latest_instance() -> Value {
    json!({
        "name": "epigenomics-chr21",
        "schemaVersion": "1.5",
        "runtimeSystem": {"name": "pegasus", "version": "5.0.1"},
        "workflow": {
            "specification": {
                "tasks": [
                    {
                        "id": "preprocess_00001_ID0000001",
                        "name": "preprocess_00001_ID0000001",
                        "parents": [],
                        "children": ["align_ID0000007"],
                        "inputFiles": ["reads.fastq"],
                        "outputFiles": ["reads.clean.fastq"]
                    },
                    {
                        "id": "align_ID0000007",
                        "name": "align_ID0000007",
                        "parents": ["preprocess_00001_ID0000001"],
                        "children": ["stats_00002_ID0000002"],
                        "inputFiles": ["reads.clean.fastq"],
                        "outputFiles": ["aligned.bam"]
                    },
                    {
                        "id": "stats_00002_ID0000002",
                        "name": "stats_00002_ID0000002",
                        "parents": ["align_ID0000007"],
                        "children": [],
                        "inputFiles": ["aligned.bam"],
                        "outputFiles": ["stats.txt"]
                    }
                ],
                "files": [
                    {"id": "reads.fastq", "sizeInBytes": 4096},
                    {"id": "reads.clean.fastq", "sizeInBytes": 4000},
                    {"id": "aligned.bam", "sizeInBytes": 8192},
                    {"id": "stats.txt", "sizeInBytes": 128}
                ]
            },
            "execution": {
                "makespanInSeconds": 127.43,
                "executedAt": "20250301T120000-0500",
                "machines": [
                    {
                        "nodeName": "worker-1",
                        "system": "linux",
                        "cpu": {"coreCount": 8, "speedInMHz": 2400},
                        "memoryInBytes": 64000
                    }
                ],
                "tasks": [
                    {
                        "id": "preprocess_00001_ID0000001",
                        "runtimeInSeconds": 12.5,
                        "command": {"program": "preprocess", "arguments": ["-i", "reads.fastq"]},
                        "coreCount": 2,
                        "readBytes": 2048000,
                        "writtenBytes": 1024000,
                        "memoryInBytes": 512000,
                        "machines": ["worker-1"]
                    },
                    {
                        "id": "align_ID0000007",
                        "runtimeInSeconds": 88.1,
                        "command": {"program": "align", "arguments": []},
                        "coreCount": 4,
                        "readBytes": 4000000,
                        "writtenBytes": 9000000,
                        "memoryInBytes": 2048000,
                        "machines": ["worker-1"]
                    },
                    {
                        "id": "stats_00002_ID0000002",
                        "runtimeInSeconds": 3.25,
                        "command": {"program": "stats", "arguments": []},
                        "coreCount": 1,
                        "readBytes": 8192000,
                        "writtenBytes": 128000,
                        "memoryInBytes": 256000,
                        "machines": ["worker-1"]
                    }
                ]
            }
        }
    })
}
