//! Version migration for workflow trace documents
//!
//! This crate walks trace documents up the schema version ladder, one
//! version at a time, and finishes every walk with a cleanup pass that
//! strips superseded legacy fields.
//!
//! # Core Concepts
//!
//! - **Migration Step**: a pure document transformation from one set of
//!   source versions to a single target version
//! - **Ladder**: the ordered sequence of steps covering every supported
//!   source version up to the latest
//! - **Cleanup**: an idempotent sweep removing legacy fields that coexist
//!   with their renamed successors
//! - **Outcome**: migrated, already up to date, or skipped because the
//!   document declares a version outside the supported set
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! use tracelift_format::TraceDocument;
//! use tracelift_migrate::{MigrationOutcome, Migrator};
//!
//! let path = Path::new("trace.json");
//! let doc = TraceDocument::load(path)?;
//! match Migrator::new().migrate(doc)? {
//!     MigrationOutcome::Migrated { document, from } => {
//!         println!("migrated from {from}");
//!         document.save(path)?;
//!     }
//!     MigrationOutcome::UpToDate { document } => document.save(path)?,
//!     MigrationOutcome::Skipped { version, .. } => {
//!         eprintln!("unsupported version {version}");
//!     }
//! }
//! ```

#![warn(unreachable_pub)]

pub mod cleanup;
pub mod error;
pub mod migrator;
pub mod step;
pub mod steps;

pub use cleanup::cleanup;
pub use error::{MigrateError, MigrateResult};
pub use migrator::{MigrationOutcome, Migrator};
pub use step::{ladder, MigrationStep};
pub use steps::{ContainerRename, SpecificationSplit, TaskIdentification, UnitNormalization};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
