//! Trace Document Model
//!
//! Shared foundation for the migration and validation crates: the ordered
//! schema-version ladder, a thin owned wrapper over raw trace JSON, and the
//! naming and unit conventions historical trace producers baked into their
//! output.
//!
//! # Core Concepts
//!
//! - [`SchemaVersion`]: closed, ordered set of known version tags
//! - [`TraceDocument`]: owned JSON object root with version/workflow accessors
//! - [`field`]: move fields between maps, optionally scaling numbers
//! - [`naming`]: task-name and id conventions shared by two migration steps
//! - [`units`]: byte-unit policy for legacy read/write volume fields
//!
//! # Example
//!
//! ```rust,ignore
//! use tracelift_format::{SchemaVersion, TraceDocument};
//!
//! let doc = TraceDocument::load(Path::new("trace.json"))?;
//! if doc.version()? < SchemaVersion::LATEST {
//!     // hand it to the migrator
//! }
//! ```

#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod field;
pub mod naming;
pub mod units;
pub mod version;

// Re-exports
pub use document::TraceDocument;
pub use error::{DocumentError, VersionError};
pub use units::ByteUnits;
pub use version::SchemaVersion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
