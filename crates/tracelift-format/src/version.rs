//! Schema version ladder
//!
//! Trace documents carry a `schemaVersion` tag drawn from a closed, ordered
//! set. Migration walks the ladder upward one rung at a time; tags newer than
//! [`SchemaVersion::LATEST`] are unsupported rather than malformed, and the
//! caller decides how loudly to say so.

use std::fmt;
use std::str::FromStr;

use crate::error::VersionError;

/// A known trace schema version.
///
/// Ordering follows release history, so `V1_0 < V1_5` holds and a comparison
/// against [`SchemaVersion::LATEST`] decides whether migration has work left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// Original release
    V1_0,
    /// Additive changes only; migrates identically to 1.0
    V1_1,
    /// Introduced task ids, categories and command records
    V1_2,
    /// Renamed the `jobs` container to `tasks`
    V1_3,
    /// Moved to explicit-unit field names
    V1_4,
    /// Split the static specification from the per-run execution profile
    V1_5,
}

impl SchemaVersion {
    /// Newest version this tooling understands.
    pub const LATEST: SchemaVersion = SchemaVersion::V1_5;

    /// Every supported version, oldest first.
    pub const ALL: [SchemaVersion; 6] = [
        SchemaVersion::V1_0,
        SchemaVersion::V1_1,
        SchemaVersion::V1_2,
        SchemaVersion::V1_3,
        SchemaVersion::V1_4,
        SchemaVersion::V1_5,
    ];

    /// The tag string as it appears inside documents.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
        }
    }

    /// Whether this is the newest known version.
    #[inline]
    #[must_use]
    pub fn is_latest(self) -> bool {
        self == Self::LATEST
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(Self::V1_0),
            "1.1" => Ok(Self::V1_1),
            "1.2" => Ok(Self::V1_2),
            "1.3" => Ok(Self::V1_3),
            "1.4" => Ok(Self::V1_4),
            "1.5" => Ok(Self::V1_5),
            other => Err(VersionError::Unknown(other.to_string())),
        }
    }
}
