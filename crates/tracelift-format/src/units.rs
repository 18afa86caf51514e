//! Byte-unit policy for legacy volume fields
//!
//! Schema versions before 1.4 recorded read/write volumes without naming a
//! unit. Most producers wrote kilobytes; a short known list wrote bytes
//! natively. The policy is keyed off the runtime-system descriptor. The
//! factor is a flat 1000 even where a producer meant KiB, matching what the
//! historical converters did.

/// Multiplier applied when legacy values were recorded in kilobytes.
pub const KILOBYTE_FACTOR: u64 = 1000;

/// Runtime systems whose legacy traces already recorded bytes.
///
/// Matched case-insensitively as a substring of the descriptor name, so both
/// `Makeflow` and `makeflow-5.0` qualify.
pub const NATIVE_UNIT_TOOLS: &[&str] = &["makeflow"];

/// Unit the legacy read/write volume fields were recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteUnits {
    /// Values are already bytes; copy unscaled.
    Native,
    /// Values are kilobytes; multiply by [`KILOBYTE_FACTOR`].
    Kilobytes,
}

impl ByteUnits {
    /// Decide the unit policy for a runtime-system descriptor.
    #[must_use]
    pub fn for_tool(descriptor: &str) -> Self {
        let lowered = descriptor.to_lowercase();
        if NATIVE_UNIT_TOOLS
            .iter()
            .any(|tool| lowered.contains(tool))
        {
            ByteUnits::Native
        } else {
            ByteUnits::Kilobytes
        }
    }

    /// Factor legacy values are multiplied by under this policy.
    #[inline]
    #[must_use]
    pub fn factor(self) -> u64 {
        match self {
            Self::Native => 1,
            Self::Kilobytes => KILOBYTE_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_tools_match_any_case() {
        assert_eq!(ByteUnits::for_tool("makeflow"), ByteUnits::Native);
        assert_eq!(ByteUnits::for_tool("Makeflow"), ByteUnits::Native);
        assert_eq!(ByteUnits::for_tool("MAKEFLOW"), ByteUnits::Native);
    }

    #[test]
    fn native_tools_match_as_substring() {
        assert_eq!(ByteUnits::for_tool("makeflow-5.0"), ByteUnits::Native);
        assert_eq!(ByteUnits::for_tool("cctools/makeflow"), ByteUnits::Native);
    }

    #[test]
    fn unknown_tools_default_to_kilobytes() {
        assert_eq!(ByteUnits::for_tool("pegasus"), ByteUnits::Kilobytes);
        assert_eq!(ByteUnits::for_tool("nextflow"), ByteUnits::Kilobytes);
        assert_eq!(ByteUnits::for_tool(""), ByteUnits::Kilobytes);
    }

    #[test]
    fn factors() {
        assert_eq!(ByteUnits::Native.factor(), 1);
        assert_eq!(ByteUnits::Kilobytes.factor(), KILOBYTE_FACTOR);
    }
}
