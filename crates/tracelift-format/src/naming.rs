//! Task naming conventions
//!
//! Historical trace producers encoded task identity inside the task name.
//! Two shapes exist in the wild: an explicit marker form (`merge_ID0000042`)
//! whose id can be read straight back out, and a bare `category_rest` form
//! whose id must be synthesized from a counter. The identification step and
//! the specification split both lean on these rules, so they live here.

/// Marker separating a task name from its embedded id segment.
pub const ID_MARKER: &str = "_ID";

/// Delimiter between the category prefix and the rest of a plain task name.
pub const NAME_DELIMITER: char = '_';

/// Render a synthesized task id from a counter value.
///
/// Ids are `ID` followed by the counter zero-padded to seven digits; the
/// first synthesized id in a document is `ID0000001`.
#[inline]
#[must_use]
pub fn synthesized_id(counter: u64) -> String {
    format!("ID{counter:07}")
}

/// Split a name carrying an explicit id marker.
///
/// The prefix before the first marker is the category (may be empty) and the
/// segment between the first and second marker, re-prefixed with `ID`, is the
/// id. Names without the marker return `None`.
#[must_use]
pub fn split_marked_name(name: &str) -> Option<(String, String)> {
    if !name.contains(ID_MARKER) {
        return None;
    }
    let mut segments = name.split(ID_MARKER);
    let category = segments.next().unwrap_or_default().to_string();
    let id_segment = segments.next().unwrap_or_default();
    Some((category, format!("ID{id_segment}")))
}

/// Category prefix of a plain (unmarked) task name.
///
/// The segment before the first delimiter; the whole name when no delimiter
/// is present. A name starting with the delimiter yields an empty category.
#[inline]
#[must_use]
pub fn category_of(name: &str) -> &str {
    name.split(NAME_DELIMITER).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_ids_are_zero_padded() {
        assert_eq!(synthesized_id(1), "ID0000001");
        assert_eq!(synthesized_id(42), "ID0000042");
        assert_eq!(synthesized_id(9_999_999), "ID9999999");
    }

    #[test]
    fn wide_counters_keep_all_digits() {
        assert_eq!(synthesized_id(12_345_678), "ID12345678");
    }

    #[test]
    fn marked_name_splits() {
        assert_eq!(
            split_marked_name("merge_ID0000042"),
            Some(("merge".to_string(), "ID0000042".to_string()))
        );
    }

    #[test]
    fn marked_name_with_empty_category() {
        assert_eq!(
            split_marked_name("_ID0000001"),
            Some((String::new(), "ID0000001".to_string()))
        );
    }

    #[test]
    fn repeated_marker_takes_first_segment() {
        assert_eq!(
            split_marked_name("a_ID1_ID2"),
            Some(("a".to_string(), "ID1".to_string()))
        );
    }

    #[test]
    fn unmarked_name_returns_none() {
        assert_eq!(split_marked_name("merge_0"), None);
        assert_eq!(split_marked_name("merge"), None);
    }

    #[test]
    fn category_is_prefix_before_delimiter() {
        assert_eq!(category_of("blastall_00000002"), "blastall");
        assert_eq!(category_of("blastall"), "blastall");
        assert_eq!(category_of("_hidden"), "");
    }
}
