//! Field transfer utilities
//!
//! Migration steps move values between JSON maps under new names, sometimes
//! scaling numbers on the way. Absence of the source field is reported to the
//! caller, not raised; each step decides whether absence is fatal.

use serde_json::{Map, Value};

/// Move `old` to `new` inside one map.
///
/// Any existing value under `new` is overwritten.
///
/// # Returns
/// `true` when a value moved, `false` when `old` was absent.
pub fn rename_field(map: &mut Map<String, Value>, old: &str, new: &str) -> bool {
    match map.remove(old) {
        Some(value) => {
            map.insert(new.to_string(), value);
            true
        }
        None => false,
    }
}

/// Move `old` from `src` to `new` in `dst`.
///
/// # Returns
/// `true` when a value moved, `false` when `old` was absent.
pub fn transfer_field(
    src: &mut Map<String, Value>,
    dst: &mut Map<String, Value>,
    old: &str,
    new: &str,
) -> bool {
    match src.remove(old) {
        Some(value) => {
            dst.insert(new.to_string(), value);
            true
        }
        None => false,
    }
}

/// Multiply a JSON number by an integer factor.
///
/// Integers stay integers while the product fits; anything else goes through
/// floating point. Non-numbers pass through untouched so a malformed field
/// survives for the validator to complain about.
#[must_use]
pub fn scale_number(value: Value, factor: u64) -> Value {
    let n = match value {
        Value::Number(n) => n,
        other => return other,
    };
    if let Some(scaled) = n.as_u64().and_then(|u| u.checked_mul(factor)) {
        return Value::from(scaled);
    }
    if let Some(scaled) = i64::try_from(factor)
        .ok()
        .and_then(|f| n.as_i64().and_then(|i| i.checked_mul(f)))
    {
        return Value::from(scaled);
    }
    match n.as_f64() {
        Some(f) => Value::from(f * factor as f64),
        None => Value::Number(n),
    }
}

/// Move `old` to `new` inside one map, scaling the value on the way.
///
/// # Returns
/// `true` when a value moved, `false` when `old` was absent.
pub fn rename_field_scaled(
    map: &mut Map<String, Value>,
    old: &str,
    new: &str,
    factor: u64,
) -> bool {
    match map.remove(old) {
        Some(value) => {
            map.insert(new.to_string(), scale_number(value, factor));
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn rename_moves_value() {
        let mut m = map(json!({"makespan": 12.5}));
        assert!(rename_field(&mut m, "makespan", "makespanInSeconds"));
        assert_eq!(m.get("makespanInSeconds"), Some(&json!(12.5)));
        assert!(!m.contains_key("makespan"));
    }

    #[test]
    fn rename_absent_is_noop() {
        let mut m = map(json!({"other": 1}));
        assert!(!rename_field(&mut m, "makespan", "makespanInSeconds"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn rename_overwrites_existing_target() {
        let mut m = map(json!({"memory": 4, "memoryInBytes": 9}));
        assert!(rename_field(&mut m, "memory", "memoryInBytes"));
        assert_eq!(m.get("memoryInBytes"), Some(&json!(4)));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn transfer_moves_between_maps() {
        let mut src = map(json!({"machines": [{"nodeName": "n0"}]}));
        let mut dst = Map::new();
        assert!(transfer_field(&mut src, &mut dst, "machines", "machines"));
        assert!(src.is_empty());
        assert!(dst.contains_key("machines"));
    }

    #[test]
    fn scale_keeps_integers_integral() {
        assert_eq!(scale_number(json!(5), 1000), json!(5000));
        assert_eq!(scale_number(json!(0), 1000), json!(0));
    }

    #[test]
    fn scale_negative_integers() {
        assert_eq!(scale_number(json!(-3), 1000), json!(-3000));
    }

    #[test]
    fn scale_floats() {
        assert_eq!(scale_number(json!(1.5), 1000), json!(1500.0));
    }

    #[test]
    fn scale_leaves_non_numbers_alone() {
        assert_eq!(scale_number(json!("5"), 1000), json!("5"));
        assert_eq!(scale_number(Value::Null, 1000), Value::Null);
    }

    #[test]
    fn scale_by_one_is_identity() {
        assert_eq!(scale_number(json!(42), 1), json!(42));
    }

    #[test]
    fn scaled_rename() {
        let mut m = map(json!({"bytesRead": 5}));
        assert!(rename_field_scaled(&mut m, "bytesRead", "readBytes", 1000));
        assert_eq!(m.get("readBytes"), Some(&json!(5000)));
        assert!(!m.contains_key("bytesRead"));
    }
}
