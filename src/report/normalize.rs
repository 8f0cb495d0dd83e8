//! Big-integer normalization
//!
//! Rewrites every `BigInt` leaf of a report as its base-10 string so the
//! result can be sent to JSON consumers without losing precision. Structure,
//! keys, ordering and all other leaves are left untouched.

use super::Value;

/// Normalize a report value
///
/// Total over any value: there is no error case. The result contains no
/// `BigInt` leaves, so `normalize(&normalize(v)) == normalize(v)`.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::BigInt(n) => Value::String(n.to_str_radix(10)),
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}

/// Returns true if the value contains no `BigInt` leaves
pub fn is_normalized(value: &Value) -> bool {
    match value {
        Value::BigInt(_) => false,
        Value::Array(items) => items.iter().all(is_normalized),
        Value::Object(fields) => fields.iter().all(|(_, v)| is_normalized(v)),
        _ => true,
    }
}
