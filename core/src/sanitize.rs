// printshop_core/src/sanitize.rs

//! Defensive payload-shape sanitizer for writes.
//!
//! The backing store rejects arbitrarily nested update payloads. Rather than
//! failing such writes outright, objects nested past a depth threshold are
//! serialized to an opaque JSON string and written as scalars. Arrays are
//! transparent to the depth count (the store copes with repetition, not with
//! nesting), and arrays of scalars pass through untouched. Already-flat
//! payloads come back unchanged, so the rewrite is idempotent.

use serde_json::Value;

/// Objects nested beyond this depth are collapsed to a string. The payload's
/// top-level object is depth 0; its object fields are depth 1. With the
/// default of 2, an order's line items (objects inside the `items` array at
/// depth 1) survive intact while each item's nested customizations object
/// (depth 2) is flattened to an opaque string.
pub const DEFAULT_MAX_DEPTH: usize = 2;

pub fn sanitize_for_store(value: &Value) -> Value {
  sanitize_with_depth(value, DEFAULT_MAX_DEPTH)
}

pub fn sanitize_with_depth(value: &Value, max_depth: usize) -> Value {
  sanitize_value(value, 0, max_depth)
}

fn is_scalar(value: &Value) -> bool {
  !matches!(value, Value::Object(_) | Value::Array(_))
}

fn sanitize_value(value: &Value, depth: usize, max_depth: usize) -> Value {
  match value {
    Value::Object(map) => {
      if depth >= max_depth && depth > 0 {
        Value::String(value.to_string())
      } else {
        Value::Object(
          map
            .iter()
            .map(|(k, v)| (k.clone(), sanitize_value(v, depth + 1, max_depth)))
            .collect(),
        )
      }
    }
    Value::Array(items) => {
      if items.iter().all(is_scalar) {
        value.clone()
      } else {
        Value::Array(
          items
            .iter()
            .map(|v| sanitize_value(v, depth, max_depth))
            .collect(),
        )
      }
    }
    scalar => scalar.clone(),
  }
}
