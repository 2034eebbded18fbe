// printshop_core/src/model/image.rs

//! Product images and their read-time repair/validation.
//!
//! The store tolerates corrupt image documents at write time and filters
//! defensively on every read: payloads shorter than [`MIN_PAYLOAD_LEN`] or
//! with a non-base64 body are dropped, and bare base64 (stored without its
//! data-URI prefix by an older upload path) is repaired in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::str_or;
use crate::store::Document;

/// Payloads at or below this length are junk (a real encoded image is never
/// this small) and are discarded at read time.
pub const MIN_PAYLOAD_LEN: usize = 100;

/// Prefix applied when repairing a bare base64 payload.
///
/// Inherited assumption, preserved as-is: a payload stored without its
/// data-URI prefix is presumed to be JPEG. A bare PNG or WebP upload would be
/// silently mislabeled here.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductImage {
  pub id: String,
  pub product_id: String,
  /// Always a full data URI after normalization.
  pub payload: String,
  /// Ordering index within the owning product's gallery.
  pub position: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ProductImage {
  /// Normalizes one image document. Returns `None` when the payload fails
  /// validation after repair; callers drop such entries silently (with a
  /// warning) instead of failing the whole gallery.
  pub fn from_document(doc: &Document) -> Option<ProductImage> {
    let raw = str_or(&doc.data, "imageData", "");
    let payload = repair_payload(&raw);
    if !is_valid_payload(&payload) {
      warn!(image_id = %doc.id, payload_len = raw.len(), "Dropping malformed image payload at read time.");
      return None;
    }
    Some(ProductImage {
      id: doc.id.clone(),
      product_id: str_or(&doc.data, "productId", ""),
      payload,
      position: doc.data.get("imageIndex").and_then(Value::as_i64).unwrap_or(0),
      created_at: doc.created_at,
      updated_at: doc.updated_at,
    })
  }
}

/// Repairs a stored payload into a data URI. Idempotent: an already-prefixed
/// payload is returned unchanged, a bare one gains exactly one prefix.
pub fn repair_payload(raw: &str) -> String {
  if raw.starts_with("data:") {
    raw.to_string()
  } else {
    format!("{JPEG_DATA_URI_PREFIX}{raw}")
  }
}

/// Validates a (repaired) payload: minimum length plus a base64-shaped body.
pub fn is_valid_payload(payload: &str) -> bool {
  if payload.len() <= MIN_PAYLOAD_LEN {
    return false;
  }
  let body = match payload.split_once("base64,") {
    Some((scheme, body)) if scheme.starts_with("data:") => body,
    _ => return false,
  };
  !body.is_empty()
    && body
      .bytes()
      .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}

/// Writable image fields. No validation happens here: the model tolerates
/// corrupt data on write and filters on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageInput {
  pub product_id: String,
  pub image_data: String,
  #[serde(default)]
  pub image_index: i64,
}
