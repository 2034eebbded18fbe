// printshop_core/src/model/mod.rs

//! Typed storefront entities and their defensive normalizers.
//!
//! Every entity is produced from a raw [`crate::store::Document`] by a
//! `from_document` constructor that substitutes a safe default for any
//! missing or mistyped field. Downstream code never sees a half-formed
//! record; corrupt documents degrade field-by-field, they don't crash pages.

pub mod enquiry;
pub mod image;
pub mod order;
pub mod product;

pub use enquiry::{BulkOrderEnquiry, EnquiryInput, EnquiryStatus};
pub use image::{ProductImage, ProductImageInput};
pub use order::{
  Order, OrderInput, OrderItem, OrderStatus, PaymentStatus, ShippingAddress, TransitionTable,
};
pub use product::{Category, Product, ProductInput, SizePrice};

use serde_json::Value;

// Shared fallback readers over the raw JSON payload. Field names follow the
// store's camelCase convention.

pub(crate) fn str_or(data: &Value, field: &str, default: &str) -> String {
  data
    .get(field)
    .and_then(Value::as_str)
    .unwrap_or(default)
    .to_string()
}

pub(crate) fn opt_str(data: &Value, field: &str) -> Option<String> {
  data
    .get(field)
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

pub(crate) fn f64_or(data: &Value, field: &str, default: f64) -> f64 {
  data.get(field).and_then(Value::as_f64).unwrap_or(default)
}

pub(crate) fn opt_f64(data: &Value, field: &str) -> Option<f64> {
  data.get(field).and_then(Value::as_f64)
}

pub(crate) fn bool_or(data: &Value, field: &str, default: bool) -> bool {
  data.get(field).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn u32_or(data: &Value, field: &str, default: u32) -> u32 {
  data
    .get(field)
    .and_then(Value::as_u64)
    .map(|n| n.min(u32::MAX as u64) as u32)
    .unwrap_or(default)
}
