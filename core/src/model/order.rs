// printshop_core/src/model/order.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{f64_or, opt_str, str_or};
use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }

  pub fn parse(raw: &str) -> Option<OrderStatus> {
    match raw {
      "pending" => Some(OrderStatus::Pending),
      "processing" => Some(OrderStatus::Processing),
      "shipped" => Some(OrderStatus::Shipped),
      "delivered" => Some(OrderStatus::Delivered),
      "cancelled" => Some(OrderStatus::Cancelled),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
  Refunded,
}

impl PaymentStatus {
  pub fn parse(raw: &str) -> Option<PaymentStatus> {
    match raw {
      "pending" => Some(PaymentStatus::Pending),
      "paid" => Some(PaymentStatus::Paid),
      "failed" => Some(PaymentStatus::Failed),
      "refunded" => Some(PaymentStatus::Refunded),
      _ => None,
    }
  }
}

/// Admin-driven status transition policy.
///
/// The reference behavior places no constraint on transitions (any status is
/// reachable from any other, for manual admin override flexibility). That
/// openness is deliberate but unproven, so it lives behind this one table:
/// substituting a constrained machine later touches no call sites.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
  /// `None` means every transition is allowed.
  allowed: Option<HashMap<OrderStatus, Vec<OrderStatus>>>,
}

impl TransitionTable {
  /// The open table: any status to any status.
  pub fn open() -> Self {
    TransitionTable { allowed: None }
  }

  /// A constrained table allowing only the listed transitions.
  pub fn constrained(allowed: HashMap<OrderStatus, Vec<OrderStatus>>) -> Self {
    TransitionTable {
      allowed: Some(allowed),
    }
  }

  pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
    match &self.allowed {
      None => true,
      Some(map) => map.get(&from).is_some_and(|targets| targets.contains(&to)),
    }
  }
}

/// A denormalized order line. `customizations` is kept as an opaque
/// pre-serialized string: the backing store rejects deeply nested structures
/// on write, so nesting is flattened before it ever reaches a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub product_id: String,
  pub name: String,
  pub price: f64,
  pub quantity: u32,
  #[serde(default)]
  pub image_url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub customizations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
  pub line1: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub line2: Option<String>,
  pub city: String,
  pub state: String,
  pub postal_code: String,
  #[serde(default)]
  pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
  pub id: String,
  pub user_id: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub items: Vec<OrderItem>,
  pub subtotal: f64,
  pub shipping_cost: f64,
  pub total: f64,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  pub shipping_address: Option<ShippingAddress>,
  pub tracking_url: Option<String>,
  pub tracking_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn from_document(doc: &Document) -> Order {
    let data = &doc.data;
    let items: Vec<OrderItem> = data
      .get("items")
      .cloned()
      .and_then(|v| serde_json::from_value(v).ok())
      .unwrap_or_default();
    let shipping_address = data
      .get("shippingAddress")
      .cloned()
      .and_then(|v| serde_json::from_value(v).ok());

    Order {
      id: doc.id.clone(),
      user_id: str_or(data, "userId", ""),
      customer_name: str_or(data, "customerName", ""),
      customer_email: str_or(data, "customerEmail", ""),
      customer_phone: str_or(data, "customerPhone", ""),
      items,
      subtotal: f64_or(data, "subtotal", 0.0),
      shipping_cost: f64_or(data, "shippingCost", 0.0),
      total: f64_or(data, "total", 0.0),
      status: data
        .get("status")
        .and_then(Value::as_str)
        .and_then(OrderStatus::parse)
        .unwrap_or(OrderStatus::Pending),
      payment_status: data
        .get("paymentStatus")
        .and_then(Value::as_str)
        .and_then(PaymentStatus::parse)
        .unwrap_or(PaymentStatus::Pending),
      shipping_address,
      tracking_url: opt_str(data, "trackingUrl"),
      tracking_number: opt_str(data, "trackingNumber"),
      created_at: doc.created_at,
      updated_at: doc.updated_at,
    }
  }
}

/// Checkout input. Subtotal and total are recomputed server-side; the
/// `total = subtotal + shipping_cost` invariant is enforced at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
  pub user_id: String,
  pub customer_name: String,
  pub customer_email: String,
  #[serde(default)]
  pub customer_phone: String,
  pub items: Vec<OrderItem>,
  #[serde(default)]
  pub shipping_cost: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub shipping_address: Option<ShippingAddress>,
}
