// printshop_core/src/model/enquiry.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::str_or;
use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
  New,
  Contacted,
  Completed,
  Rejected,
}

impl EnquiryStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      EnquiryStatus::New => "new",
      EnquiryStatus::Contacted => "contacted",
      EnquiryStatus::Completed => "completed",
      EnquiryStatus::Rejected => "rejected",
    }
  }

  pub fn parse(raw: &str) -> Option<EnquiryStatus> {
    match raw {
      "new" => Some(EnquiryStatus::New),
      "contacted" => Some(EnquiryStatus::Contacted),
      "completed" => Some(EnquiryStatus::Completed),
      "rejected" => Some(EnquiryStatus::Rejected),
      _ => None,
    }
  }
}

/// Bulk-order enquiry: plain CRUD, no derived invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkOrderEnquiry {
  pub id: String,
  pub name: String,
  pub email: String,
  pub phone: String,
  /// Requested quantity band, e.g. "50-100".
  pub quantity_band: String,
  pub message: String,
  pub status: EnquiryStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl BulkOrderEnquiry {
  pub fn from_document(doc: &Document) -> BulkOrderEnquiry {
    let data = &doc.data;
    BulkOrderEnquiry {
      id: doc.id.clone(),
      name: str_or(data, "name", ""),
      email: str_or(data, "email", ""),
      phone: str_or(data, "phone", ""),
      quantity_band: str_or(data, "quantityBand", ""),
      message: str_or(data, "message", ""),
      status: data
        .get("status")
        .and_then(Value::as_str)
        .and_then(EnquiryStatus::parse)
        .unwrap_or(EnquiryStatus::New),
      created_at: doc.created_at,
      updated_at: doc.updated_at,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryInput {
  pub name: String,
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub quantity_band: String,
  #[serde(default)]
  pub message: String,
}
