// printshop_core/src/store/mod.rs

//! The seam between the storefront and its hosted document database.
//!
//! The backing store is an external collaborator: a collection-of-records
//! backend reachable only over the network, queried with equality filters,
//! a fixed ordering, a page limit, and an opaque continuation cursor. This
//! module models exactly that surface and nothing more, so the rest of the
//! crate never depends on which backend is actually wired in.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreResult;

/// Collection names used by the storefront.
pub mod collections {
  pub const PRODUCTS: &str = "products";
  pub const PRODUCT_IMAGES: &str = "productImages";
  pub const ORDERS: &str = "orders";
  pub const BULK_ORDER_ENQUIRIES: &str = "bulkOrderEnquiries";
  pub const USERS: &str = "users";
  pub const ADMINS: &str = "admins";
}

/// A raw record as the backing store hands it back: an id, the two
/// store-managed timestamps, and an untyped JSON payload. Typed entities are
/// produced from this by the `model` normalizers, never by direct access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub id: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub data: Value,
}

impl Document {
  /// Field accessor on the JSON payload. `None` for missing fields; the
  /// normalizers layer their own fallbacks on top.
  pub fn field(&self, name: &str) -> Option<&Value> {
    self.data.get(name)
  }
}

/// Opaque continuation token minted by a store backend.
///
/// Callers must treat the inner string as meaningless; only the backend that
/// produced a cursor may interpret it, and only for the query shape it was
/// minted from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
  pub fn new(raw: impl Into<String>) -> Self {
    Cursor(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Orderings the storefront actually uses (spec'd by the backing store's
/// index support, not by what would be nice to have).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrder {
  /// Newest first, tie-broken by id. The hot path for every listing screen.
  CreatedAtDesc,
  /// Ascending `imageIndex` payload field; used only for per-product images.
  ImageIndexAsc,
}

/// A store query: one collection, equality filters only, one ordering,
/// an optional page limit and an optional continuation cursor.
#[derive(Debug, Clone)]
pub struct Query {
  pub collection: &'static str,
  pub filters: Vec<(String, Value)>,
  pub order: QueryOrder,
  pub limit: Option<usize>,
  pub cursor: Option<Cursor>,
}

impl Query {
  pub fn new(collection: &'static str) -> Self {
    Query {
      collection,
      filters: Vec::new(),
      order: QueryOrder::CreatedAtDesc,
      limit: None,
      cursor: None,
    }
  }

  pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
    self.filters.push((field.to_string(), value.into()));
    self
  }

  pub fn order(mut self, order: QueryOrder) -> Self {
    self.order = order;
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn cursor(mut self, cursor: Option<Cursor>) -> Self {
    self.cursor = cursor;
    self
  }
}

/// One page of query results. `next_cursor` is present iff the backend
/// believes a further page likely exists (heuristically: this page was full).
#[derive(Debug, Clone)]
pub struct QueryPage {
  pub docs: Vec<Document>,
  pub next_cursor: Option<Cursor>,
}

/// The async store seam. Implementations: [`memory::MemoryStore`] in this
/// crate (tests, seeding, dev mode) and the Postgres-backed document store in
/// the server crate.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Runs a filtered, ordered, limited query.
  async fn query(&self, query: Query) -> StoreResult<QueryPage>;

  /// Fetches a single document. `Ok(None)` for a missing id; this is not an
  /// error at the store layer.
  async fn get(&self, collection: &'static str, id: &str) -> StoreResult<Option<Document>>;

  /// Inserts a new document with a fresh id and store-managed timestamps.
  async fn insert(&self, collection: &'static str, data: Value) -> StoreResult<Document>;

  /// Shallow-merges the fields of `patch` (a JSON object) into an existing
  /// document's payload and bumps `updated_at`.
  async fn update(&self, collection: &'static str, id: &str, patch: Value) -> StoreResult<Document>;

  /// Deletes a single document. Deleting a missing id is a no-op.
  async fn delete(&self, collection: &'static str, id: &str) -> StoreResult<()>;

  /// Deletes every document whose `field` equals `value`; returns the count.
  /// Used for cascades (clearing a product's images).
  async fn delete_where(&self, collection: &'static str, field: &str, value: Value) -> StoreResult<usize>;
}
