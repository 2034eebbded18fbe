// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::collections::HashSet;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use printshop::store::{collections, Document, DocumentStore, Query, QueryPage};
use printshop::{Category, Clock, MemoryStore, Product, StoreError, StoreResult};
use serde_json::{json, Value};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---

/// A fully-formed product snapshot for reducer/policy tests.
pub fn product(id: &str, price: f64, category: Category) -> Product {
  let now = Utc::now();
  Product {
    id: id.to_string(),
    name: format!("Product {id}"),
    description: String::new(),
    price,
    original_price: None,
    is_multi_size: false,
    size_prices: Vec::new(),
    category,
    subcategory: None,
    size: None,
    theme: None,
    in_stock: true,
    featured: false,
    hidden: false,
    ratings: 0.0,
    review_count: 0,
    created_at: now,
    updated_at: now,
  }
}

pub fn sized_product(id: &str, price: f64, category: Category, size: &str) -> Product {
  Product {
    size: Some(size.to_string()),
    ..product(id, price, category)
  }
}

/// Deterministic timestamp: `t(n)` is n seconds past a fixed epoch, so tests
/// can spell out creation order explicitly.
pub fn t(seconds: i64) -> DateTime<Utc> {
  Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// Raw product document with an explicit id and creation time.
pub fn product_doc(id: &str, created_at: DateTime<Utc>, data: Value) -> Document {
  Document {
    id: id.to_string(),
    created_at,
    updated_at: created_at,
    data,
  }
}

/// A plausibly-sized base64 body (longer than the validity threshold).
pub fn long_base64() -> String {
  "iVBORw0KGgoAAAANSUhEUg".repeat(8)
}

/// Seeds one valid image document for a product.
pub fn image_doc(id: &str, product_id: &str, index: i64) -> Document {
  product_doc(
    id,
    t(index),
    json!({
      "productId": product_id,
      "imageData": format!("data:image/jpeg;base64,{}", long_base64()),
      "imageIndex": index,
    }),
  )
}

// --- Instrumented store wrapper ---

/// Delegates to a `MemoryStore` while counting backend calls and optionally
/// injecting failures, so cache tests can assert exactly when the backend
/// was touched and how failures degrade.
pub struct CountingStore {
  pub inner: MemoryStore,
  pub query_calls: AtomicUsize,
  pub image_query_calls: AtomicUsize,
  /// Collections whose queries/gets fail with `Unavailable`.
  pub fail_collections: Mutex<HashSet<&'static str>>,
  /// Product ids whose image queries fail with `Unavailable`.
  pub fail_image_product_ids: Mutex<HashSet<String>>,
}

impl CountingStore {
  pub fn new(inner: MemoryStore) -> Self {
    CountingStore {
      inner,
      query_calls: AtomicUsize::new(0),
      image_query_calls: AtomicUsize::new(0),
      fail_collections: Mutex::new(HashSet::new()),
      fail_image_product_ids: Mutex::new(HashSet::new()),
    }
  }

  pub fn queries(&self) -> usize {
    self.query_calls.load(Ordering::SeqCst)
  }

  pub fn image_queries(&self) -> usize {
    self.image_query_calls.load(Ordering::SeqCst)
  }

  pub fn fail_collection(&self, collection: &'static str) {
    self.fail_collections.lock().insert(collection);
  }

  pub fn fail_images_for(&self, product_id: &str) {
    self.fail_image_product_ids.lock().insert(product_id.to_string());
  }

  fn check_failure(&self, query: &Query) -> StoreResult<()> {
    if self.fail_collections.lock().contains(query.collection) {
      return Err(StoreError::Unavailable(format!(
        "injected failure for collection {}",
        query.collection
      )));
    }
    if query.collection == collections::PRODUCT_IMAGES {
      let failing = self.fail_image_product_ids.lock();
      let targeted = query.filters.iter().any(|(field, value)| {
        field == "productId" && value.as_str().is_some_and(|id| failing.contains(id))
      });
      if targeted {
        return Err(StoreError::Unavailable("injected image fetch failure".to_string()));
      }
    }
    Ok(())
  }
}

#[async_trait]
impl DocumentStore for CountingStore {
  async fn query(&self, query: Query) -> StoreResult<QueryPage> {
    self.query_calls.fetch_add(1, Ordering::SeqCst);
    if query.collection == collections::PRODUCT_IMAGES {
      self.image_query_calls.fetch_add(1, Ordering::SeqCst);
    }
    self.check_failure(&query)?;
    self.inner.query(query).await
  }

  async fn get(&self, collection: &'static str, id: &str) -> StoreResult<Option<Document>> {
    if self.fail_collections.lock().contains(collection) {
      return Err(StoreError::Unavailable(format!(
        "injected failure for collection {collection}"
      )));
    }
    self.inner.get(collection, id).await
  }

  async fn insert(&self, collection: &'static str, data: Value) -> StoreResult<Document> {
    self.inner.insert(collection, data).await
  }

  async fn update(&self, collection: &'static str, id: &str, patch: Value) -> StoreResult<Document> {
    self.inner.update(collection, id, patch).await
  }

  async fn delete(&self, collection: &'static str, id: &str) -> StoreResult<()> {
    self.inner.delete(collection, id).await
  }

  async fn delete_where(&self, collection: &'static str, field: &str, value: Value) -> StoreResult<usize> {
    self.inner.delete_where(collection, field, value).await
  }
}

// --- Manual clock for TTL tests ---

pub struct ManualClock {
  now: Mutex<Instant>,
}

impl ManualClock {
  pub fn new() -> Arc<Self> {
    Arc::new(ManualClock {
      now: Mutex::new(Instant::now()),
    })
  }

  pub fn advance(&self, by: Duration) {
    let mut guard = self.now.lock();
    *guard += by;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Instant {
    *self.now.lock()
  }
}
