// printshop_core/src/store/memory.rs

//! In-process [`DocumentStore`] used by tests, seeding, and dev mode.
//!
//! Collections live in a `parking_lot::RwLock`-guarded map. Guards are never
//! held across an `.await`; every trait method copies what it needs out of
//! the lock before returning.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{Cursor, Document, DocumentStore, Query, QueryOrder, QueryPage};

#[derive(Default)]
pub struct MemoryStore {
  collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a fully-formed document, timestamps and all. Test and seed
  /// convenience; the trait's `insert` is the normal write path.
  pub fn put(&self, collection: &str, doc: Document) {
    let mut guard = self.collections.write();
    guard.entry(collection.to_string()).or_default().push(doc);
  }

  fn snapshot(&self, collection: &str) -> Vec<Document> {
    self
      .collections
      .read()
      .get(collection)
      .cloned()
      .unwrap_or_default()
  }
}

/// Keyset cursor for `CreatedAtDesc`: `"{rfc3339 created_at}|{id}"`.
/// Minted and parsed only here; opaque everywhere else.
fn encode_cursor(doc: &Document) -> Cursor {
  Cursor::new(format!("{}|{}", doc.created_at.to_rfc3339(), doc.id))
}

fn decode_cursor(cursor: &Cursor) -> StoreResult<(DateTime<Utc>, String)> {
  let (ts, id) = cursor
    .as_str()
    .split_once('|')
    .ok_or_else(|| StoreError::Validation("malformed continuation cursor".to_string()))?;
  let ts = DateTime::parse_from_rfc3339(ts)
    .map_err(|_| StoreError::Validation("malformed continuation cursor".to_string()))?
    .with_timezone(&Utc);
  Ok((ts, id.to_string()))
}

fn image_index(doc: &Document) -> i64 {
  doc
    .field("imageIndex")
    .and_then(Value::as_i64)
    .unwrap_or(0)
}

#[async_trait]
impl DocumentStore for MemoryStore {
  async fn query(&self, query: Query) -> StoreResult<QueryPage> {
    let mut docs = self.snapshot(query.collection);

    docs.retain(|doc| {
      query
        .filters
        .iter()
        .all(|(field, value)| doc.field(field) == Some(value))
    });

    match query.order {
      QueryOrder::CreatedAtDesc => {
        docs.sort_by(|a, b| {
          b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
        });
        if let Some(cursor) = &query.cursor {
          let (after_ts, after_id) = decode_cursor(cursor)?;
          docs.retain(|doc| {
            doc.created_at < after_ts || (doc.created_at == after_ts && doc.id < after_id)
          });
        }
      }
      QueryOrder::ImageIndexAsc => {
        // Image listings are always fetched whole; cursors are not minted
        // for this ordering and an incoming one is ignored.
        docs.sort_by(|a, b| image_index(a).cmp(&image_index(b)).then_with(|| a.id.cmp(&b.id)));
      }
    }

    let next_cursor = match query.limit {
      Some(limit) => {
        docs.truncate(limit);
        if query.order == QueryOrder::CreatedAtDesc && docs.len() == limit {
          docs.last().map(encode_cursor)
        } else {
          None
        }
      }
      None => None,
    };

    Ok(QueryPage { docs, next_cursor })
  }

  async fn get(&self, collection: &'static str, id: &str) -> StoreResult<Option<Document>> {
    Ok(
      self
        .snapshot(collection)
        .into_iter()
        .find(|doc| doc.id == id),
    )
  }

  async fn insert(&self, collection: &'static str, data: Value) -> StoreResult<Document> {
    let now = Utc::now();
    let doc = Document {
      id: Uuid::new_v4().to_string(),
      created_at: now,
      updated_at: now,
      data,
    };
    self.put(collection, doc.clone());
    Ok(doc)
  }

  async fn update(&self, collection: &'static str, id: &str, patch: Value) -> StoreResult<Document> {
    let patch = match patch {
      Value::Object(map) => map,
      other => {
        return Err(StoreError::PayloadShape(format!(
          "update patch must be a JSON object, got {other}"
        )))
      }
    };

    let mut guard = self.collections.write();
    let docs = guard.get_mut(collection).ok_or_else(|| StoreError::NotFound {
      collection: collection.to_string(),
      id: id.to_string(),
    })?;
    let doc = docs
      .iter_mut()
      .find(|doc| doc.id == id)
      .ok_or_else(|| StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
      })?;

    if let Value::Object(data) = &mut doc.data {
      for (key, value) in patch {
        data.insert(key, value);
      }
    } else {
      doc.data = Value::Object(patch);
    }
    doc.updated_at = Utc::now();
    Ok(doc.clone())
  }

  async fn delete(&self, collection: &'static str, id: &str) -> StoreResult<()> {
    let mut guard = self.collections.write();
    if let Some(docs) = guard.get_mut(collection) {
      docs.retain(|doc| doc.id != id);
    }
    Ok(())
  }

  async fn delete_where(&self, collection: &'static str, field: &str, value: Value) -> StoreResult<usize> {
    let mut guard = self.collections.write();
    let Some(docs) = guard.get_mut(collection) else {
      return Ok(0);
    };
    let before = docs.len();
    docs.retain(|doc| doc.field(field) != Some(&value));
    Ok(before - docs.len())
  }
}
