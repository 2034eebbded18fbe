// printshop_server/src/store_pg.rs

//! Postgres as a document store.
//!
//! Each collection is one table of `(id TEXT, created_at, updated_at,
//! data JSONB)` rows; equality filters compile to JSONB containment (`@>`)
//! and pagination is a `(created_at, id)` keyset encoded into the opaque
//! cursor. Runtime queries throughout (`sqlx::query_as` + `bind`), matching
//! how the rest of the service talks to the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use printshop::store::{collections, Cursor, Document, DocumentStore, Query, QueryOrder, QueryPage};
use printshop::{StoreError, StoreResult};
use serde_json::{json, Value};
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// Collection -> table mapping. Doubles as the whitelist that keeps
/// collection names out of SQL string interpolation.
fn table_for(collection: &str) -> StoreResult<&'static str> {
  match collection {
    collections::PRODUCTS => Ok("products"),
    collections::PRODUCT_IMAGES => Ok("product_images"),
    collections::ORDERS => Ok("orders"),
    collections::BULK_ORDER_ENQUIRIES => Ok("bulk_order_enquiries"),
    collections::USERS => Ok("users"),
    collections::ADMINS => Ok("admins"),
    other => Err(StoreError::Validation(format!("Unknown collection '{other}'."))),
  }
}

fn pg_err(e: sqlx::Error) -> StoreError {
  StoreError::Backend {
    source: anyhow::Error::new(e),
  }
}

// Keyset cursor, same shape as the in-memory backend's but minted
// independently: cursors are only ever valid against the backend (and query
// shape) that produced them.
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

#[derive(sqlx::FromRow)]
struct DocRow {
  id: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  data: Value,
}

impl From<DocRow> for Document {
  fn from(row: DocRow) -> Document {
    Document {
      id: row.id,
      created_at: row.created_at,
      updated_at: row.updated_at,
      data: row.data,
    }
  }
}

pub struct PgDocumentStore {
  pool: PgPool,
}

impl PgDocumentStore {
  pub fn new(pool: PgPool) -> Self {
    PgDocumentStore { pool }
  }

  /// Creates the per-collection tables and keyset indexes if absent.
  pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    const TABLES: &[&str] = &[
      "products",
      "product_images",
      "orders",
      "bulk_order_enquiries",
      "users",
      "admins",
    ];
    for table in TABLES {
      sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
           id TEXT PRIMARY KEY, \
           created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
           updated_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
           data JSONB NOT NULL DEFAULT '{{}}'::jsonb)"
      ))
      .execute(pool)
      .await
      .map_err(pg_err)?;
      sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS {table}_created_idx ON {table} (created_at DESC, id DESC)"
      ))
      .execute(pool)
      .await
      .map_err(pg_err)?;
    }
    tracing::info!("Document store schema ensured.");
    Ok(())
  }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
  async fn query(&self, query: Query) -> StoreResult<QueryPage> {
    let table = table_for(query.collection)?;
    let filter_obj = Value::Object(query.filters.iter().cloned().collect());

    let mut sql = format!("SELECT id, created_at, updated_at, data FROM {table} WHERE data @> $1");
    let mut next_param = 2;

    // Cursors are only minted for the created-at ordering; an incoming one
    // is ignored for image listings, which are always fetched whole.
    let keyset = match (&query.cursor, query.order) {
      (Some(cursor), QueryOrder::CreatedAtDesc) => {
        let decoded = decode_cursor(cursor)?;
        sql.push_str(&format!(" AND (created_at, id) < (${}, ${})", next_param, next_param + 1));
        next_param += 2;
        Some(decoded)
      }
      _ => None,
    };

    sql.push_str(match query.order {
      QueryOrder::CreatedAtDesc => " ORDER BY created_at DESC, id DESC",
      QueryOrder::ImageIndexAsc => " ORDER BY COALESCE((data->>'imageIndex')::bigint, 0) ASC, id ASC",
    });

    let limit = query.limit.map(|n| n as i64);
    if limit.is_some() {
      sql.push_str(&format!(" LIMIT ${next_param}"));
    }

    let mut db_query = sqlx::query_as::<_, DocRow>(&sql).bind(filter_obj);
    if let Some((ts, id)) = keyset {
      db_query = db_query.bind(ts).bind(id);
    }
    if let Some(limit) = limit {
      db_query = db_query.bind(limit);
    }

    let docs: Vec<Document> = db_query
      .fetch_all(&self.pool)
      .await
      .map_err(pg_err)?
      .into_iter()
      .map(Document::from)
      .collect();

    let next_cursor = match (query.limit, query.order) {
      (Some(limit), QueryOrder::CreatedAtDesc) if docs.len() == limit => docs.last().map(encode_cursor),
      _ => None,
    };
    Ok(QueryPage { docs, next_cursor })
  }

  async fn get(&self, collection: &'static str, id: &str) -> StoreResult<Option<Document>> {
    let table = table_for(collection)?;
    let row: Option<DocRow> =
      sqlx::query_as(&format!("SELECT id, created_at, updated_at, data FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;
    Ok(row.map(Document::from))
  }

  async fn insert(&self, collection: &'static str, data: Value) -> StoreResult<Document> {
    let table = table_for(collection)?;
    let id = Uuid::new_v4().to_string();
    let row: DocRow = sqlx::query_as(&format!(
      "INSERT INTO {table} (id, data) VALUES ($1, $2) RETURNING id, created_at, updated_at, data"
    ))
    .bind(&id)
    .bind(data)
    .fetch_one(&self.pool)
    .await
    .map_err(pg_err)?;
    Ok(row.into())
  }

  async fn update(&self, collection: &'static str, id: &str, patch: Value) -> StoreResult<Document> {
    let table = table_for(collection)?;
    if !patch.is_object() {
      return Err(StoreError::PayloadShape(format!(
        "update patch must be a JSON object, got {patch}"
      )));
    }
    let row: Option<DocRow> = sqlx::query_as(&format!(
      "UPDATE {table} SET data = data || $2, updated_at = now() \
       WHERE id = $1 RETURNING id, created_at, updated_at, data"
    ))
    .bind(id)
    .bind(patch)
    .fetch_optional(&self.pool)
    .await
    .map_err(pg_err)?;
    row.map(Document::from).ok_or_else(|| StoreError::NotFound {
      collection: collection.to_string(),
      id: id.to_string(),
    })
  }

  async fn delete(&self, collection: &'static str, id: &str) -> StoreResult<()> {
    let table = table_for(collection)?;
    sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(pg_err)?;
    Ok(())
  }

  async fn delete_where(&self, collection: &'static str, field: &str, value: Value) -> StoreResult<usize> {
    let table = table_for(collection)?;
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE data @> $1"))
      .bind(json!({ field: value }))
      .execute(&self.pool)
      .await
      .map_err(pg_err)?;
    Ok(result.rows_affected() as usize)
  }
}
