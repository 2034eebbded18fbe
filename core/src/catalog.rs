// printshop_core/src/catalog.rs

//! The data-access layer: domain queries translated into store queries, with
//! results normalized into typed entities.
//!
//! Error policy (deliberate, per the storefront's degrade-don't-crash rule):
//! read paths swallow store failures and return empty collections or `None`,
//! logging a warning, so catalog screens render "no products found" instead
//! of an error page. Mutations propagate [`StoreError`] to the caller.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::{
  BulkOrderEnquiry, Category, EnquiryInput, EnquiryStatus, Order, OrderInput, OrderStatus,
  Product, ProductImage, ProductImageInput, ProductInput, TransitionTable,
};
use crate::sanitize::sanitize_for_store;
use crate::store::{collections, Cursor, DocumentStore, Query, QueryOrder};

/// Upper bound on the working set fetched for client-side search. The backing
/// store has no full-text index; documents beyond this bound are silently
/// excluded. Known scalability ceiling, not a bug to fix at this layer.
pub const SEARCH_SCAN_LIMIT: usize = 200;

/// One page of normalized products plus the backend's continuation cursor.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
  pub products: Vec<Product>,
  pub next_cursor: Option<Cursor>,
}

pub struct Catalog {
  store: Arc<dyn DocumentStore>,
}

impl Catalog {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Catalog { store }
  }

  // --- Product reads (swallow failures) ---

  /// Full listing ordered by creation time descending, hidden products
  /// included. This is the unpaginated fallback used by back-office screens;
  /// storefront hot paths go through the cache layer's paginated variants.
  pub async fn list_products(&self, category: Option<Category>) -> Vec<Product> {
    let mut query = Query::new(collections::PRODUCTS);
    if let Some(category) = category {
      query = query.filter("category", category.as_str());
    }
    match self.store.query(query).await {
      Ok(page) => page.docs.iter().map(Product::from_document).collect(),
      Err(e) => {
        warn!(error = %e, "Product listing failed; returning empty catalog.");
        Vec::new()
      }
    }
  }

  /// One storefront page, newest first. Hidden products are dropped after
  /// normalization (legacy documents predate the `hidden` field, so the
  /// filter cannot be pushed to the backend as an equality match).
  pub async fn products_page(
    &self,
    category: Option<Category>,
    page_size: usize,
    cursor: Option<Cursor>,
  ) -> ProductPage {
    let mut query = Query::new(collections::PRODUCTS).limit(page_size).cursor(cursor);
    if let Some(category) = category {
      query = query.filter("category", category.as_str());
    }
    match self.store.query(query).await {
      Ok(page) => ProductPage {
        products: page
          .docs
          .iter()
          .map(Product::from_document)
          .filter(|p| !p.hidden)
          .collect(),
        next_cursor: page.next_cursor,
      },
      Err(e) => {
        warn!(error = %e, "Paginated product fetch failed; returning empty page.");
        ProductPage::default()
      }
    }
  }

  /// Featured subset, filtered server-side on the boolean flag.
  pub async fn featured_page(&self, limit: usize) -> Vec<Product> {
    let query = Query::new(collections::PRODUCTS)
      .filter("featured", true)
      .limit(limit);
    match self.store.query(query).await {
      Ok(page) => page
        .docs
        .iter()
        .map(Product::from_document)
        .filter(|p| !p.hidden)
        .collect(),
      Err(e) => {
        warn!(error = %e, "Featured fetch failed; returning empty set.");
        Vec::new()
      }
    }
  }

  /// Single product fetch. A missing id is `None`, never an error.
  pub async fn get_product(&self, id: &str) -> Option<Product> {
    match self.store.get(collections::PRODUCTS, id).await {
      Ok(doc) => doc.as_ref().map(Product::from_document),
      Err(e) => {
        warn!(product_id = %id, error = %e, "Product fetch failed.");
        None
      }
    }
  }

  /// Case-insensitive substring search over name/description/category/
  /// subcategory/theme, correct only up to [`SEARCH_SCAN_LIMIT`] documents.
  pub async fn search_products(&self, term: &str) -> Vec<Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
      return Vec::new();
    }
    let query = Query::new(collections::PRODUCTS).limit(SEARCH_SCAN_LIMIT);
    match self.store.query(query).await {
      Ok(page) => page
        .docs
        .iter()
        .map(Product::from_document)
        .filter(|p| !p.hidden && p.matches_search(&needle))
        .collect(),
      Err(e) => {
        warn!(error = %e, "Search fetch failed; returning no matches.");
        Vec::new()
      }
    }
  }

  /// Ordered, repaired, validated image list for one product. Malformed
  /// payloads are dropped here, not surfaced.
  pub async fn images_for_product(&self, product_id: &str) -> Vec<ProductImage> {
    let query = Query::new(collections::PRODUCT_IMAGES)
      .filter("productId", product_id)
      .order(QueryOrder::ImageIndexAsc);
    match self.store.query(query).await {
      Ok(page) => page.docs.iter().filter_map(ProductImage::from_document).collect(),
      Err(e) => {
        warn!(product_id = %product_id, error = %e, "Image fetch failed; returning empty gallery.");
        Vec::new()
      }
    }
  }

  // --- Product mutations (propagate failures) ---

  pub async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
    if input.name.trim().is_empty() {
      return Err(StoreError::Validation("Product name is required.".to_string()));
    }
    if input.is_multi_size && input.size_prices.is_empty() {
      return Err(StoreError::Validation(
        "A multi-size product needs at least one size/price entry.".to_string(),
      ));
    }
    let payload = sanitize_for_store(&serde_json::to_value(&input)?);
    let doc = self.store.insert(collections::PRODUCTS, payload).await?;
    info!(product_id = %doc.id, "Product created.");
    Ok(Product::from_document(&doc))
  }

  pub async fn update_product(&self, id: &str, patch: Value) -> StoreResult<Product> {
    let patch = sanitize_for_store(&patch);
    let doc = self.store.update(collections::PRODUCTS, id, patch).await?;
    Ok(Product::from_document(&doc))
  }

  pub async fn delete_product(&self, id: &str) -> StoreResult<()> {
    self.clear_product_images(id).await?;
    self.store.delete(collections::PRODUCTS, id).await?;
    info!(product_id = %id, "Product deleted.");
    Ok(())
  }

  // --- Image mutations ---

  /// Stores an image document as uploaded. No payload validation happens on
  /// write; reads filter defensively instead.
  pub async fn add_product_image(&self, input: ProductImageInput) -> StoreResult<String> {
    let payload = serde_json::to_value(&input)?;
    let doc = self.store.insert(collections::PRODUCT_IMAGES, payload).await?;
    Ok(doc.id)
  }

  pub async fn reorder_product_image(&self, image_id: &str, new_index: i64) -> StoreResult<()> {
    self
      .store
      .update(collections::PRODUCT_IMAGES, image_id, json!({ "imageIndex": new_index }))
      .await?;
    Ok(())
  }

  pub async fn delete_product_image(&self, image_id: &str) -> StoreResult<()> {
    self.store.delete(collections::PRODUCT_IMAGES, image_id).await
  }

  /// Cascade-deletes every image owned by the product.
  pub async fn clear_product_images(&self, product_id: &str) -> StoreResult<usize> {
    self
      .store
      .delete_where(collections::PRODUCT_IMAGES, "productId", Value::from(product_id))
      .await
  }

  // --- Orders ---

  /// Creates an order at checkout: status starts at `Pending` and the
  /// `total = subtotal + shipping_cost` invariant is established here, from
  /// the line items, not trusted from the client.
  pub async fn create_order(&self, input: OrderInput) -> StoreResult<Order> {
    if input.items.is_empty() {
      return Err(StoreError::Validation("An order needs at least one item.".to_string()));
    }
    let subtotal: f64 = input
      .items
      .iter()
      .map(|item| item.price * f64::from(item.quantity))
      .sum();
    let total = subtotal + input.shipping_cost;

    let mut payload = serde_json::to_value(&input)?;
    if let Value::Object(map) = &mut payload {
      map.insert("subtotal".to_string(), json!(subtotal));
      map.insert("total".to_string(), json!(total));
      map.insert("status".to_string(), json!(OrderStatus::Pending.as_str()));
      map.insert("paymentStatus".to_string(), json!("pending"));
    }
    let payload = sanitize_for_store(&payload);
    let doc = self.store.insert(collections::ORDERS, payload).await?;
    info!(order_id = %doc.id, total, "Order created.");
    Ok(Order::from_document(&doc))
  }

  pub async fn get_order(&self, id: &str) -> Option<Order> {
    match self.store.get(collections::ORDERS, id).await {
      Ok(doc) => doc.as_ref().map(Order::from_document),
      Err(e) => {
        warn!(order_id = %id, error = %e, "Order fetch failed.");
        None
      }
    }
  }

  pub async fn orders_for_user(&self, user_id: &str) -> Vec<Order> {
    let query = Query::new(collections::ORDERS).filter("userId", user_id);
    match self.store.query(query).await {
      Ok(page) => page.docs.iter().map(Order::from_document).collect(),
      Err(e) => {
        warn!(user_id = %user_id, error = %e, "User order listing failed.");
        Vec::new()
      }
    }
  }

  pub async fn list_orders(&self) -> Vec<Order> {
    match self.store.query(Query::new(collections::ORDERS)).await {
      Ok(page) => page.docs.iter().map(Order::from_document).collect(),
      Err(e) => {
        warn!(error = %e, "Order listing failed.");
        Vec::new()
      }
    }
  }

  /// Admin-driven status change, checked against the supplied transition
  /// table (open by default; see [`TransitionTable`]).
  pub async fn update_order_status(
    &self,
    id: &str,
    to: OrderStatus,
    table: &TransitionTable,
  ) -> StoreResult<Order> {
    let doc = self
      .store
      .get(collections::ORDERS, id)
      .await?
      .ok_or_else(|| StoreError::NotFound {
        collection: collections::ORDERS.to_string(),
        id: id.to_string(),
      })?;
    let current = Order::from_document(&doc).status;
    if !table.allows(current, to) {
      return Err(StoreError::Validation(format!(
        "Order status change {} -> {} is not allowed.",
        current.as_str(),
        to.as_str()
      )));
    }
    let doc = self
      .store
      .update(collections::ORDERS, id, json!({ "status": to.as_str() }))
      .await?;
    info!(order_id = %id, from = current.as_str(), to = to.as_str(), "Order status updated.");
    Ok(Order::from_document(&doc))
  }

  pub async fn update_delivery_info(
    &self,
    id: &str,
    tracking_url: Option<String>,
    tracking_number: Option<String>,
  ) -> StoreResult<Order> {
    let mut patch = serde_json::Map::new();
    if let Some(url) = tracking_url {
      patch.insert("trackingUrl".to_string(), json!(url));
    }
    if let Some(number) = tracking_number {
      patch.insert("trackingNumber".to_string(), json!(number));
    }
    if patch.is_empty() {
      return Err(StoreError::Validation("Nothing to update.".to_string()));
    }
    let doc = self
      .store
      .update(collections::ORDERS, id, Value::Object(patch))
      .await?;
    Ok(Order::from_document(&doc))
  }

  // --- Bulk order enquiries ---

  pub async fn create_enquiry(&self, input: EnquiryInput) -> StoreResult<BulkOrderEnquiry> {
    if input.email.trim().is_empty() {
      return Err(StoreError::Validation("An enquiry needs a contact email.".to_string()));
    }
    let mut payload = serde_json::to_value(&input)?;
    if let Value::Object(map) = &mut payload {
      map.insert("status".to_string(), json!(EnquiryStatus::New.as_str()));
    }
    let doc = self.store.insert(collections::BULK_ORDER_ENQUIRIES, payload).await?;
    Ok(BulkOrderEnquiry::from_document(&doc))
  }

  pub async fn list_enquiries(&self) -> Vec<BulkOrderEnquiry> {
    match self.store.query(Query::new(collections::BULK_ORDER_ENQUIRIES)).await {
      Ok(page) => page.docs.iter().map(BulkOrderEnquiry::from_document).collect(),
      Err(e) => {
        warn!(error = %e, "Enquiry listing failed.");
        Vec::new()
      }
    }
  }

  pub async fn update_enquiry_status(
    &self,
    id: &str,
    status: EnquiryStatus,
  ) -> StoreResult<BulkOrderEnquiry> {
    let doc = self
      .store
      .update(
        collections::BULK_ORDER_ENQUIRIES,
        id,
        json!({ "status": status.as_str() }),
      )
      .await?;
    Ok(BulkOrderEnquiry::from_document(&doc))
  }
}
