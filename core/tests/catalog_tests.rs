// tests/catalog_tests.rs
mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::*;
use printshop::model::{OrderInput, OrderItem, ProductInput, SizePrice};
use printshop::store::collections;
use printshop::{
  Catalog, Category, DocumentStore, EnquiryStatus, MemoryStore, OrderStatus, StoreError,
  TransitionTable,
};
use serde_json::json;

fn catalog_over(seed: impl FnOnce(&MemoryStore)) -> (Arc<CountingStore>, Catalog) {
  setup_tracing();
  let inner = MemoryStore::new();
  seed(&inner);
  let store = Arc::new(CountingStore::new(inner));
  let catalog = Catalog::new(store.clone());
  (store, catalog)
}

fn order_input(items: Vec<OrderItem>, shipping_cost: f64) -> OrderInput {
  OrderInput {
    user_id: "u1".to_string(),
    customer_name: "Asha".to_string(),
    customer_email: "asha@example.com".to_string(),
    customer_phone: String::new(),
    items,
    shipping_cost,
    shipping_address: None,
  }
}

fn item(product_id: &str, price: f64, quantity: u32) -> OrderItem {
  OrderItem {
    product_id: product_id.to_string(),
    name: format!("Item {product_id}"),
    price,
    quantity,
    image_url: String::new(),
    customizations: None,
  }
}

// --- Normalization ---

#[tokio::test]
async fn missing_fields_normalize_to_safe_defaults() {
  let (_, catalog) = catalog_over(|store| {
    store.put(collections::PRODUCTS, product_doc("bare", t(0), json!({})));
  });

  let product = catalog.get_product("bare").await.unwrap();
  assert_eq!(product.name, "Untitled");
  assert_eq!(product.price, 0.0);
  assert_eq!(product.category, Category::Poster);
  assert!(product.in_stock);
  assert!(!product.hidden);
  assert!(!product.is_multi_size);
  assert_eq!(product.review_count, 0);
}

#[tokio::test]
async fn unknown_category_falls_back_to_poster() {
  let (_, catalog) = catalog_over(|store| {
    store.put(
      collections::PRODUCTS,
      product_doc("odd", t(0), json!({ "name": "Odd", "category": "mug" })),
    );
  });

  let product = catalog.get_product("odd").await.unwrap();
  assert_eq!(product.category, Category::Poster);
}

#[tokio::test]
async fn missing_product_is_none_not_an_error() {
  let (_, catalog) = catalog_over(|_| {});
  assert!(catalog.get_product("nope").await.is_none());
}

// --- Read degradation ---

#[tokio::test]
async fn read_failures_degrade_to_empty_collections() {
  let (store, catalog) = catalog_over(|store| {
    store.put(collections::PRODUCTS, product_doc("p1", t(0), json!({ "name": "P1" })));
  });
  store.fail_collection(collections::PRODUCTS);

  assert!(catalog.list_products(None).await.is_empty());
  assert!(catalog.products_page(None, 12, None).await.products.is_empty());
  assert!(catalog.search_products("p1").await.is_empty());
  assert!(catalog.get_product("p1").await.is_none());
}

// --- Pagination & listing ---

#[tokio::test]
async fn pages_are_newest_first_and_walk_without_overlap() {
  let (_, catalog) = catalog_over(|store| {
    for i in 0..5 {
      store.put(
        collections::PRODUCTS,
        product_doc(&format!("p{i}"), t(i), json!({ "name": format!("P{i}"), "category": "poster" })),
      );
    }
  });

  let page1 = catalog.products_page(None, 3, None).await;
  let ids1: Vec<&str> = page1.products.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids1, vec!["p4", "p3", "p2"]);
  assert!(page1.next_cursor.is_some());

  let page2 = catalog.products_page(None, 3, page1.next_cursor).await;
  let ids2: Vec<&str> = page2.products.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids2, vec!["p1", "p0"]);
  assert!(page2.next_cursor.is_none());
}

#[tokio::test]
async fn hidden_products_are_dropped_from_storefront_reads_but_not_admin_listing() {
  let (_, catalog) = catalog_over(|store| {
    store.put(
      collections::PRODUCTS,
      product_doc("vis", t(1), json!({ "name": "Visible", "category": "poster" })),
    );
    store.put(
      collections::PRODUCTS,
      product_doc("hid", t(2), json!({ "name": "Hidden", "category": "poster", "hidden": true })),
    );
  });

  let page = catalog.products_page(Some(Category::Poster), 12, None).await;
  assert_eq!(page.products.len(), 1);
  assert_eq!(page.products[0].id, "vis");

  // Back-office listing still sees the soft-hidden product.
  assert_eq!(catalog.list_products(Some(Category::Poster)).await.len(), 2);
}

// --- Search ---

#[tokio::test]
async fn search_matches_substrings_case_insensitively_across_text_fields() {
  let (_, catalog) = catalog_over(|store| {
    store.put(
      collections::PRODUCTS,
      product_doc("p1", t(1), json!({ "name": "Midnight City", "category": "poster" })),
    );
    store.put(
      collections::PRODUCTS,
      product_doc("p2", t(2), json!({ "name": "Lake", "theme": "midnight blue", "category": "polaroid" })),
    );
    store.put(
      collections::PRODUCTS,
      product_doc("p3", t(3), json!({ "name": "Sunrise", "category": "poster" })),
    );
  });

  let hits = catalog.search_products("MIDNIGHT").await;
  let mut ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
  ids.sort();
  assert_eq!(ids, vec!["p1", "p2"]);

  assert!(catalog.search_products("   ").await.is_empty());
}

// --- Product mutations ---

#[tokio::test]
async fn multi_size_products_require_a_price_list() {
  let (_, catalog) = catalog_over(|_| {});

  let bad = ProductInput {
    name: "Skyline".to_string(),
    price: 79.0,
    is_multi_size: true,
    ..ProductInput::default()
  };
  assert!(matches!(
    catalog.create_product(bad).await,
    Err(StoreError::Validation(_))
  ));

  let good = ProductInput {
    name: "Skyline".to_string(),
    price: 79.0,
    is_multi_size: true,
    size_prices: vec![SizePrice {
      size: "A4".to_string(),
      price: 79.0,
      original_price: Some(99.0),
    }],
    ..ProductInput::default()
  };
  let created = catalog.create_product(good).await.unwrap();
  assert!(created.is_multi_size);
  assert_eq!(created.size_prices.len(), 1);
}

#[tokio::test]
async fn deleting_a_product_cascades_to_its_images() {
  let (store, catalog) = catalog_over(|store| {
    store.put(collections::PRODUCTS, product_doc("p1", t(0), json!({ "name": "P1" })));
    store.put(collections::PRODUCT_IMAGES, image_doc("i1", "p1", 0));
    store.put(collections::PRODUCT_IMAGES, image_doc("i2", "p1", 1));
    store.put(collections::PRODUCT_IMAGES, image_doc("i3", "other", 0));
  });

  catalog.delete_product("p1").await.unwrap();
  assert!(catalog.get_product("p1").await.is_none());
  assert!(catalog.images_for_product("p1").await.is_empty());

  // The unrelated product's gallery survives.
  let other = store.inner.get(collections::PRODUCT_IMAGES, "i3").await.unwrap();
  assert!(other.is_some());
}

// --- Orders ---

#[tokio::test]
async fn order_creation_establishes_the_total_invariant() {
  let (_, catalog) = catalog_over(|_| {});

  let order = catalog
    .create_order(order_input(vec![item("p1", 79.0, 3), item("p2", 49.0, 1)], 50.0))
    .await
    .unwrap();

  assert_eq!(order.subtotal, 79.0 * 3.0 + 49.0);
  assert_eq!(order.total, order.subtotal + order.shipping_cost);
  assert_eq!(order.status, OrderStatus::Pending);
  assert_eq!(order.items.len(), 2);

  let err = catalog.create_order(order_input(Vec::new(), 0.0)).await;
  assert!(matches!(err, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn open_transition_table_allows_any_status_change() {
  let (_, catalog) = catalog_over(|_| {});
  let order = catalog
    .create_order(order_input(vec![item("p1", 79.0, 3)], 0.0))
    .await
    .unwrap();

  let table = TransitionTable::open();
  // Backwards jumps are allowed by the open table: admin override flexibility.
  let order = catalog
    .update_order_status(&order.id, OrderStatus::Delivered, &table)
    .await
    .unwrap();
  assert_eq!(order.status, OrderStatus::Delivered);
  let order = catalog
    .update_order_status(&order.id, OrderStatus::Pending, &table)
    .await
    .unwrap();
  assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn constrained_transition_table_rejects_unlisted_changes() {
  let (_, catalog) = catalog_over(|_| {});
  let order = catalog
    .create_order(order_input(vec![item("p1", 79.0, 3)], 0.0))
    .await
    .unwrap();

  let mut allowed = HashMap::new();
  allowed.insert(OrderStatus::Pending, vec![OrderStatus::Processing]);
  let table = TransitionTable::constrained(allowed);

  assert!(matches!(
    catalog
      .update_order_status(&order.id, OrderStatus::Delivered, &table)
      .await,
    Err(StoreError::Validation(_))
  ));
  assert!(catalog
    .update_order_status(&order.id, OrderStatus::Processing, &table)
    .await
    .is_ok());
}

#[tokio::test]
async fn delivery_info_updates_are_partial_and_non_empty() {
  let (_, catalog) = catalog_over(|_| {});
  let order = catalog
    .create_order(order_input(vec![item("p1", 79.0, 3)], 0.0))
    .await
    .unwrap();

  let order = catalog
    .update_delivery_info(&order.id, Some("https://track.example/42".to_string()), None)
    .await
    .unwrap();
  assert_eq!(order.tracking_url.as_deref(), Some("https://track.example/42"));
  assert_eq!(order.tracking_number, None);

  assert!(matches!(
    catalog.update_delivery_info(&order.id, None, None).await,
    Err(StoreError::Validation(_))
  ));
}

#[tokio::test]
async fn orders_are_scoped_to_their_user() {
  let (_, catalog) = catalog_over(|_| {});
  catalog
    .create_order(order_input(vec![item("p1", 79.0, 3)], 0.0))
    .await
    .unwrap();
  let mut other = order_input(vec![item("p2", 49.0, 1)], 0.0);
  other.user_id = "u2".to_string();
  catalog.create_order(other).await.unwrap();

  assert_eq!(catalog.orders_for_user("u1").await.len(), 1);
  assert_eq!(catalog.orders_for_user("u2").await.len(), 1);
  assert_eq!(catalog.list_orders().await.len(), 2);
}

// --- Enquiries ---

#[tokio::test]
async fn enquiries_start_new_and_move_through_statuses() {
  let (_, catalog) = catalog_over(|_| {});

  let enquiry = catalog
    .create_enquiry(printshop::model::EnquiryInput {
      name: "Ravi".to_string(),
      email: "ravi@example.com".to_string(),
      phone: String::new(),
      quantity_band: "50-100".to_string(),
      message: "Bulk polaroids for a wedding".to_string(),
    })
    .await
    .unwrap();
  assert_eq!(enquiry.status, EnquiryStatus::New);

  let enquiry = catalog
    .update_enquiry_status(&enquiry.id, EnquiryStatus::Contacted)
    .await
    .unwrap();
  assert_eq!(enquiry.status, EnquiryStatus::Contacted);

  assert!(matches!(
    catalog
      .create_enquiry(printshop::model::EnquiryInput {
        name: String::new(),
        email: "  ".to_string(),
        phone: String::new(),
        quantity_band: String::new(),
        message: String::new(),
      })
      .await,
    Err(StoreError::Validation(_))
  ));
}
