// tests/cache_tests.rs
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use printshop::cache::CatalogCache;
use printshop::store::collections;
use printshop::{Catalog, Category, MemoryStore};
use serde_json::json;

const TTL: Duration = Duration::from_secs(300);

fn poster_data(name: &str) -> serde_json::Value {
  json!({ "name": name, "price": 79.0, "category": "poster" })
}

struct Rig {
  store: Arc<CountingStore>,
  cache: CatalogCache,
  clock: Arc<ManualClock>,
}

fn rig(seed: impl FnOnce(&MemoryStore)) -> Rig {
  setup_tracing();
  let inner = MemoryStore::new();
  seed(&inner);
  let store = Arc::new(CountingStore::new(inner));
  let catalog = Arc::new(Catalog::new(store.clone()));
  let clock = ManualClock::new();
  let cache = CatalogCache::new(catalog, clock.clone(), TTL);
  Rig { store, cache, clock }
}

#[tokio::test]
async fn first_page_is_cached_within_ttl_and_refetched_after_expiry() {
  let rig = rig(|store| {
    for i in 0..3 {
      store.put(
        collections::PRODUCTS,
        product_doc(&format!("p{i}"), t(i), poster_data(&format!("Poster {i}"))),
      );
    }
  });

  let first = rig.cache.page(Some(Category::Poster), 12, None).await;
  assert_eq!(rig.store.queries(), 1);

  // Within the TTL: identical results, no second backend call.
  let second = rig.cache.page(Some(Category::Poster), 12, None).await;
  assert_eq!(rig.store.queries(), 1);
  assert_eq!(first.products, second.products);
  assert_eq!(first.next_cursor, second.next_cursor);

  // After expiry the next fetch goes to the backend again.
  rig.clock.advance(TTL + Duration::from_secs(1));
  let third = rig.cache.page(Some(Category::Poster), 12, None).await;
  assert_eq!(rig.store.queries(), 2);
  assert_eq!(first.products, third.products);
}

#[tokio::test]
async fn cursored_fetches_bypass_the_cache() {
  let rig = rig(|store| {
    for i in 0..5 {
      store.put(
        collections::PRODUCTS,
        product_doc(&format!("p{i}"), t(i), poster_data(&format!("Poster {i}"))),
      );
    }
  });

  let page1 = rig.cache.page(None, 2, None).await;
  assert_eq!(page1.products.len(), 2);
  assert!(page1.has_more());
  assert_eq!(rig.store.queries(), 1);

  // Page two is never cached: each call is a fresh backend query.
  let page2a = rig.cache.page(None, 2, page1.next_cursor.clone()).await;
  let page2b = rig.cache.page(None, 2, page1.next_cursor.clone()).await;
  assert_eq!(rig.store.queries(), 3);
  assert_eq!(page2a.products, page2b.products);

  // No overlap between consecutive pages.
  for p in &page2a.products {
    assert!(!page1.products.iter().any(|q| q.id == p.id));
  }
}

#[tokio::test]
async fn multi_category_merge_is_newest_first_across_categories() {
  let rig = rig(|store| {
    // Category A (poster) holds items created at t3 and t1,
    // category B (split_poster) at t4 and t2.
    store.put(collections::PRODUCTS, product_doc("a3", t(3), poster_data("A3")));
    store.put(collections::PRODUCTS, product_doc("a1", t(1), poster_data("A1")));
    store.put(
      collections::PRODUCTS,
      product_doc("b4", t(4), json!({ "name": "B4", "price": 59.0, "category": "split_poster" })),
    );
    store.put(
      collections::PRODUCTS,
      product_doc("b2", t(2), json!({ "name": "B2", "price": 59.0, "category": "split_poster" })),
    );
  });

  let page = rig
    .cache
    .page_multi(&[Category::Poster, Category::SplitPoster], 12)
    .await;
  let ids: Vec<&str> = page.products.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, vec!["b4", "a3", "b2", "a1"]);

  // Composite key is cached like any other first page.
  assert_eq!(rig.store.queries(), 2);
  rig
    .cache
    .page_multi(&[Category::Poster, Category::SplitPoster], 12)
    .await;
  assert_eq!(rig.store.queries(), 2);
}

#[tokio::test]
async fn featured_fetch_uses_the_same_caching_discipline() {
  let rig = rig(|store| {
    store.put(
      collections::PRODUCTS,
      product_doc("f1", t(1), json!({ "name": "F1", "price": 79.0, "category": "poster", "featured": true })),
    );
    store.put(collections::PRODUCTS, product_doc("p1", t(2), poster_data("P1")));
  });

  let featured = rig.cache.featured().await;
  assert_eq!(featured.len(), 1);
  assert_eq!(featured[0].id, "f1");
  assert_eq!(rig.store.queries(), 1);

  rig.cache.featured().await;
  assert_eq!(rig.store.queries(), 1);
}

#[tokio::test]
async fn image_batches_degrade_per_id_not_per_batch() {
  let ids: Vec<String> = (0..5).map(|i| format!("p{i}")).collect();
  let rig = rig(|store| {
    for (i, id) in (0..5).zip(["p0", "p1", "p2", "p3", "p4"]) {
      store.put(collections::PRODUCT_IMAGES, image_doc(&format!("img{i}a"), id, 1));
      store.put(collections::PRODUCT_IMAGES, image_doc(&format!("img{i}b"), id, 0));
    }
  });
  rig.store.fail_images_for("p3");

  let galleries = rig.cache.images_for(&ids).await;
  assert_eq!(galleries.len(), 5);

  // The failing id degrades to an empty gallery; the others are intact and
  // ordered by their stored index.
  assert!(galleries["p3"].is_empty());
  for id in ["p0", "p1", "p2", "p4"] {
    let gallery = &galleries[id];
    assert_eq!(gallery.len(), 2, "gallery for {id}");
    assert!(gallery[0].position <= gallery[1].position);
  }
}

#[tokio::test]
async fn image_cache_has_no_ttl_and_serves_repeat_lookups() {
  let ids: Vec<String> = (0..4).map(|i| format!("p{i}")).collect();
  let rig = rig(|store| {
    for (i, id) in (0..4).zip(["p0", "p1", "p2", "p3"]) {
      store.put(collections::PRODUCT_IMAGES, image_doc(&format!("img{i}"), id, 0));
    }
  });

  rig.cache.images_for(&ids).await;
  let after_first = rig.store.image_queries();
  assert_eq!(after_first, 4); // one query per id, in batches of IMAGE_BATCH_SIZE

  // Far beyond the page TTL, the image cache still answers from memory.
  rig.clock.advance(TTL * 10);
  rig.cache.images_for(&ids).await;
  assert_eq!(rig.store.image_queries(), after_first);

  // Explicit invalidation brings the backend back into play for that id.
  rig.cache.invalidate_images(Some("p1"));
  rig.cache.images_for(&ids).await;
  assert_eq!(rig.store.image_queries(), after_first + 1);
}

#[tokio::test]
async fn page_invalidation_forces_a_refetch_inside_the_ttl() {
  let rig = rig(|store| {
    store.put(collections::PRODUCTS, product_doc("p0", t(0), poster_data("P0")));
  });

  rig.cache.page(Some(Category::Poster), 12, None).await;
  rig.cache.page(Some(Category::Polaroid), 12, None).await;
  assert_eq!(rig.store.queries(), 2);

  // Category-scoped invalidation only drops that category's pages.
  rig.cache.invalidate_pages(Some(Category::Poster));
  rig.cache.page(Some(Category::Polaroid), 12, None).await;
  assert_eq!(rig.store.queries(), 2);
  rig.cache.page(Some(Category::Poster), 12, None).await;
  assert_eq!(rig.store.queries(), 3);

  rig.cache.invalidate_all_pages();
  rig.cache.page(Some(Category::Polaroid), 12, None).await;
  assert_eq!(rig.store.queries(), 4);
}

#[tokio::test]
async fn category_invalidation_also_drops_the_all_category_listing() {
  let rig = rig(|store| {
    store.put(collections::PRODUCTS, product_doc("p0", t(0), poster_data("P0")));
    store.put(
      collections::PRODUCTS,
      product_doc("q0", t(1), json!({ "name": "Q0", "price": 29.0, "category": "polaroid" })),
    );
  });

  // Prime the uncategorized home-page listing and one category page.
  rig.cache.page(None, 12, None).await;
  rig.cache.page(Some(Category::Polaroid), 12, None).await;
  assert_eq!(rig.store.queries(), 2);

  // A new poster can appear on the home page, so invalidating the poster
  // category must drop the all-category key as well.
  rig.cache.invalidate_pages(Some(Category::Poster));
  rig.cache.page(None, 12, None).await;
  assert_eq!(rig.store.queries(), 3);

  // The unrelated category page survives.
  rig.cache.page(Some(Category::Polaroid), 12, None).await;
  assert_eq!(rig.store.queries(), 3);
}

#[tokio::test]
async fn repeated_ids_in_one_image_request_fetch_each_gallery_once() {
  let rig = rig(|store| {
    store.put(collections::PRODUCT_IMAGES, image_doc("img0", "p0", 0));
    store.put(collections::PRODUCT_IMAGES, image_doc("img1", "p1", 0));
  });

  let ids: Vec<String> = ["p0", "p1", "p0", "p1", "p0"]
    .iter()
    .map(|s| s.to_string())
    .collect();
  let galleries = rig.cache.images_for(&ids).await;

  assert_eq!(galleries.len(), 2);
  assert_eq!(rig.store.image_queries(), 2);
}

#[tokio::test]
async fn a_degraded_gallery_stays_cached_empty_until_invalidated() {
  let rig = rig(|store| {
    store.put(collections::PRODUCT_IMAGES, image_doc("img0", "p0", 0));
  });
  rig.store.fail_images_for("p0");

  let ids = vec!["p0".to_string()];
  let galleries = rig.cache.images_for(&ids).await;
  assert!(galleries["p0"].is_empty());
  assert_eq!(rig.store.image_queries(), 1);

  // Backend recovers, but the empty gallery is cached like any other result.
  rig.store.fail_image_product_ids.lock().remove("p0");
  let galleries = rig.cache.images_for(&ids).await;
  assert!(galleries["p0"].is_empty());
  assert_eq!(rig.store.image_queries(), 1);

  // Explicit invalidation brings the real gallery back.
  rig.cache.invalidate_images(Some("p0"));
  let galleries = rig.cache.images_for(&ids).await;
  assert_eq!(galleries["p0"].len(), 1);
  assert_eq!(rig.store.image_queries(), 2);
}
