// printshop_core/src/cache.rs

//! The caching/pagination layer over the catalog.
//!
//! The backing store charges one round-trip per page and has no batch
//! "get many by id" join against the image collection, so the hot read paths
//! (home page, category listing) are wrapped here: an in-memory TTL page
//! cache keyed by query shape, cursor-based pagination with a was-the-page-
//! full continuation heuristic, and a bounded-concurrency image batch loader.
//! The net effect is an O(page size) home-page load plus O(visible images)
//! image reads, with no single slow or failing id able to block the rest of
//! the page.
//!
//! [`CatalogCache`] is an explicit service object constructed once per
//! process with an injected [`Clock`], not a module-level global, so tests
//! drive the TTL with a fake clock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::model::{Category, Product, ProductImage};
use crate::store::Cursor;

/// How long a cached first page stays fresh.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(300);

/// Default storefront page size.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Fixed page size for the featured strip.
pub const FEATURED_PAGE_SIZE: usize = 8;

/// Image fetches run in sequential batches of this size: members of one
/// batch run concurrently, batch n+1 waits for batch n to settle. Bounds
/// peak in-flight requests against the backend's free-tier limits.
pub const IMAGE_BATCH_SIZE: usize = 3;

/// Injectable time source for TTL decisions.
pub trait Clock: Send + Sync {
  fn now(&self) -> Instant;
}

/// The production clock.
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// Structural cache key: which categories, what page size, featured or not.
/// Only first pages are cached, so the cursor never participates in the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PageKey {
  categories: Vec<Option<Category>>,
  page_size: usize,
  featured: bool,
}

struct CachedPage {
  products: Vec<Product>,
  next_cursor: Option<Cursor>,
  captured_at: Instant,
}

/// A page as returned to callers. `has_more` reflects the backend's
/// continuation heuristic: the previous page came back full.
#[derive(Debug, Clone, Default)]
pub struct CachedProductPage {
  pub products: Vec<Product>,
  pub next_cursor: Option<Cursor>,
}

impl CachedProductPage {
  pub fn has_more(&self) -> bool {
    self.next_cursor.is_some()
  }
}

pub struct CatalogCache {
  catalog: Arc<Catalog>,
  clock: Arc<dyn Clock>,
  ttl: Duration,
  pages: RwLock<HashMap<PageKey, CachedPage>>,
  /// Product id -> validated gallery. No TTL: images rarely change after
  /// upload, so entries live until explicitly invalidated.
  images: RwLock<HashMap<String, Vec<ProductImage>>>,
}

impl CatalogCache {
  pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
    CatalogCache {
      catalog,
      clock,
      ttl,
      pages: RwLock::new(HashMap::new()),
      images: RwLock::new(HashMap::new()),
    }
  }

  pub fn with_defaults(catalog: Arc<Catalog>) -> Self {
    Self::new(catalog, Arc::new(SystemClock), DEFAULT_PAGE_TTL)
  }

  fn cached_page(&self, key: &PageKey) -> Option<CachedProductPage> {
    let guard = self.pages.read();
    let entry = guard.get(key)?;
    if self.clock.now().duration_since(entry.captured_at) >= self.ttl {
      return None;
    }
    Some(CachedProductPage {
      products: entry.products.clone(),
      next_cursor: entry.next_cursor.clone(),
    })
  }

  fn store_page(&self, key: PageKey, page: &CachedProductPage) {
    self.pages.write().insert(
      key,
      CachedPage {
        products: page.products.clone(),
        next_cursor: page.next_cursor.clone(),
        captured_at: self.clock.now(),
      },
    );
  }

  /// One storefront page, newest first. The cache is consulted only for
  /// first pages (no incoming cursor); cursored fetches always hit the
  /// backend, because deep pagination is rare and caching continuation
  /// cursors is unsound across concurrent mutations.
  pub async fn page(
    &self,
    category: Option<Category>,
    page_size: usize,
    cursor: Option<Cursor>,
  ) -> CachedProductPage {
    let key = PageKey {
      categories: vec![category],
      page_size,
      featured: false,
    };
    let first_page = cursor.is_none();
    if first_page {
      if let Some(hit) = self.cached_page(&key) {
        debug!(?category, page_size, "Page cache hit.");
        return hit;
      }
    }

    let fetched = self.catalog.products_page(category, page_size, cursor).await;
    let page = CachedProductPage {
      products: fetched.products,
      next_cursor: fetched.next_cursor,
    };
    if first_page {
      self.store_page(key, &page);
    }
    page
  }

  /// Fetches one logical page spanning several physical categories (the
  /// poster wall spans regular and split posters). Per-category fetches are
  /// issued concurrently, then the merged list is re-sorted newest-first:
  /// each fetch is only locally ordered, and display order must not depend
  /// on network completion order. First pages only; no merged cursor is
  /// minted because per-category cursors cannot be combined soundly.
  pub async fn page_multi(&self, categories: &[Category], page_size: usize) -> CachedProductPage {
    let key = PageKey {
      categories: categories.iter().copied().map(Some).collect(),
      page_size,
      featured: false,
    };
    if let Some(hit) = self.cached_page(&key) {
      debug!(?categories, page_size, "Multi-category page cache hit.");
      return hit;
    }

    let fetches = categories
      .iter()
      .map(|category| self.catalog.products_page(Some(*category), page_size, None));
    let mut products: Vec<Product> = join_all(fetches)
      .await
      .into_iter()
      .flat_map(|page| page.products)
      .collect();
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    let page = CachedProductPage {
      products,
      next_cursor: None,
    };
    self.store_page(key, &page);
    page
  }

  /// Featured strip: fixed small page, same caching discipline.
  pub async fn featured(&self) -> Vec<Product> {
    let key = PageKey {
      categories: Vec::new(),
      page_size: FEATURED_PAGE_SIZE,
      featured: true,
    };
    if let Some(hit) = self.cached_page(&key) {
      return hit.products;
    }
    let products = self.catalog.featured_page(FEATURED_PAGE_SIZE).await;
    self.store_page(
      key,
      &CachedProductPage {
        products: products.clone(),
        next_cursor: None,
      },
    );
    products
  }

  /// Batched image loader: product id -> ordered validated gallery.
  ///
  /// Cache misses are fetched in sequential batches of [`IMAGE_BATCH_SIZE`]
  /// with intra-batch concurrency. A failure on one id degrades to an empty
  /// gallery for that id only; the rest of the map is unaffected.
  pub async fn images_for(&self, product_ids: &[String]) -> HashMap<String, Vec<ProductImage>> {
    let mut result = HashMap::with_capacity(product_ids.len());
    let mut misses: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(product_ids.len());
    {
      let guard = self.images.read();
      for id in product_ids {
        if !seen.insert(id.as_str()) {
          continue;
        }
        match guard.get(id) {
          Some(gallery) => {
            result.insert(id.clone(), gallery.clone());
          }
          None => misses.push(id.clone()),
        }
      }
    }

    for batch in misses.chunks(IMAGE_BATCH_SIZE) {
      let fetches = batch.iter().map(|id| self.catalog.images_for_product(id));
      let galleries = join_all(fetches).await;
      let mut guard = self.images.write();
      for (id, gallery) in batch.iter().zip(galleries) {
        // Empty galleries are cached too, including ones that are empty
        // because the fetch degraded; a product hidden this way stays hidden
        // until an explicit invalidation.
        guard.insert(id.clone(), gallery.clone());
        result.insert(id.clone(), gallery);
      }
    }
    result
  }

  // --- Invalidation: explicit, called after admin writes. There is no
  // auto-invalidation on write; staleness is otherwise bounded by the TTL.

  /// Drops cached pages mentioning the category, or every page when `None`.
  /// All-category keys (the uncategorized home-page listing) and featured
  /// pages can contain any product, so they are dropped along with the
  /// category's own pages and multi-category composites.
  pub fn invalidate_pages(&self, category: Option<Category>) {
    let mut guard = self.pages.write();
    match category {
      Some(category) => {
        guard.retain(|key, _| {
          !key.categories.contains(&Some(category)) && !key.categories.contains(&None) && !key.featured
        });
      }
      None => guard.clear(),
    }
    info!(?category, "Page cache invalidated.");
  }

  pub fn invalidate_all_pages(&self) {
    self.invalidate_pages(None);
  }

  /// Drops one product's cached gallery, or all of them.
  pub fn invalidate_images(&self, product_id: Option<&str>) {
    let mut guard = self.images.write();
    match product_id {
      Some(id) => {
        guard.remove(id);
      }
      None => guard.clear(),
    }
  }

  pub fn invalidate_all_images(&self) {
    self.invalidate_images(None);
  }
}
