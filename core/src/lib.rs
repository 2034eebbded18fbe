// src/lib.rs

//! printshop: storefront core for a custom poster/polaroid print shop.
//!
//! What lives here:
//!  - A typed seam over the hosted document database (`store`), with an
//!    in-memory implementation for tests, seeding, and dev mode.
//!  - Entity models with defensive read-time normalization (`model`):
//!    missing or corrupt fields degrade to safe defaults, never panics.
//!  - The data-access layer (`catalog`): reads swallow failures into empty
//!    collections, mutations propagate errors.
//!  - The caching/pagination layer (`cache`): TTL page cache keyed by query
//!    shape, cursor pagination, multi-category merge, and a bounded-
//!    concurrency image batch loader.
//!  - The pure cart reducer and its order-policy gates (`cart`).
//!  - Write payload-shape sanitization (`sanitize`), the admin capability
//!    check (`admin`), and user-facing error normalization (`error`).

pub mod admin;
pub mod cache;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod model;
pub mod sanitize;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::cache::{CatalogCache, Clock, SystemClock};
pub use crate::cart::{policy, Cart, CartLine, Customizations};
pub use crate::catalog::{Catalog, ProductPage};
pub use crate::error::{StoreError, StoreResult, UserNotice};
pub use crate::model::{
  BulkOrderEnquiry, Category, EnquiryStatus, Order, OrderItem, OrderStatus, PaymentStatus,
  Product, ProductImage, TransitionTable,
};
pub use crate::store::{memory::MemoryStore, Cursor, Document, DocumentStore, Query, QueryPage};
