// printshop_server/src/state.rs
use crate::config::AppConfig;
use printshop::{Catalog, CatalogCache, DocumentStore, TransitionTable};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn DocumentStore>,
  pub catalog: Arc<Catalog>,
  pub cache: Arc<CatalogCache>,
  /// Order status transition policy. Open by default; swap in a constrained
  /// table here without touching any handler.
  pub transitions: Arc<TransitionTable>,
  pub config: Arc<AppConfig>, // Share loaded config
}
