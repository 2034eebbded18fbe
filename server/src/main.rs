// printshop_server/src/main.rs

// Declare modules for the application
mod config;
mod errors;
mod seed;
mod state;
mod store_pg;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::store_pg::PgDocumentStore;

use actix_web::{web as actix_data, App, HttpServer};
use printshop::model::TransitionTable;
use printshop::{Catalog, CatalogCache, DocumentStore, SystemClock};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting print shop storefront server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize Database Pool
  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = PgDocumentStore::ensure_schema(&db_pool).await {
    tracing::error!(error = %e, "Failed to ensure document store schema.");
    panic!("Schema error: {}", e);
  }

  // Wire the storefront: store seam, data-access layer, cache layer.
  let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(db_pool));
  let catalog = Arc::new(Catalog::new(store.clone()));
  let cache = Arc::new(CatalogCache::new(
    catalog.clone(),
    Arc::new(SystemClock),
    app_config.page_ttl,
  ));

  // Seed database if configured
  if app_config.seed_db {
    if let Err(e) = seed::seed_if_empty(&store, &catalog).await {
      tracing::error!(error = %e, "Failed to seed demo catalog.");
    }
  }

  let app_state = AppState {
    store,
    catalog,
    cache,
    transitions: Arc::new(TransitionTable::open()),
    config: app_config.clone(),
  };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
