// printshop_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// Fixed admin allow-list (comma-separated emails). One of the three
  /// admin signals; the other two live in the document store.
  pub admin_emails: Vec<String>,

  /// TTL for cached first pages.
  pub page_ttl: Duration,
  /// Default storefront page size.
  pub page_size: usize,

  /// Seed a demo catalog on startup when the store is empty.
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let admin_emails = get_env("ADMIN_EMAILS")
      .unwrap_or_default()
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect();

    let page_ttl_secs = get_env("PAGE_TTL_SECS")
      .unwrap_or_else(|_| "300".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid PAGE_TTL_SECS: {}", e)))?;
    let page_size = get_env("PAGE_SIZE")
      .unwrap_or_else(|_| "12".to_string())
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid PAGE_SIZE: {}", e)))?;

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      admin_emails,
      page_ttl: Duration::from_secs(page_ttl_secs),
      page_size,
      seed_db,
    })
  }
}
