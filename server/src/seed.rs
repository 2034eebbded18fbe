// printshop_server/src/seed.rs

//! Demo catalog seeding for dev environments, gated behind `SEED_DB`.

use std::sync::Arc;

use printshop::model::{Category, ProductInput, SizePrice};
use printshop::store::{collections, DocumentStore, Query};
use printshop::{Catalog, StoreResult};
use tracing::info;

/// Seeds a small demo catalog if the products collection is empty.
/// Emptiness is checked against the store directly so a backend failure
/// aborts seeding instead of being swallowed into "looks empty".
pub async fn seed_if_empty(store: &Arc<dyn DocumentStore>, catalog: &Catalog) -> StoreResult<()> {
  let existing = store
    .query(Query::new(collections::PRODUCTS).limit(1))
    .await?;
  if !existing.docs.is_empty() {
    info!("Products already present; skipping demo seed.");
    return Ok(());
  }

  let demo = vec![
    ProductInput {
      name: "Midnight City Skyline".to_string(),
      description: "Matte-finish cityscape poster, printed on 200gsm stock.".to_string(),
      price: 349.0,
      is_multi_size: true,
      size_prices: vec![
        SizePrice {
          size: "A4".to_string(),
          price: 349.0,
          original_price: Some(399.0),
        },
        SizePrice {
          size: "A3".to_string(),
          price: 549.0,
          original_price: None,
        },
      ],
      category: Category::Poster,
      theme: Some("city".to_string()),
      featured: true,
      ..Default::default()
    },
    ProductInput {
      name: "Retro Polaroid Pack (12)".to_string(),
      description: "Twelve prints from your own photos, classic white border.".to_string(),
      price: 299.0,
      category: Category::Polaroid,
      featured: true,
      ..Default::default()
    },
    ProductInput {
      name: "Triptych Mountain Range".to_string(),
      description: "Three-panel split poster; pairs with any A4 print.".to_string(),
      price: 899.0,
      category: Category::SplitPoster,
      size: Some("A3".to_string()),
      ..Default::default()
    },
    ProductInput {
      name: "Custom Text Poster".to_string(),
      description: "Your words, your typeface, your colors.".to_string(),
      price: 399.0,
      category: Category::Customizable,
      size: Some("A4".to_string()),
      ..Default::default()
    },
    ProductInput {
      name: "Starter Wall Bundle".to_string(),
      description: "Two posters and a polaroid pack at a bundle price.".to_string(),
      price: 799.0,
      original_price: Some(947.0),
      category: Category::Bundle,
      ..Default::default()
    },
  ];

  let count = demo.len();
  for input in demo {
    catalog.create_product(input).await?;
  }
  info!(count, "Demo catalog seeded.");
  Ok(())
}
