// printshop_server/src/web/handlers/catalog_handlers.rs

//! Public storefront reads. Everything here goes through the cache layer or
//! the catalog's swallow-on-read paths, so these handlers never fail on a
//! flaky backend; they render empty collections instead.

use actix_web::{web, HttpResponse};
use printshop::model::Category;
use printshop::store::Cursor;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

fn parse_category(raw: &str) -> Result<Category, AppError> {
  Category::parse(raw)
    .ok_or_else(|| AppError::Validation(format!("Unknown product category '{raw}'.")))
}

#[derive(Deserialize, Debug)]
pub struct PageQuery {
  pub category: Option<String>,
  pub cursor: Option<String>,
}

#[instrument(name = "handler::product_page", skip(app_state))]
pub async fn product_page_handler(
  app_state: web::Data<AppState>,
  query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  let category = query.category.as_deref().map(parse_category).transpose()?;
  let cursor = query.cursor.clone().map(Cursor::new);
  let page = app_state
    .cache
    .page(category, app_state.config.page_size, cursor)
    .await;
  Ok(HttpResponse::Ok().json(json!({
    "products": page.products,
    "nextCursor": page.next_cursor,
    "hasMore": page.has_more(),
  })))
}

/// The poster wall: one logical page spanning regular and split posters,
/// merged and re-sorted newest-first.
#[instrument(name = "handler::poster_wall", skip(app_state))]
pub async fn poster_wall_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let page = app_state
    .cache
    .page_multi(
      &[Category::Poster, Category::SplitPoster],
      app_state.config.page_size,
    )
    .await;
  Ok(HttpResponse::Ok().json(json!({ "products": page.products })))
}

#[instrument(name = "handler::featured", skip(app_state))]
pub async fn featured_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.cache.featured().await;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
  pub q: String,
}

#[instrument(name = "handler::search", skip(app_state))]
pub async fn search_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.search_products(&query.q).await;
  info!(term = %query.q, hits = products.len(), "Search completed.");
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  match app_state.catalog.get_product(&product_id).await {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => Err(AppError::NotFound(product_id)),
  }
}

#[instrument(name = "handler::product_images", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn product_images_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let mut galleries = app_state.cache.images_for(&[product_id.clone()]).await;
  let images = galleries.remove(&product_id).unwrap_or_default();
  Ok(HttpResponse::Ok().json(json!({ "images": images })))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BatchImagesRequest {
  pub product_ids: Vec<String>,
}

/// Galleries for a whole listing page in one request. Fetches run in
/// bounded batches; a product whose images cannot be loaded comes back with
/// an empty gallery rather than failing the response.
#[instrument(name = "handler::batch_images", skip(app_state, body))]
pub async fn batch_images_handler(
  app_state: web::Data<AppState>,
  body: web::Json<BatchImagesRequest>,
) -> Result<HttpResponse, AppError> {
  let galleries = app_state.cache.images_for(&body.product_ids).await;
  Ok(HttpResponse::Ok().json(json!({ "images": galleries })))
}
