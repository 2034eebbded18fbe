// printshop_server/src/web/handlers/admin_handlers.rs

//! Back-office routes. Every handler here checks the admin capability first,
//! and every successful write explicitly invalidates the affected cache
//! entries; there is no invalidation-on-write inside the cache itself.

use actix_web::{web, HttpResponse};
use printshop::model::{Category, EnquiryStatus, OrderStatus, ProductImageInput, ProductInput};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::{require_admin, Identity};

fn parse_category(raw: &str) -> Result<Category, AppError> {
  Category::parse(raw)
    .ok_or_else(|| AppError::Validation(format!("Unknown product category '{raw}'.")))
}

// --- Products ---

#[derive(Deserialize, Debug)]
pub struct AdminListQuery {
  pub category: Option<String>,
}

/// Full listing including hidden products. Unpaginated; this is a
/// back-office screen, not a storefront hot path.
#[instrument(name = "handler::admin_list_products", skip(app_state, identity))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let category = query.category.as_deref().map(parse_category).transpose()?;
  let products = app_state.catalog.list_products(category).await;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::admin_create_product", skip(app_state, identity, body))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  body: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let category = body.category;
  let product = app_state.catalog.create_product(body.into_inner()).await?;
  app_state.cache.invalidate_pages(Some(category));
  info!(product_id = %product.id, "Product created by admin.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Product created successfully.",
    "product": product
  })))
}

#[instrument(name = "handler::admin_update_product", skip(app_state, identity, path, body), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let product_id = path.into_inner();
  let product = app_state
    .catalog
    .update_product(&product_id, body.into_inner())
    .await?;
  // A patch may move the product between categories, so drop every page.
  app_state.cache.invalidate_all_pages();
  Ok(HttpResponse::Ok().json(json!({
    "message": "Product updated successfully.",
    "product": product
  })))
}

#[instrument(name = "handler::admin_delete_product", skip(app_state, identity, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let product_id = path.into_inner();
  app_state.catalog.delete_product(&product_id).await?;
  app_state.cache.invalidate_all_pages();
  app_state.cache.invalidate_images(Some(&product_id));
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully." })))
}

// --- Product images ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddImageRequest {
  pub image_data: String,
  #[serde(default)]
  pub image_index: i64,
}

#[instrument(name = "handler::admin_add_image", skip(app_state, identity, path, body), fields(product_id = %path.as_ref()))]
pub async fn add_product_image_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<AddImageRequest>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let product_id = path.into_inner();
  let body = body.into_inner();
  let image_id = app_state
    .catalog
    .add_product_image(ProductImageInput {
      product_id: product_id.clone(),
      image_data: body.image_data,
      image_index: body.image_index,
    })
    .await?;
  app_state.cache.invalidate_images(Some(&product_id));
  Ok(HttpResponse::Created().json(json!({
    "message": "Image uploaded successfully.",
    "imageId": image_id
  })))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReorderImageRequest {
  pub product_id: String,
  pub image_index: i64,
}

#[instrument(name = "handler::admin_reorder_image", skip(app_state, identity, path, body), fields(image_id = %path.as_ref()))]
pub async fn reorder_product_image_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<ReorderImageRequest>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let image_id = path.into_inner();
  app_state
    .catalog
    .reorder_product_image(&image_id, body.image_index)
    .await?;
  app_state.cache.invalidate_images(Some(&body.product_id));
  Ok(HttpResponse::Ok().json(json!({ "message": "Image order updated." })))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageRequest {
  pub product_id: String,
}

#[instrument(name = "handler::admin_delete_image", skip(app_state, identity, path, body), fields(image_id = %path.as_ref()))]
pub async fn delete_product_image_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<DeleteImageRequest>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let image_id = path.into_inner();
  app_state.catalog.delete_product_image(&image_id).await?;
  app_state.cache.invalidate_images(Some(&body.product_id));
  Ok(HttpResponse::Ok().json(json!({ "message": "Image deleted." })))
}

// --- Orders ---

#[instrument(name = "handler::admin_list_orders", skip(app_state, identity))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let orders = app_state.catalog.list_orders().await;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusRequest {
  pub status: String,
}

#[instrument(name = "handler::admin_update_order_status", skip(app_state, identity, path, body), fields(order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let order_id = path.into_inner();
  let to = OrderStatus::parse(&body.status)
    .ok_or_else(|| AppError::Validation(format!("Unknown order status '{}'.", body.status)))?;
  let order = app_state
    .catalog
    .update_order_status(&order_id, to, &app_state.transitions)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Order status updated.",
    "order": order
  })))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfoRequest {
  pub tracking_url: Option<String>,
  pub tracking_number: Option<String>,
}

#[instrument(name = "handler::admin_update_delivery", skip(app_state, identity, path, body), fields(order_id = %path.as_ref()))]
pub async fn update_delivery_info_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<DeliveryInfoRequest>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let order_id = path.into_inner();
  let body = body.into_inner();
  let order = app_state
    .catalog
    .update_delivery_info(&order_id, body.tracking_url, body.tracking_number)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Delivery information updated.",
    "order": order
  })))
}

// --- Bulk order enquiries ---

#[instrument(name = "handler::admin_list_enquiries", skip(app_state, identity))]
pub async fn list_enquiries_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let enquiries = app_state.catalog.list_enquiries().await;
  Ok(HttpResponse::Ok().json(json!({ "enquiries": enquiries })))
}

#[instrument(name = "handler::admin_update_enquiry", skip(app_state, identity, path, body), fields(enquiry_id = %path.as_ref()))]
pub async fn update_enquiry_status_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
  body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &identity).await?;
  let enquiry_id = path.into_inner();
  let status = EnquiryStatus::parse(&body.status)
    .ok_or_else(|| AppError::Validation(format!("Unknown enquiry status '{}'.", body.status)))?;
  let enquiry = app_state
    .catalog
    .update_enquiry_status(&enquiry_id, status)
    .await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Enquiry status updated.",
    "enquiry": enquiry
  })))
}
