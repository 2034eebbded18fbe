// printshop_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use printshop::model::OrderInput;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::{require_admin, Identity};

#[instrument(name = "handler::create_order", skip(app_state, identity, body), fields(user_id = %identity.user_id))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  body: web::Json<OrderInput>,
) -> Result<HttpResponse, AppError> {
  let mut input = body.into_inner();
  // The order is always owned by the authenticated caller, whatever the
  // payload claims.
  input.user_id = identity.user_id.clone();

  let order = app_state.catalog.create_order(input).await?;
  info!(order_id = %order.id, total = order.total, "Order placed.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Order placed successfully.",
    "order": order
  })))
}

#[instrument(name = "handler::my_orders", skip(app_state, identity), fields(user_id = %identity.user_id))]
pub async fn my_orders_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.catalog.orders_for_user(&identity.user_id).await;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

/// Single order fetch, visible to its owner or to an administrator.
#[instrument(name = "handler::get_order", skip(app_state, identity, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  identity: Identity,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state
    .catalog
    .get_order(&order_id)
    .await
    .ok_or_else(|| AppError::NotFound(order_id.clone()))?;

  if order.user_id != identity.user_id {
    // Not the owner; only an admin may look at someone else's order.
    if let Err(e) = require_admin(&app_state, &identity).await {
      warn!(order_id = %order_id, user_id = %identity.user_id, "Order access denied.");
      return Err(e);
    }
  }
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}
