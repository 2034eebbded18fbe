// printshop_server/src/web/handlers/enquiry_handlers.rs

use actix_web::{web, HttpResponse};
use printshop::model::EnquiryInput;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// Bulk order enquiry form submission. Public: prospective bulk customers
/// are not required to have an account.
#[instrument(name = "handler::create_enquiry", skip(app_state, body))]
pub async fn create_enquiry_handler(
  app_state: web::Data<AppState>,
  body: web::Json<EnquiryInput>,
) -> Result<HttpResponse, AppError> {
  let enquiry = app_state.catalog.create_enquiry(body.into_inner()).await?;
  info!(enquiry_id = %enquiry.id, "Bulk order enquiry received.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Thanks! We'll be in touch shortly.",
    "enquiry": enquiry
  })))
}
