// printshop_server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use printshop::{StoreError, UserNotice};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Store Error: {source}")]
  Store {
    #[from]
    source: StoreError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// when handlers use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

fn notice_body(notice: &UserNotice) -> serde_json::Value {
  json!({
    "error": {
      "title": notice.title,
      "message": notice.message,
      "action": notice.action,
    }
  })
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response; the body only
    // ever carries the normalized user-facing triple.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(notice_body(&UserNotice::for_error(
        &StoreError::Validation(m.clone()),
      ))),
      AppError::Auth(_) => HttpResponse::Unauthorized().json(notice_body(&UserNotice::for_error(
        &StoreError::Unauthenticated(String::new()),
      ))),
      AppError::Forbidden(_) => HttpResponse::Forbidden().json(notice_body(&UserNotice::for_error(
        &StoreError::PermissionDenied(String::new()),
      ))),
      AppError::NotFound(m) => HttpResponse::NotFound().json(notice_body(&UserNotice::for_error(
        &StoreError::NotFound {
          collection: "resource".to_string(),
          id: m.clone(),
        },
      ))),
      AppError::Config(_) | AppError::Internal(_) => {
        HttpResponse::InternalServerError().json(notice_body(&UserNotice::generic()))
      }
      AppError::Store { source } => {
        let status = match source {
          StoreError::NotFound { .. } => actix_web::http::StatusCode::NOT_FOUND,
          StoreError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
          StoreError::Unauthenticated(_) => actix_web::http::StatusCode::UNAUTHORIZED,
          StoreError::PermissionDenied(_) => actix_web::http::StatusCode::FORBIDDEN,
          StoreError::Unavailable(_) => actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
          _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        HttpResponse::build(status).json(notice_body(&UserNotice::for_error(source)))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
