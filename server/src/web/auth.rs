// printshop_server/src/web/auth.rs

//! Request identity and the admin capability gate.
//!
//! Authentication itself is external: an upstream gateway verifies the
//! session and forwards the caller's id and email as headers. This module
//! only extracts that identity and, for back-office routes, gathers the
//! three admin signals and ORs them together.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use printshop::admin::{allowlist_contains, is_admin, AdminEvidence};
use printshop::store::collections;
use serde_json::Value;
use tracing::warn;

use crate::errors::{AppError, Result};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";

/// The authenticated caller, as asserted by the upstream gateway.
#[derive(Debug, Clone)]
pub struct Identity {
  pub user_id: String,
  pub email: String,
}

impl FromRequest for Identity {
  type Error = AppError;
  type Future = Ready<Result<Identity>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let header = |name: &str| {
      req
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
    };
    let identity = match header(USER_ID_HEADER) {
      Some(user_id) => Ok(Identity {
        user_id,
        email: header(USER_EMAIL_HEADER).unwrap_or_default(),
      }),
      None => Err(AppError::Auth("Request carries no identity.".to_string())),
    };
    ready(identity)
  }
}

/// Admits the caller if any of the three admin signals holds:
/// the configured email allow-list, an `admins/{uid}` document, or an
/// `isAdmin` flag on the user profile. A store failure while gathering a
/// signal counts as that signal being absent, never as a grant.
pub async fn require_admin(state: &AppState, identity: &Identity) -> Result<()> {
  let email_allowlisted = allowlist_contains(&state.config.admin_emails, &identity.email);

  let admin_doc_exists = match state.store.get(collections::ADMINS, &identity.user_id).await {
    Ok(doc) => doc.is_some(),
    Err(e) => {
      warn!(user_id = %identity.user_id, error = %e, "Admin document lookup failed.");
      false
    }
  };

  let profile_flag = match state.store.get(collections::USERS, &identity.user_id).await {
    Ok(doc) => doc
      .as_ref()
      .and_then(|d| d.field("isAdmin"))
      .and_then(Value::as_bool)
      .unwrap_or(false),
    Err(e) => {
      warn!(user_id = %identity.user_id, error = %e, "User profile lookup failed.");
      false
    }
  };

  if is_admin(AdminEvidence {
    email_allowlisted,
    admin_doc_exists,
    profile_flag,
  }) {
    Ok(())
  } else {
    Err(AppError::Forbidden(format!(
      "User {} is not an administrator.",
      identity.user_id
    )))
  }
}
