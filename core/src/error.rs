// printshop_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure taxonomy for the storefront data layer.
///
/// Read paths in the catalog swallow these (degrading to empty collections so
/// listing screens render "no products found" instead of crashing); mutation
/// paths propagate them to the caller, which is expected to translate them
/// through [`UserNotice::for_error`] before showing anything to a person.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Document not found: {collection}/{id}")]
  NotFound { collection: String, id: String },

  #[error("Not authenticated: {0}")]
  Unauthenticated(String),

  #[error("Permission denied: {0}")]
  PermissionDenied(String),

  #[error("Backend unavailable: {0}")]
  Unavailable(String),

  #[error("Write payload rejected by the backing store: {0}")]
  PayloadShape(String),

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Serialization error: {source}")]
  Serialization {
    #[from]
    source: serde_json::Error,
  },

  // Catch-all for errors surfaced by a concrete store backend.
  #[error("Store backend error: {source}")]
  Backend {
    #[from]
    source: AnyhowError,
  },
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;

/// A short, user-facing {title, message, action} triple.
///
/// Every error shown to a customer goes through [`UserNotice::for_error`];
/// unmapped kinds fall through to a generic "try again or contact support"
/// notice rather than leaking backend detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
  pub title: String,
  pub message: String,
  pub action: String,
}

impl UserNotice {
  fn new(title: &str, message: &str, action: &str) -> Self {
    UserNotice {
      title: title.to_string(),
      message: message.to_string(),
      action: action.to_string(),
    }
  }

  /// The closed error-to-notice mapping.
  pub fn for_error(err: &StoreError) -> UserNotice {
    match err {
      StoreError::NotFound { .. } => UserNotice::new(
        "Not found",
        "We couldn't find what you were looking for. It may have been removed.",
        "Browse the catalog",
      ),
      StoreError::Unauthenticated(_) => UserNotice::new(
        "Please sign in",
        "You need to be signed in to do that.",
        "Sign in",
      ),
      StoreError::PermissionDenied(_) => UserNotice::new(
        "Not allowed",
        "Your account doesn't have permission for this action.",
        "Contact support",
      ),
      StoreError::Unavailable(_) => UserNotice::new(
        "Connection trouble",
        "We couldn't reach the store right now. Your data is safe.",
        "Try again",
      ),
      StoreError::PayloadShape(_) => UserNotice::new(
        "Couldn't save",
        "Part of this item couldn't be saved in its current form.",
        "Simplify and retry",
      ),
      StoreError::Validation(msg) => UserNotice::new("Check your input", msg, "Fix and retry"),
      _ => UserNotice::generic(),
    }
  }

  /// Fallback notice for anything unmapped.
  pub fn generic() -> UserNotice {
    UserNotice::new(
      "Something went wrong",
      "An unexpected error occurred. Please try again, or contact support if it keeps happening.",
      "Try again",
    )
  }
}
