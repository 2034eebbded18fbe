// printshop_core/src/admin.rs

//! Admin capability check.
//!
//! A user is an admin if ANY of three independent signals holds: their email
//! is on the fixed allow-list, an `admins/{uid}` document exists, or their
//! `users/{uid}` profile carries an `isAdmin` flag. The three lookups happen
//! at the edge (the server gathers them); this check takes the booleans
//! explicitly so it can be exercised without a live backend.

/// The three independent admin signals, gathered by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminEvidence {
  pub email_allowlisted: bool,
  pub admin_doc_exists: bool,
  pub profile_flag: bool,
}

/// Logical OR over the three signals. Any one suffices.
pub fn is_admin(evidence: AdminEvidence) -> bool {
  evidence.email_allowlisted || evidence.admin_doc_exists || evidence.profile_flag
}

/// Case-insensitive allow-list membership.
pub fn allowlist_contains(allowlist: &[String], email: &str) -> bool {
  let email = email.trim().to_lowercase();
  !email.is_empty() && allowlist.iter().any(|entry| entry.trim().to_lowercase() == email)
}
