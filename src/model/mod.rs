//! Entity records, their inputs and their read views
//!
//! Every persisted entity is a plain struct implementing
//! [`crate::store::Record`]; the impl declares its unique keys and foreign
//! keys so the store can enforce them. Next to each record live:
//!
//! - `New*` inputs for creation (required fields plain, optional fields `Option`)
//! - `*Patch` inputs for partial updates (required fields `Option`, nullable
//!   fields [`crate::patch::Patch`])
//! - `*Details`/`*Summary` views returned to callers with related records embedded

pub mod account;
pub mod candidate;
pub mod content;
pub mod electoral;
pub mod geography;
pub mod moderation;
pub mod table_member;
pub mod vote_intention;
pub mod voter;

pub use account::{Account, AccountPatch, AccountState, AccountSummary, AccountView, NewAccount};
pub use candidate::*;
pub use content::*;
pub use electoral::*;
pub use geography::*;
pub use moderation::*;
pub use table_member::*;
pub use vote_intention::*;
pub use voter::*;

use crate::{Error, Result};

/// Reject blank strings for required text fields
pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Minimal email shape check; deliverability is proven by activation
pub(crate) fn require_email(value: &str) -> Result<()> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(Error::validation("email", "must be a valid email address")),
    }
}

/// Reject year ranges that end before they start
pub(crate) fn require_year_order(field: &str, from: Option<i32>, to: Option<i32>) -> Result<()> {
    match (from, to) {
        (Some(from), Some(to)) if to < from => {
            Err(Error::validation(field, "must not precede the starting year"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_validation() {
        assert!(require_text("name", "Ana").is_ok());
        assert!(require_text("name", "   ").is_err());

        assert!(require_email("ana@example.pe").is_ok());
        assert!(require_email("ana.example.pe").is_err());
        assert!(require_email("@example.pe").is_err());

        assert!(require_year_order("toYear", Some(2026), Some(2031)).is_ok());
        assert!(require_year_order("toYear", Some(2031), Some(2026)).is_err());
        assert!(require_year_order("toYear", None, Some(2026)).is_ok());
    }
}
