//! Referential integrity checks shared by the entity services
//!
//! These run inside the caller's transaction before any write so the caller
//! gets an entity-specific error. The store repeats the checks on write.

use crate::model::Account;
use crate::patch::Patch;
use crate::store::{Record, Transaction};
use crate::types::{Id, Role};
use crate::{Error, Result};
use tracing::info;

/// Load a record or fail with `NotFound` naming its entity
pub fn require<R: Record>(tx: &impl Transaction, id: Id) -> Result<R> {
    tx.get::<R>(id).ok_or_else(|| Error::not_found(R::ENTITY))
}

/// Load an optional reference; `None` is accepted as-is
pub fn require_optional<R: Record>(tx: &impl Transaction, id: Option<Id>) -> Result<Option<R>> {
    id.map(|id| require::<R>(tx, id)).transpose()
}

/// Validate a reference supplied in an update; only a new value is checked
pub fn require_patched<R: Record>(tx: &impl Transaction, patch: &Patch<Id>) -> Result<()> {
    if let Patch::Value(id) = patch {
        require::<R>(tx, *id)?;
    }
    Ok(())
}

/// Fail with `Conflict` when another row already holds `key = value`
///
/// `except` names the row being updated so it never conflicts with itself.
pub fn ensure_unique<R: Record>(
    tx: &impl Transaction,
    key: &str,
    value: &str,
    except: Option<Id>,
    message: &str,
) -> Result<()> {
    match tx.find_unique::<R>(key, value) {
        Some(holder) if Some(holder.id()) != except => Err(Error::conflict(message)),
        _ => Ok(()),
    }
}

/// Move an account to `target` unless it already holds that role; returns
/// the account as stored afterwards
pub fn promote_role_if_needed(
    tx: &mut impl Transaction,
    mut account: Account,
    target: Role,
) -> Result<Account> {
    if account.role == target {
        return Ok(account);
    }

    let previous = account.role;
    account.role = target;
    account.touch();
    let account = tx.update(account)?;
    info!(
        "🎖️ Account {} promoted from {} to {}",
        account.id, previous, target
    );
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RecordStore};

    #[tokio::test]
    async fn test_require_and_uniqueness() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let mut account = Account::new("Ana".to_string(), Role::Voter);
        account.email = Some("ana@example.pe".to_string());
        let account = tx.insert(account).unwrap();

        assert!(require::<Account>(&tx, account.id).is_ok());
        let missing = require::<Account>(&tx, 99).unwrap_err();
        assert_eq!(missing.to_string(), "account not found");

        assert!(require_optional::<Account>(&tx, None).unwrap().is_none());
        assert!(require_patched::<Account>(&tx, &Patch::Null).is_ok());
        assert!(require_patched::<Account>(&tx, &Patch::Value(99)).is_err());

        let taken = ensure_unique::<Account>(&tx, "email", "ana@example.pe", None, "taken");
        assert!(taken.unwrap_err().is_conflict());
        assert!(
            ensure_unique::<Account>(&tx, "email", "ana@example.pe", Some(account.id), "taken")
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_promotion_is_idempotent() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let voter = tx
            .insert(Account::new("Luis".to_string(), Role::Voter))
            .unwrap();
        let promoted = promote_role_if_needed(&mut tx, voter, Role::TableMember).unwrap();
        assert_eq!(promoted.role, Role::TableMember);
        let stamp = promoted.updated_at;

        let again = promote_role_if_needed(&mut tx, promoted, Role::TableMember).unwrap();
        assert_eq!(again.updated_at, stamp);
        assert_eq!(tx.get::<Account>(again.id).unwrap().role, Role::TableMember);
    }
}
