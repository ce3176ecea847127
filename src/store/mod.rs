//! Record store interface
//!
//! The service layer talks to persistence only through [`RecordStore`] and
//! [`Transaction`]. A transaction is the unit of atomicity: every
//! validate-then-write sequence runs inside one, and a transaction that is
//! dropped without [`Transaction::commit`] leaves the store untouched.
//!
//! The store is the authoritative enforcer of unique keys and foreign keys.
//! Service-level checks exist to produce friendlier messages; a violation
//! that slips past them still surfaces as [`crate::Error::Conflict`] or
//! [`crate::Error::NotFound`].

pub mod memory;

use crate::Result;
use crate::types::Id;
use std::future::Future;

pub use memory::{MemoryStore, MemoryTransaction};

/// What happens to a referencing row when its parent is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Refuse the delete while the row exists
    Restrict,
    /// Delete the referencing row as well
    Cascade,
    /// Clear the reference on the row
    SetNull,
}

/// A value that must be unique among all rows of one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub name: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// A foreign key held by a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub entity: &'static str,
    pub id: Id,
    pub on_delete: OnDelete,
}

impl Reference {
    pub fn restrict(entity: &'static str, id: Id) -> Self {
        Self {
            entity,
            id,
            on_delete: OnDelete::Restrict,
        }
    }

    pub fn cascade(entity: &'static str, id: Id) -> Self {
        Self {
            entity,
            id,
            on_delete: OnDelete::Cascade,
        }
    }

    pub fn set_null(entity: &'static str, id: Id) -> Self {
        Self {
            entity,
            id,
            on_delete: OnDelete::SetNull,
        }
    }
}

/// A persisted entity
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable entity name, also used as the table name
    const ENTITY: &'static str;

    fn id(&self) -> Id;

    fn set_id(&mut self, id: Id);

    /// Unique keys held by this row; optional unique columns contribute
    /// a key only when present
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Foreign keys held by this row; optional columns contribute only
    /// when present
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Clear a nullable foreign key pointing at `entity`/`id`
    fn clear_reference(&mut self, _entity: &'static str, _id: Id) {}
}

/// An open unit of work against the store
pub trait Transaction: Send {
    fn get<R: Record>(&self, id: Id) -> Option<R>;

    /// Look a row up by one of its unique keys
    fn find_unique<R: Record>(&self, key: &str, value: &str) -> Option<R>;

    fn find_where<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R>;

    /// All rows of an entity in primary-key order
    fn list<R: Record>(&self) -> Vec<R>;

    /// Insert a row, assigning its primary key
    fn insert<R: Record>(&mut self, record: R) -> Result<R>;

    /// Replace an existing row with the same primary key
    fn update<R: Record>(&mut self, record: R) -> Result<R>;

    /// Delete a row, applying the on-delete policy of every referencing row
    fn delete<R: Record>(&mut self, id: Id) -> Result<R>;

    fn commit(self) -> Result<()>
    where
        Self: Sized;
}

/// Source of transactions
pub trait RecordStore: Send + Sync + 'static {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    /// Open a transaction; waits until the store can hand out a writer
    fn begin(&self) -> impl Future<Output = Result<Self::Tx<'_>>> + Send;
}
