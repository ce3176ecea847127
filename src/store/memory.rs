//! In-memory record store
//!
//! Tables live behind one `tokio::sync::RwLock`. A transaction holds the write
//! guard for its whole lifetime, so transactions are serialized and every
//! check-then-write sequence inside one is atomic. Writes are recorded in an
//! undo log that is replayed in reverse when a transaction is dropped
//! without being committed.

use super::{OnDelete, Record, RecordStore, Reference, Transaction, UniqueKey};
use crate::types::Id;
use crate::{Error, Result, conflict, internal_error};
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, warn};

type ErasedRow = Box<dyn Any + Send + Sync>;

/// Rows of one entity keyed by primary key
struct Table<R> {
    rows: BTreeMap<Id, R>,
    next_id: Id,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<R: Record> Table<R> {
    fn holder_of(&self, key: &UniqueKey, except: Id) -> Option<&R> {
        self.rows
            .values()
            .find(|row| row.id() != except && row.unique_keys().contains(key))
    }
}

/// Type-erased table operations needed by cascading deletes
trait ErasedTable: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn contains(&self, id: Id) -> bool;
    fn len(&self) -> usize;
    /// Rows referencing `entity`/`id`, with the policy of that reference
    fn dependents(&self, entity: &'static str, id: Id) -> Vec<(Id, OnDelete)>;
    /// Clear set-null references to `entity`/`id`, returning prior row images
    fn detach(&mut self, entity: &'static str, id: Id) -> Vec<ErasedRow>;
    fn remove_row(&mut self, id: Id) -> Option<ErasedRow>;
    fn restore_row(&mut self, row: ErasedRow);
}

impl<R: Record> ErasedTable for Table<R> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn contains(&self, id: Id) -> bool {
        self.rows.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn dependents(&self, entity: &'static str, id: Id) -> Vec<(Id, OnDelete)> {
        self.rows
            .values()
            .flat_map(|row| {
                row.references()
                    .into_iter()
                    .filter(|reference| reference.entity == entity && reference.id == id)
                    .map(|reference| (row.id(), reference.on_delete))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn detach(&mut self, entity: &'static str, id: Id) -> Vec<ErasedRow> {
        let mut previous: Vec<ErasedRow> = Vec::new();
        for row in self.rows.values_mut() {
            let points_here = row.references().iter().any(|reference| {
                reference.entity == entity
                    && reference.id == id
                    && reference.on_delete == OnDelete::SetNull
            });
            if points_here {
                previous.push(Box::new(row.clone()));
                row.clear_reference(entity, id);
            }
        }
        previous
    }

    fn remove_row(&mut self, id: Id) -> Option<ErasedRow> {
        self.rows
            .remove(&id)
            .map(|row| Box::new(row) as ErasedRow)
    }

    fn restore_row(&mut self, row: ErasedRow) {
        match row.downcast::<R>() {
            Ok(row) => {
                self.rows.insert(row.id(), *row);
            }
            Err(_) => warn!("⚠️ Undo image does not match table {}", R::ENTITY),
        }
    }
}

/// All tables, created lazily on first write
#[derive(Default)]
struct Tables {
    by_entity: HashMap<&'static str, Box<dyn ErasedTable>>,
}

impl Tables {
    fn table<R: Record>(&self) -> Option<&Table<R>> {
        self.by_entity
            .get(R::ENTITY)
            .and_then(|table| table.as_any().downcast_ref::<Table<R>>())
    }

    fn table_mut<R: Record>(&mut self) -> Result<&mut Table<R>> {
        self.by_entity
            .entry(R::ENTITY)
            .or_insert_with(|| Box::new(Table::<R>::default()))
            .as_any_mut()
            .downcast_mut::<Table<R>>()
            .ok_or_else(|| internal_error!("table {} holds another record type", R::ENTITY))
    }

    fn contains(&self, entity: &'static str, id: Id) -> bool {
        self.by_entity
            .get(entity)
            .is_some_and(|table| table.contains(id))
    }
}

/// Row counts per entity
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    pub tables: usize,
    pub rows: BTreeMap<&'static str, usize>,
}

impl StoreStats {
    pub fn rows_of(&self, entity: &str) -> usize {
        self.rows.get(entity).copied().unwrap_or(0)
    }
}

/// Record store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of row counts
    pub async fn stats(&self) -> StoreStats {
        let tables = self.tables.read().await;
        StoreStats {
            tables: tables.by_entity.len(),
            rows: tables
                .by_entity
                .iter()
                .map(|(entity, table)| (*entity, table.len()))
                .collect(),
        }
    }
}

impl RecordStore for MemoryStore {
    type Tx<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> impl Future<Output = Result<MemoryTransaction<'_>>> + Send {
        async move {
            let tables = self.tables.write().await;
            Ok(MemoryTransaction {
                tables,
                undo: Vec::new(),
                committed: false,
            })
        }
    }
}

enum Undo {
    Inserted { entity: &'static str, id: Id },
    Restore { entity: &'static str, row: ErasedRow },
}

/// Exclusive transaction over a [`MemoryStore`]
pub struct MemoryTransaction<'a> {
    tables: RwLockWriteGuard<'a, Tables>,
    undo: Vec<Undo>,
    committed: bool,
}

impl MemoryTransaction<'_> {
    fn check_references(&self, references: &[Reference]) -> Result<()> {
        match references
            .iter()
            .find(|reference| !self.tables.contains(reference.entity, reference.id))
        {
            Some(missing) => Err(Error::not_found(missing.entity)),
            None => Ok(()),
        }
    }

    fn check_unique<R: Record>(&self, record: &R) -> Result<()> {
        let Some(table) = self.tables.table::<R>() else {
            return Ok(());
        };

        for key in record.unique_keys() {
            if table.holder_of(&key, record.id()).is_some() {
                return Err(conflict!(
                    "{} with {} '{}' already exists",
                    R::ENTITY,
                    key.name,
                    key.value
                ));
            }
        }
        Ok(())
    }

    fn remove_cascading(&mut self, entity: &'static str, id: Id) -> Result<()> {
        // Already removed through another cascade path
        if !self.tables.contains(entity, id) {
            return Ok(());
        }

        let mut cascades = Vec::new();
        let mut detaches: Vec<&'static str> = Vec::new();

        for (child_entity, table) in &self.tables.by_entity {
            for (child_id, policy) in table.dependents(entity, id) {
                match policy {
                    OnDelete::Restrict => {
                        return Err(conflict!(
                            "{} is still referenced by {} {}",
                            entity,
                            child_entity,
                            child_id
                        ));
                    }
                    OnDelete::Cascade => cascades.push((*child_entity, child_id)),
                    OnDelete::SetNull => {
                        if !detaches.contains(child_entity) {
                            detaches.push(*child_entity);
                        }
                    }
                }
            }
        }

        for child_entity in detaches {
            let previous = match self.tables.by_entity.get_mut(child_entity) {
                Some(table) => table.detach(entity, id),
                None => Vec::new(),
            };
            self.undo.extend(previous.into_iter().map(|row| Undo::Restore {
                entity: child_entity,
                row,
            }));
        }

        // Removing the row before recursing keeps reference cycles finite
        let removed = self
            .tables
            .by_entity
            .get_mut(entity)
            .and_then(|table| table.remove_row(id));
        if let Some(row) = removed {
            self.undo.push(Undo::Restore { entity, row });
        }

        for (child_entity, child_id) in cascades {
            self.remove_cascading(child_entity, child_id)?;
        }

        Ok(())
    }

    /// Undo writes recorded after `mark`
    fn rollback_to(&mut self, mark: usize) {
        let writes = self.undo.len().saturating_sub(mark);
        while self.undo.len() > mark {
            let Some(entry) = self.undo.pop() else {
                break;
            };
            match entry {
                Undo::Inserted { entity, id } => {
                    if let Some(table) = self.tables.by_entity.get_mut(entity) {
                        table.remove_row(id);
                    }
                }
                Undo::Restore { entity, row } => {
                    if let Some(table) = self.tables.by_entity.get_mut(entity) {
                        table.restore_row(row);
                    }
                }
            }
        }
        if writes > 0 {
            debug!("↩️ Transaction rolled back ({} writes undone)", writes);
        }
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn get<R: Record>(&self, id: Id) -> Option<R> {
        self.tables
            .table::<R>()
            .and_then(|table| table.rows.get(&id).cloned())
    }

    fn find_unique<R: Record>(&self, key: &str, value: &str) -> Option<R> {
        self.tables.table::<R>().and_then(|table| {
            table
                .rows
                .values()
                .find(|row| {
                    row.unique_keys()
                        .iter()
                        .any(|unique| unique.name == key && unique.value == value)
                })
                .cloned()
        })
    }

    fn find_where<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.tables
            .table::<R>()
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|row| predicate(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list<R: Record>(&self) -> Vec<R> {
        self.tables
            .table::<R>()
            .map(|table| table.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    fn insert<R: Record>(&mut self, mut record: R) -> Result<R> {
        self.check_references(&record.references())?;

        let id = self.tables.table_mut::<R>()?.next_id;
        record.set_id(id);
        self.check_unique(&record)?;

        let table = self.tables.table_mut::<R>()?;
        table.next_id += 1;
        table.rows.insert(id, record.clone());
        self.undo.push(Undo::Inserted {
            entity: R::ENTITY,
            id,
        });

        Ok(record)
    }

    fn update<R: Record>(&mut self, record: R) -> Result<R> {
        let previous = self
            .get::<R>(record.id())
            .ok_or_else(|| Error::not_found(R::ENTITY))?;

        self.check_references(&record.references())?;
        self.check_unique(&record)?;

        self.tables
            .table_mut::<R>()?
            .rows
            .insert(record.id(), record.clone());
        self.undo.push(Undo::Restore {
            entity: R::ENTITY,
            row: Box::new(previous),
        });

        Ok(record)
    }

    fn delete<R: Record>(&mut self, id: Id) -> Result<R> {
        let existing = self
            .get::<R>(id)
            .ok_or_else(|| Error::not_found(R::ENTITY))?;

        // A refused cascade leaves no partial removals behind
        let mark = self.undo.len();
        if let Err(error) = self.remove_cascading(R::ENTITY, id) {
            self.rollback_to(mark);
            return Err(error);
        }
        Ok(existing)
    }

    fn commit(mut self) -> Result<()> {
        self.committed = true;
        debug!("💾 Transaction committed ({} writes)", self.undo.len());
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback_to(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Center {
        id: Id,
        name: String,
    }

    impl Record for Center {
        const ENTITY: &'static str = "center";

        fn id(&self) -> Id {
            self.id
        }

        fn set_id(&mut self, id: Id) {
            self.id = id;
        }

        fn unique_keys(&self) -> Vec<UniqueKey> {
            vec![UniqueKey::new("name", &self.name)]
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Desk {
        id: Id,
        center_id: Id,
        backup_center_id: Option<Id>,
    }

    impl Record for Desk {
        const ENTITY: &'static str = "desk";

        fn id(&self) -> Id {
            self.id
        }

        fn set_id(&mut self, id: Id) {
            self.id = id;
        }

        fn references(&self) -> Vec<Reference> {
            let mut references = vec![Reference::cascade(Center::ENTITY, self.center_id)];
            if let Some(backup) = self.backup_center_id {
                references.push(Reference::set_null(Center::ENTITY, backup));
            }
            references
        }

        fn clear_reference(&mut self, entity: &'static str, id: Id) {
            if entity == Center::ENTITY && self.backup_center_id == Some(id) {
                self.backup_center_id = None;
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Seat {
        id: Id,
        desk_id: Id,
    }

    impl Record for Seat {
        const ENTITY: &'static str = "seat";

        fn id(&self) -> Id {
            self.id
        }

        fn set_id(&mut self, id: Id) {
            self.id = id;
        }

        fn references(&self) -> Vec<Reference> {
            vec![Reference::restrict(Desk::ENTITY, self.desk_id)]
        }
    }

    fn center(name: &str) -> Center {
        Center {
            id: 0,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_ids_and_enforces_unique_keys() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let mut tx = store.begin().await.unwrap();

            let first = tx.insert(center("Lima")).unwrap();
            let second = tx.insert(center("Cusco")).unwrap();
            assert_eq!(first.id, 1);
            assert_eq!(second.id, 2);

            let duplicate = tx.insert(center("Lima")).unwrap_err();
            assert!(duplicate.is_conflict());

            let found: Option<Center> = tx.find_unique("name", "Cusco");
            assert_eq!(found.map(|c| c.id), Some(2));
            tx.commit().unwrap();
        });
    }

    #[test]
    fn test_missing_reference_is_not_found() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let mut tx = store.begin().await.unwrap();

            let err = tx
                .insert(Desk {
                    id: 0,
                    center_id: 42,
                    backup_center_id: None,
                })
                .unwrap_err();
            assert_eq!(err.to_string(), "center not found");
        });
    }

    #[test]
    fn test_uncommitted_transaction_rolls_back() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            {
                let mut tx = store.begin().await.unwrap();
                tx.insert(center("Lima")).unwrap();
                tx.commit().unwrap();
            }
            {
                let mut tx = store.begin().await.unwrap();
                tx.insert(center("Arequipa")).unwrap();
                let mut lima: Center = tx.get(1).unwrap();
                lima.name = "Lima Metropolitana".to_string();
                tx.update(lima).unwrap();
                tx.delete::<Center>(1).unwrap();
                // dropped without commit
            }

            let tx = store.begin().await.unwrap();
            let centers: Vec<Center> = tx.list();
            assert_eq!(centers, vec![Center { id: 1, name: "Lima".to_string() }]);
        });
    }

    #[test]
    fn test_delete_policies() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let mut tx = store.begin().await.unwrap();

            let lima = tx.insert(center("Lima")).unwrap();
            let cusco = tx.insert(center("Cusco")).unwrap();
            let desk = tx
                .insert(Desk {
                    id: 0,
                    center_id: lima.id,
                    backup_center_id: Some(cusco.id),
                })
                .unwrap();

            // Set-null: the desk survives, its backup is cleared
            tx.delete::<Center>(cusco.id).unwrap();
            let reloaded: Desk = tx.get(desk.id).unwrap();
            assert_eq!(reloaded.backup_center_id, None);

            // Restrict: a seat blocks deleting its desk, and through it the center
            tx.insert(Seat {
                id: 0,
                desk_id: desk.id,
            })
            .unwrap();
            assert!(tx.delete::<Desk>(desk.id).unwrap_err().is_conflict());
            assert!(tx.delete::<Center>(lima.id).unwrap_err().is_conflict());
            tx.commit().unwrap();

            // Cascade: without the seat, deleting the center removes the desk
            let mut tx = store.begin().await.unwrap();
            tx.delete::<Seat>(1).unwrap();
            tx.delete::<Center>(lima.id).unwrap();
            assert!(tx.get::<Desk>(desk.id).is_none());
            tx.commit().unwrap();

            let stats = store.stats().await;
            assert_eq!(stats.rows_of("desk"), 0);
            assert_eq!(stats.rows_of("center"), 0);
        });
    }
}
