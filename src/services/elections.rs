//! Elections and their calendars of electoral events

use crate::integrity::require;
use crate::model::{
    Election, ElectionDetails, ElectionPatch, ElectoralEvent, ElectoralEventPatch, NewElection,
    NewElectoralEvent, require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

fn events_of(tx: &impl Transaction, election_id: Id) -> Vec<ElectoralEvent> {
    let mut events = tx.find_where::<ElectoralEvent>(|event| event.election_id == election_id);
    events.sort_by_key(|event| (event.date, event.id));
    events
}

fn load(tx: &impl Transaction, election: Election) -> ElectionDetails {
    ElectionDetails {
        electoral_events: events_of(tx, election.id),
        election,
    }
}

pub struct ElectionService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> ElectionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewElection) -> Result<ServiceResponse<ElectionDetails>> {
        require_text("name", &input.name)?;

        let mut tx = self.store.begin().await?;
        let election = tx.insert(Election {
            id: 0,
            name: input.name.trim().to_string(),
            description: input.description,
            kind: input.kind,
            date: input.date,
            created_at: Utc::now(),
        })?;
        let details = load(&tx, election);
        tx.commit()?;

        info!("📅 Election {} scheduled for {}", details.election.id, details.election.date);
        Ok(ServiceResponse::created("Election created successfully", details))
    }

    /// All elections by date
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<ElectionDetails>>> {
        let tx = self.store.begin().await?;
        let mut elections = tx.list::<Election>();
        elections.sort_by_key(|election| (election.date, election.id));
        let elections = elections
            .into_iter()
            .map(|election| load(&tx, election))
            .collect();
        Ok(ServiceResponse::ok("Elections retrieved successfully", elections))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<ElectionDetails>> {
        let tx = self.store.begin().await?;
        let election = require::<Election>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Election retrieved successfully",
            load(&tx, election),
        ))
    }

    pub async fn update(&self, id: Id, patch: ElectionPatch) -> Result<ServiceResponse<ElectionDetails>> {
        let mut tx = self.store.begin().await?;
        let mut election = require::<Election>(&tx, id)?;

        if let Some(name) = patch.name {
            require_text("name", &name)?;
            election.name = name.trim().to_string();
        }
        patch.description.apply_to(&mut election.description);
        if let Some(kind) = patch.kind {
            election.kind = kind;
        }
        if let Some(date) = patch.date {
            election.date = date;
        }

        let election = tx.update(election)?;
        let details = load(&tx, election);
        tx.commit()?;

        Ok(ServiceResponse::ok("Election updated successfully", details))
    }

    /// Removes the election with its events and vote intentions
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<Election>> {
        let mut tx = self.store.begin().await?;
        let election = tx.delete::<Election>(id)?;
        tx.commit()?;

        info!("🗑️ Election {} removed", election.id);
        Ok(ServiceResponse::ok("Election removed successfully", election))
    }
}

pub struct ElectoralEventService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> ElectoralEventService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Events are published unless stated otherwise
    pub async fn create(&self, input: NewElectoralEvent) -> Result<ServiceResponse<ElectoralEvent>> {
        require_text("name", &input.name)?;

        let mut tx = self.store.begin().await?;
        require::<Election>(&tx, input.election_id)?;
        let event = tx.insert(ElectoralEvent {
            id: 0,
            election_id: input.election_id,
            name: input.name.trim().to_string(),
            description: input.description,
            date: input.date,
            category: input.category,
            is_published: input.is_published.unwrap_or(true),
        })?;
        tx.commit()?;

        Ok(ServiceResponse::created("Electoral event created successfully", event))
    }

    /// All events by date
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<ElectoralEvent>>> {
        let tx = self.store.begin().await?;
        let mut events = tx.list::<ElectoralEvent>();
        events.sort_by_key(|event| (event.date, event.id));
        Ok(ServiceResponse::ok("Electoral events retrieved successfully", events))
    }

    /// Published events of one election, by date
    pub async fn find_published(&self, election_id: Id) -> Result<ServiceResponse<Vec<ElectoralEvent>>> {
        let tx = self.store.begin().await?;
        require::<Election>(&tx, election_id)?;
        let events = events_of(&tx, election_id)
            .into_iter()
            .filter(|event| event.is_published)
            .collect();
        Ok(ServiceResponse::ok("Electoral events retrieved successfully", events))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<ElectoralEvent>> {
        let tx = self.store.begin().await?;
        let event = require::<ElectoralEvent>(&tx, id)?;
        Ok(ServiceResponse::ok("Electoral event retrieved successfully", event))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: ElectoralEventPatch,
    ) -> Result<ServiceResponse<ElectoralEvent>> {
        let mut tx = self.store.begin().await?;
        let mut event = require::<ElectoralEvent>(&tx, id)?;

        if let Some(election_id) = patch.election_id {
            require::<Election>(&tx, election_id)?;
            event.election_id = election_id;
        }
        if let Some(name) = patch.name {
            require_text("name", &name)?;
            event.name = name.trim().to_string();
        }
        patch.description.apply_to(&mut event.description);
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(category) = patch.category {
            event.category = category;
        }
        if let Some(is_published) = patch.is_published {
            event.is_published = is_published;
        }

        let event = tx.update(event)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Electoral event updated successfully", event))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<ElectoralEvent>> {
        let mut tx = self.store.begin().await?;
        let event = tx.delete::<ElectoralEvent>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Electoral event removed successfully", event))
    }
}
