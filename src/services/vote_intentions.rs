//! Declared voting intentions

use super::views::{account_summary, candidate_summary, newest_first};
use crate::integrity::{ensure_unique, require};
use crate::model::{
    Account, Candidate, Election, NewVoteIntention, VoteIntention, VoteIntentionDetails,
    VoteIntentionPatch,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

const ALREADY_DECLARED: &str =
    "This account already declared an intention for this candidate in this election";

fn load(tx: &impl Transaction, intention: VoteIntention) -> Result<VoteIntentionDetails> {
    let candidate = require::<Candidate>(tx, intention.candidate_id)?;
    let election = require::<Election>(tx, intention.election_id)?;
    Ok(VoteIntentionDetails {
        id: intention.id,
        created_at: intention.created_at,
        account: account_summary(tx, intention.account_id)?,
        candidate: candidate_summary(tx, &candidate)?,
        election: election.summary(),
    })
}

/// Parents must exist and the triple must be unused by any other intention
fn validate(tx: &impl Transaction, intention: &VoteIntention) -> Result<()> {
    require::<Account>(tx, intention.account_id)?;
    require::<Candidate>(tx, intention.candidate_id)?;
    require::<Election>(tx, intention.election_id)?;

    let key = VoteIntention::triple_key(
        intention.account_id,
        intention.election_id,
        intention.candidate_id,
    );
    let except = (intention.id != 0).then_some(intention.id);
    ensure_unique::<VoteIntention>(tx, "account_election_candidate", &key, except, ALREADY_DECLARED)
}

pub struct VoteIntentionService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> VoteIntentionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        input: NewVoteIntention,
    ) -> Result<ServiceResponse<VoteIntentionDetails>> {
        let intention = VoteIntention {
            id: 0,
            account_id: input.account_id,
            candidate_id: input.candidate_id,
            election_id: input.election_id,
            created_at: Utc::now(),
        };

        let mut tx = self.store.begin().await?;
        validate(&tx, &intention)?;
        let intention = tx.insert(intention)?;
        let details = load(&tx, intention)?;
        tx.commit()?;

        info!(
            "🗳️ Vote intention {} declared for candidate {} in election {}",
            details.id, details.candidate.id, details.election.id
        );
        Ok(ServiceResponse::created("Vote intention created successfully", details))
    }

    /// All intentions, newest first
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<VoteIntentionDetails>>> {
        let tx = self.store.begin().await?;
        let mut intentions = tx.list::<VoteIntention>();
        newest_first(&mut intentions, |intention| (intention.created_at, intention.id));
        let intentions = intentions
            .into_iter()
            .map(|intention| load(&tx, intention))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Vote intentions retrieved successfully", intentions))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<VoteIntentionDetails>> {
        let tx = self.store.begin().await?;
        let intention = require::<VoteIntention>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Vote intention retrieved successfully",
            load(&tx, intention)?,
        ))
    }

    /// Change any member of the triple; the result must still be unique
    pub async fn update(
        &self,
        id: Id,
        patch: VoteIntentionPatch,
    ) -> Result<ServiceResponse<VoteIntentionDetails>> {
        let mut tx = self.store.begin().await?;
        let mut intention = require::<VoteIntention>(&tx, id)?;

        if let Some(account_id) = patch.account_id {
            intention.account_id = account_id;
        }
        if let Some(candidate_id) = patch.candidate_id {
            intention.candidate_id = candidate_id;
        }
        if let Some(election_id) = patch.election_id {
            intention.election_id = election_id;
        }
        validate(&tx, &intention)?;

        let intention = tx.update(intention)?;
        let details = load(&tx, intention)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Vote intention updated successfully", details))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<VoteIntention>> {
        let mut tx = self.store.begin().await?;
        let intention = tx.delete::<VoteIntention>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Vote intention removed successfully", intention))
    }
}
