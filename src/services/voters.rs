//! Voter profiles and citizen pre-registration

use super::views::{account_summary, voting_table_summary};
use crate::integrity::{ensure_unique, require, require_optional, require_patched};
use crate::model::{
    Account, NewVoterProfile, PreRegisteredVoter, PreRegistration, VoterDetails, VoterProfile,
    VoterProfilePatch, VotingTable, require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::{Id, Role};
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

const DOCUMENT_TAKEN: &str = "Document number is already registered to another voter";

fn load(tx: &impl Transaction, voter: VoterProfile) -> Result<VoterDetails> {
    let voting_table = match require_optional::<VotingTable>(tx, voter.voting_table_id)? {
        Some(table) => Some(voting_table_summary(tx, &table)?),
        None => None,
    };

    Ok(VoterDetails {
        id: voter.id,
        account: account_summary(tx, voter.account_id)?,
        document_number: voter.document_number,
        created_at: voter.created_at,
        updated_at: voter.updated_at,
        voting_table,
    })
}

pub struct VoterService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> VoterService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Attach a voter profile to an existing account
    pub async fn create(&self, input: NewVoterProfile) -> Result<ServiceResponse<VoterDetails>> {
        let document_number = input.document_number.trim().to_string();
        require_text("documentNumber", &document_number)?;

        let mut tx = self.store.begin().await?;
        require::<Account>(&tx, input.account_id)?;
        ensure_unique::<VoterProfile>(
            &tx,
            "account_id",
            &input.account_id.to_string(),
            None,
            "This account already has a voter profile",
        )?;
        ensure_unique::<VoterProfile>(&tx, "document_number", &document_number, None, DOCUMENT_TAKEN)?;
        require_optional::<VotingTable>(&tx, input.voting_table_id)?;

        let voter = tx.insert(VoterProfile::new(
            input.account_id,
            document_number,
            input.voting_table_id,
        ))?;
        let details = load(&tx, voter)?;
        tx.commit()?;

        info!("🪪 Voter profile {} created for account {}", details.id, details.account.id);
        Ok(ServiceResponse::created("Voter profile created successfully", details))
    }

    /// Create an unclaimed account and its voter profile from a document number
    ///
    /// The account has no email, no password and stays inactive until the
    /// holder registers an email and redeems the activation token.
    pub async fn pre_register(
        &self,
        input: PreRegistration,
    ) -> Result<ServiceResponse<PreRegisteredVoter>> {
        require_text("name", &input.name)?;
        let document_number = input.document_number.trim().to_string();
        require_text("documentNumber", &document_number)?;

        let mut tx = self.store.begin().await?;
        ensure_unique::<VoterProfile>(&tx, "document_number", &document_number, None, DOCUMENT_TAKEN)?;
        require_optional::<VotingTable>(&tx, input.voting_table_id)?;

        let account = tx.insert(Account::new(input.name.trim().to_string(), Role::Voter))?;
        let voter = tx.insert(VoterProfile::new(
            account.id,
            document_number,
            input.voting_table_id,
        ))?;
        let voter = load(&tx, voter)?;
        tx.commit()?;

        info!("🪪 Voter pre-registered: account {} profile {}", account.id, voter.id);
        Ok(ServiceResponse::created(
            "Voter pre-registered; register an email to activate the account",
            PreRegisteredVoter {
                account: account.view(),
                voter,
            },
        ))
    }

    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<VoterDetails>>> {
        let tx = self.store.begin().await?;
        let voters = tx
            .list::<VoterProfile>()
            .into_iter()
            .map(|voter| load(&tx, voter))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Voter profiles retrieved successfully", voters))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<VoterDetails>> {
        let tx = self.store.begin().await?;
        let voter = require::<VoterProfile>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Voter profile retrieved successfully",
            load(&tx, voter)?,
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: VoterProfilePatch,
    ) -> Result<ServiceResponse<VoterDetails>> {
        let mut tx = self.store.begin().await?;
        let mut voter = require::<VoterProfile>(&tx, id)?;

        if let Some(document_number) = patch.document_number {
            let document_number = document_number.trim().to_string();
            require_text("documentNumber", &document_number)?;
            ensure_unique::<VoterProfile>(
                &tx,
                "document_number",
                &document_number,
                Some(id),
                DOCUMENT_TAKEN,
            )?;
            voter.document_number = document_number;
        }
        require_patched::<VotingTable>(&tx, &patch.voting_table_id)?;
        patch.voting_table_id.apply_to(&mut voter.voting_table_id);
        voter.updated_at = Utc::now();

        let voter = tx.update(voter)?;
        let details = load(&tx, voter)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Voter profile updated successfully", details))
    }

    /// Remove the profile; the account is left in place
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<VoterProfile>> {
        let mut tx = self.store.begin().await?;
        let voter = tx.delete::<VoterProfile>(id)?;
        tx.commit()?;

        info!("🗑️ Voter profile {} removed", voter.id);
        Ok(ServiceResponse::ok("Voter profile removed successfully", voter))
    }
}
