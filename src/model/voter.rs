//! Voter profiles: the link between an account and a national document

use super::account::{Account, AccountSummary, AccountView};
use super::geography::{VotingTable, VotingTableSummary};
use crate::patch::Patch;
use crate::store::{Record, Reference, UniqueKey};
use crate::types::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterProfile {
    pub id: Id,
    pub account_id: Id,
    pub document_number: String,
    pub voting_table_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VoterProfile {
    pub fn new(account_id: Id, document_number: String, voting_table_id: Option<Id>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            account_id,
            document_number,
            voting_table_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for VoterProfile {
    const ENTITY: &'static str = "voter profile";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new("account_id", self.account_id),
            UniqueKey::new("document_number", &self.document_number),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = vec![Reference::cascade(Account::ENTITY, self.account_id)];
        if let Some(table_id) = self.voting_table_id {
            references.push(Reference::set_null(VotingTable::ENTITY, table_id));
        }
        references
    }

    fn clear_reference(&mut self, entity: &'static str, id: Id) {
        if entity == VotingTable::ENTITY && self.voting_table_id == Some(id) {
            self.voting_table_id = None;
        }
    }
}

/// Citizen self-onboarding by document number
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRegistration {
    pub name: String,
    pub document_number: String,
    pub voting_table_id: Option<Id>,
}

/// Voter profile for an existing account
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoterProfile {
    pub account_id: Id,
    pub document_number: String,
    pub voting_table_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterProfilePatch {
    pub document_number: Option<String>,
    #[serde(default)]
    pub voting_table_id: Patch<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDetails {
    pub id: Id,
    pub document_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub account: AccountSummary,
    pub voting_table: Option<VotingTableSummary>,
}

/// Result of a pre-registration: the new account and its profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRegisteredVoter {
    pub account: AccountView,
    pub voter: VoterDetails,
}
