//! Declared voting intentions

use super::account::{Account, AccountSummary};
use super::candidate::{Candidate, CandidateSummary};
use super::electoral::{Election, ElectionSummary};
use crate::store::{Record, Reference, UniqueKey};
use crate::types::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One account's declared preference for a candidate in an election
///
/// An account holds at most one intention per candidate and election.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteIntention {
    pub id: Id,
    pub account_id: Id,
    pub candidate_id: Id,
    pub election_id: Id,
    pub created_at: DateTime<Utc>,
}

impl VoteIntention {
    /// Composite key value for the (account, election, candidate) triple
    pub fn triple_key(account_id: Id, election_id: Id, candidate_id: Id) -> String {
        format!("{account_id}:{election_id}:{candidate_id}")
    }
}

impl Record for VoteIntention {
    const ENTITY: &'static str = "vote intention";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new(
            "account_election_candidate",
            Self::triple_key(self.account_id, self.election_id, self.candidate_id),
        )]
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::cascade(Account::ENTITY, self.account_id),
            Reference::cascade(Candidate::ENTITY, self.candidate_id),
            Reference::cascade(Election::ENTITY, self.election_id),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoteIntention {
    pub account_id: Id,
    pub candidate_id: Id,
    pub election_id: Id,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteIntentionPatch {
    pub account_id: Option<Id>,
    pub candidate_id: Option<Id>,
    pub election_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteIntentionDetails {
    pub id: Id,
    pub created_at: DateTime<Utc>,
    pub account: AccountSummary,
    pub candidate: CandidateSummary,
    pub election: ElectionSummary,
}
