//! Poll workers assigned to voting tables

use super::account::{Account, AccountSummary};
use super::geography::{VotingTable, VotingTableSummary};
use crate::patch::Patch;
use crate::store::{Record, Reference, UniqueKey};
use crate::types::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMember {
    pub id: Id,
    pub account_id: Id,
    pub voting_table_id: Id,
    pub role_in_table: Option<String>,
}

impl Record for TableMember {
    const ENTITY: &'static str = "table member";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("account_id", self.account_id)]
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::cascade(Account::ENTITY, self.account_id),
            Reference::restrict(VotingTable::ENTITY, self.voting_table_id),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTableMember {
    pub account_id: Id,
    pub voting_table_id: Id,
    pub role_in_table: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMemberPatch {
    pub voting_table_id: Option<Id>,
    #[serde(default)]
    pub role_in_table: Patch<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMemberDetails {
    pub id: Id,
    pub role_in_table: Option<String>,
    pub account: AccountSummary,
    pub voting_table: VotingTableSummary,
}
