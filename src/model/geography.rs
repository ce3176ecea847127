//! Voting centers and the voting tables inside them

use super::account::AccountSummary;
use crate::patch::Patch;
use crate::store::{Record, Reference, UniqueKey};
use crate::types::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingCenter {
    pub id: Id,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub sketch_url: Option<String>,
}

impl Record for VotingCenter {
    const ENTITY: &'static str = "voting center";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// A physical voting table, identified by its printed code
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingTable {
    pub id: Id,
    pub code: String,
    pub voting_center_id: Id,
    pub room: Option<String>,
    pub floor: Option<String>,
}

impl VotingTable {
    pub fn summary(&self, voting_center: VotingCenter) -> VotingTableSummary {
        VotingTableSummary {
            id: self.id,
            code: self.code.clone(),
            room: self.room.clone(),
            floor: self.floor.clone(),
            voting_center,
        }
    }
}

impl Record for VotingTable {
    const ENTITY: &'static str = "voting table";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("code", &self.code)]
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::restrict(VotingCenter::ENTITY, self.voting_center_id)]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVotingCenter {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub sketch_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingCenterPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Patch<f64>,
    #[serde(default)]
    pub longitude: Patch<f64>,
    #[serde(default)]
    pub department: Patch<String>,
    #[serde(default)]
    pub province: Patch<String>,
    #[serde(default)]
    pub district: Patch<String>,
    #[serde(default)]
    pub sketch_url: Patch<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVotingTable {
    pub code: String,
    pub voting_center_id: Id,
    pub room: Option<String>,
    pub floor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingTablePatch {
    pub code: Option<String>,
    pub voting_center_id: Option<Id>,
    #[serde(default)]
    pub room: Patch<String>,
    #[serde(default)]
    pub floor: Patch<String>,
}

/// Voting table with its center embedded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingTableSummary {
    pub id: Id,
    pub code: String,
    pub room: Option<String>,
    pub floor: Option<String>,
    pub voting_center: VotingCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingCenterDetails {
    #[serde(flatten)]
    pub center: VotingCenter,
    pub voting_tables: Vec<VotingTable>,
}

/// Voter registered at a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableVoter {
    pub id: Id,
    pub document_number: String,
    pub account: AccountSummary,
}

/// Poll worker assigned to a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStaff {
    pub id: Id,
    pub role_in_table: Option<String>,
    pub account: AccountSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingTableDetails {
    #[serde(flatten)]
    pub table: VotingTable,
    pub voting_center: VotingCenter,
    pub voters: Vec<TableVoter>,
    pub members: Vec<TableStaff>,
}
