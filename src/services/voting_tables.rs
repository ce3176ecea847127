//! Voting tables and the people assigned to them

use super::views::account_summary;
use crate::integrity::{ensure_unique, require};
use crate::model::{
    NewVotingTable, TableMember, TableStaff, TableVoter, VoterProfile, VotingCenter, VotingTable,
    VotingTableDetails, VotingTablePatch, require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub const CODE_TAKEN: &str = "A voting table with this code already exists";

fn load(tx: &impl Transaction, table: VotingTable) -> Result<VotingTableDetails> {
    let voting_center = require::<VotingCenter>(tx, table.voting_center_id)?;

    let voters = tx
        .find_where::<VoterProfile>(|voter| voter.voting_table_id == Some(table.id))
        .into_iter()
        .map(|voter| {
            Ok(TableVoter {
                id: voter.id,
                account: account_summary(tx, voter.account_id)?,
                document_number: voter.document_number,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let members = tx
        .find_where::<TableMember>(|member| member.voting_table_id == table.id)
        .into_iter()
        .map(|member| {
            Ok(TableStaff {
                id: member.id,
                account: account_summary(tx, member.account_id)?,
                role_in_table: member.role_in_table,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(VotingTableDetails {
        voting_center,
        voters,
        members,
        table,
    })
}

pub struct VotingTableService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> VotingTableService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewVotingTable) -> Result<ServiceResponse<VotingTableDetails>> {
        require_text("code", &input.code)?;
        let code = input.code.trim().to_string();

        let mut tx = self.store.begin().await?;
        require::<VotingCenter>(&tx, input.voting_center_id)?;
        ensure_unique::<VotingTable>(&tx, "code", &code, None, CODE_TAKEN)?;

        let table = tx.insert(VotingTable {
            id: 0,
            code,
            voting_center_id: input.voting_center_id,
            room: input.room,
            floor: input.floor,
        })?;
        let details = load(&tx, table)?;
        tx.commit()?;

        info!(
            "🗳️ Voting table {} opened in voting center {}",
            details.table.code, details.voting_center.id
        );
        Ok(ServiceResponse::created("Voting table created successfully", details))
    }

    /// Tables grouped by center, then by code
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<VotingTableDetails>>> {
        let tx = self.store.begin().await?;
        let mut tables = tx.list::<VotingTable>();
        tables.sort_by(|a, b| {
            a.voting_center_id
                .cmp(&b.voting_center_id)
                .then_with(|| a.code.cmp(&b.code))
        });
        let tables = tables
            .into_iter()
            .map(|table| load(&tx, table))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Voting tables retrieved successfully", tables))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<VotingTableDetails>> {
        let tx = self.store.begin().await?;
        let table = require::<VotingTable>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Voting table retrieved successfully",
            load(&tx, table)?,
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: VotingTablePatch,
    ) -> Result<ServiceResponse<VotingTableDetails>> {
        let mut tx = self.store.begin().await?;
        let mut table = require::<VotingTable>(&tx, id)?;

        if let Some(code) = patch.code {
            require_text("code", &code)?;
            let code = code.trim().to_string();
            ensure_unique::<VotingTable>(&tx, "code", &code, Some(id), CODE_TAKEN)?;
            table.code = code;
        }
        if let Some(center_id) = patch.voting_center_id {
            require::<VotingCenter>(&tx, center_id)?;
            table.voting_center_id = center_id;
        }
        patch.room.apply_to(&mut table.room);
        patch.floor.apply_to(&mut table.floor);

        let table = tx.update(table)?;
        let details = load(&tx, table)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Voting table updated successfully", details))
    }

    /// Voters at the table lose their assignment; assigned table members block removal
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<VotingTable>> {
        let mut tx = self.store.begin().await?;
        let table = tx.delete::<VotingTable>(id)?;
        tx.commit()?;

        info!("🗑️ Voting table {} removed", table.code);
        Ok(ServiceResponse::ok("Voting table removed successfully", table))
    }
}
