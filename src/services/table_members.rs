//! Poll worker assignments

use super::views::{account_summary, voting_table_summary};
use crate::integrity::{ensure_unique, promote_role_if_needed, require};
use crate::model::{
    Account, NewTableMember, TableMember, TableMemberDetails, TableMemberPatch, VotingTable,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::{Id, Role};
use crate::Result;
use std::sync::Arc;
use tracing::info;

fn load(tx: &impl Transaction, member: TableMember) -> Result<TableMemberDetails> {
    let table = require::<VotingTable>(tx, member.voting_table_id)?;
    Ok(TableMemberDetails {
        id: member.id,
        account: account_summary(tx, member.account_id)?,
        voting_table: voting_table_summary(tx, &table)?,
        role_in_table: member.role_in_table,
    })
}

pub struct TableMemberService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> TableMemberService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Assign an account to a table, promoting it to the table-member role
    pub async fn create(&self, input: NewTableMember) -> Result<ServiceResponse<TableMemberDetails>> {
        let mut tx = self.store.begin().await?;
        let account = require::<Account>(&tx, input.account_id)?;
        require::<VotingTable>(&tx, input.voting_table_id)?;
        ensure_unique::<TableMember>(
            &tx,
            "account_id",
            &input.account_id.to_string(),
            None,
            "This account is already a table member",
        )?;

        promote_role_if_needed(&mut tx, account, Role::TableMember)?;
        let member = tx.insert(TableMember {
            id: 0,
            account_id: input.account_id,
            voting_table_id: input.voting_table_id,
            role_in_table: input.role_in_table,
        })?;
        let details = load(&tx, member)?;
        tx.commit()?;

        info!(
            "🧾 Account {} assigned to voting table {}",
            details.account.id, details.voting_table.code
        );
        Ok(ServiceResponse::created("Table member created successfully", details))
    }

    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<TableMemberDetails>>> {
        let tx = self.store.begin().await?;
        let members = tx
            .list::<TableMember>()
            .into_iter()
            .map(|member| load(&tx, member))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Table members retrieved successfully", members))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<TableMemberDetails>> {
        let tx = self.store.begin().await?;
        let member = require::<TableMember>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Table member retrieved successfully",
            load(&tx, member)?,
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: TableMemberPatch,
    ) -> Result<ServiceResponse<TableMemberDetails>> {
        let mut tx = self.store.begin().await?;
        let mut member = require::<TableMember>(&tx, id)?;

        if let Some(table_id) = patch.voting_table_id {
            require::<VotingTable>(&tx, table_id)?;
            member.voting_table_id = table_id;
        }
        patch.role_in_table.apply_to(&mut member.role_in_table);

        let member = tx.update(member)?;
        let details = load(&tx, member)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Table member updated successfully", details))
    }

    /// Remove the assignment; the account keeps its role
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<TableMember>> {
        let mut tx = self.store.begin().await?;
        let member = tx.delete::<TableMember>(id)?;
        tx.commit()?;

        info!("🗑️ Table member {} removed", member.id);
        Ok(ServiceResponse::ok("Table member removed successfully", member))
    }
}
