//! Loaders for the summaries embedded in several read views

use crate::integrity::{require, require_optional};
use crate::model::{
    Account, AccountSummary, Candidate, CandidateSummary, PoliticalGroup, VotingCenter,
    VotingTable, VotingTableSummary,
};
use crate::store::Transaction;
use crate::types::Id;
use crate::Result;
use chrono::{DateTime, Utc};

pub(crate) fn account_summary(tx: &impl Transaction, account_id: Id) -> Result<AccountSummary> {
    Ok(require::<Account>(tx, account_id)?.summary())
}

pub(crate) fn optional_account_summary(
    tx: &impl Transaction,
    account_id: Option<Id>,
) -> Result<Option<AccountSummary>> {
    Ok(require_optional::<Account>(tx, account_id)?.map(|account| account.summary()))
}

pub(crate) fn voting_table_summary(
    tx: &impl Transaction,
    table: &VotingTable,
) -> Result<VotingTableSummary> {
    let center = require::<VotingCenter>(tx, table.voting_center_id)?;
    Ok(table.summary(center))
}

pub(crate) fn candidate_summary(
    tx: &impl Transaction,
    candidate: &Candidate,
) -> Result<CandidateSummary> {
    let group = require::<PoliticalGroup>(tx, candidate.political_group_id)?;
    Ok(candidate.summary(Some(group.summary())))
}

/// Sort newest first, ties broken by id so the order is stable
pub(crate) fn newest_first<R>(rows: &mut [R], key: impl Fn(&R) -> (DateTime<Utc>, Id)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}
