//! Political groups

use crate::integrity::require;
use crate::model::{
    Candidate, GovernmentPlan, NewPoliticalGroup, PoliticalGroup, PoliticalGroupDetails,
    PoliticalGroupPatch, require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

fn load(tx: &impl Transaction, group: PoliticalGroup) -> PoliticalGroupDetails {
    let summary = group.summary();

    let mut candidates = tx.find_where::<Candidate>(|candidate| candidate.political_group_id == group.id);
    candidates.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    let mut government_plans = tx.find_where::<GovernmentPlan>(|plan| plan.political_group_id == group.id);
    government_plans.sort_by_key(|plan| (plan.from_year, plan.id));

    PoliticalGroupDetails {
        candidates: candidates
            .iter()
            .map(|candidate| candidate.summary(Some(summary.clone())))
            .collect(),
        government_plans,
        group,
    }
}

pub struct PoliticalGroupService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> PoliticalGroupService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        input: NewPoliticalGroup,
    ) -> Result<ServiceResponse<PoliticalGroupDetails>> {
        require_text("name", &input.name)?;

        let mut tx = self.store.begin().await?;
        let group = tx.insert(PoliticalGroup {
            id: 0,
            name: input.name.trim().to_string(),
            short_name: input.short_name,
            logo_url: input.logo_url,
            description: input.description,
            created_at: Utc::now(),
        })?;
        let details = load(&tx, group);
        tx.commit()?;

        info!("🏛️ Political group {} created", details.group.id);
        Ok(ServiceResponse::created("Political group created successfully", details))
    }

    /// All groups ordered by name
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<PoliticalGroupDetails>>> {
        let tx = self.store.begin().await?;
        let mut groups = tx.list::<PoliticalGroup>();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        let groups = groups.into_iter().map(|group| load(&tx, group)).collect();
        Ok(ServiceResponse::ok("Political groups retrieved successfully", groups))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<PoliticalGroupDetails>> {
        let tx = self.store.begin().await?;
        let group = require::<PoliticalGroup>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Political group retrieved successfully",
            load(&tx, group),
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: PoliticalGroupPatch,
    ) -> Result<ServiceResponse<PoliticalGroupDetails>> {
        let mut tx = self.store.begin().await?;
        let mut group = require::<PoliticalGroup>(&tx, id)?;

        if let Some(name) = patch.name {
            require_text("name", &name)?;
            group.name = name.trim().to_string();
        }
        patch.short_name.apply_to(&mut group.short_name);
        patch.logo_url.apply_to(&mut group.logo_url);
        patch.description.apply_to(&mut group.description);

        let group = tx.update(group)?;
        let details = load(&tx, group);
        tx.commit()?;

        Ok(ServiceResponse::ok("Political group updated successfully", details))
    }

    /// Refused while candidates still belong to the group; plans go with it
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<PoliticalGroup>> {
        let mut tx = self.store.begin().await?;
        let group = tx.delete::<PoliticalGroup>(id)?;
        tx.commit()?;

        info!("🗑️ Political group {} removed", group.id);
        Ok(ServiceResponse::ok("Political group removed successfully", group))
    }
}
