//! Government plans and their thematic sections

use crate::integrity::require;
use crate::model::{
    GovernmentPlan, GovernmentPlanDetails, GovernmentPlanPatch, GovernmentPlanSection,
    GovernmentPlanSectionPatch, NewGovernmentPlan, NewGovernmentPlanSection, PoliticalGroup,
    require_text, require_year_order,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::Result;
use std::sync::Arc;
use tracing::info;

fn load(tx: &impl Transaction, plan: GovernmentPlan) -> Result<GovernmentPlanDetails> {
    let group = require::<PoliticalGroup>(tx, plan.political_group_id)?;
    let mut sections =
        tx.find_where::<GovernmentPlanSection>(|section| section.government_plan_id == plan.id);
    sections.sort_by_key(|section| (section.order, section.id));

    Ok(GovernmentPlanDetails {
        political_group: group.summary(),
        sections,
        plan,
    })
}

pub struct GovernmentPlanService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> GovernmentPlanService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        input: NewGovernmentPlan,
    ) -> Result<ServiceResponse<GovernmentPlanDetails>> {
        require_text("title", &input.title)?;
        require_year_order("toYear", input.from_year, input.to_year)?;

        let mut tx = self.store.begin().await?;
        require::<PoliticalGroup>(&tx, input.political_group_id)?;
        let plan = tx.insert(GovernmentPlan {
            id: 0,
            political_group_id: input.political_group_id,
            title: input.title.trim().to_string(),
            description: input.description,
            document_url: input.document_url,
            from_year: input.from_year,
            to_year: input.to_year,
        })?;
        let details = load(&tx, plan)?;
        tx.commit()?;

        info!(
            "📘 Government plan {} filed by political group {}",
            details.plan.id, details.political_group.id
        );
        Ok(ServiceResponse::created("Government plan created successfully", details))
    }

    /// Plans grouped by political group, then by starting year
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<GovernmentPlanDetails>>> {
        let tx = self.store.begin().await?;
        let mut plans = tx.list::<GovernmentPlan>();
        plans.sort_by_key(|plan| (plan.political_group_id, plan.from_year, plan.id));
        let plans = plans
            .into_iter()
            .map(|plan| load(&tx, plan))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Government plans retrieved successfully", plans))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<GovernmentPlanDetails>> {
        let tx = self.store.begin().await?;
        let plan = require::<GovernmentPlan>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Government plan retrieved successfully",
            load(&tx, plan)?,
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: GovernmentPlanPatch,
    ) -> Result<ServiceResponse<GovernmentPlanDetails>> {
        let mut tx = self.store.begin().await?;
        let mut plan = require::<GovernmentPlan>(&tx, id)?;

        if let Some(group_id) = patch.political_group_id {
            require::<PoliticalGroup>(&tx, group_id)?;
            plan.political_group_id = group_id;
        }
        if let Some(title) = patch.title {
            require_text("title", &title)?;
            plan.title = title.trim().to_string();
        }
        patch.description.apply_to(&mut plan.description);
        patch.document_url.apply_to(&mut plan.document_url);
        patch.from_year.apply_to(&mut plan.from_year);
        patch.to_year.apply_to(&mut plan.to_year);
        require_year_order("toYear", plan.from_year, plan.to_year)?;

        let plan = tx.update(plan)?;
        let details = load(&tx, plan)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Government plan updated successfully", details))
    }

    /// Removes the plan with its sections
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<GovernmentPlan>> {
        let mut tx = self.store.begin().await?;
        let plan = tx.delete::<GovernmentPlan>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Government plan removed successfully", plan))
    }
}

pub struct GovernmentPlanSectionService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> GovernmentPlanSectionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        input: NewGovernmentPlanSection,
    ) -> Result<ServiceResponse<GovernmentPlanSection>> {
        require_text("title", &input.title)?;
        require_text("content", &input.content)?;

        let mut tx = self.store.begin().await?;
        require::<GovernmentPlan>(&tx, input.government_plan_id)?;
        let section = tx.insert(GovernmentPlanSection {
            id: 0,
            government_plan_id: input.government_plan_id,
            sector: input.sector,
            title: input.title.trim().to_string(),
            content: input.content,
            problem_identified: input.problem_identified,
            strategic_objective: input.strategic_objective,
            indicators: input.indicators,
            goals: input.goals,
            order: input.order,
        })?;
        tx.commit()?;

        Ok(ServiceResponse::created(
            "Government plan section created successfully",
            section,
        ))
    }

    /// Sections grouped by plan, in reading order
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<GovernmentPlanSection>>> {
        let tx = self.store.begin().await?;
        let mut sections = tx.list::<GovernmentPlanSection>();
        sections.sort_by_key(|section| (section.government_plan_id, section.order, section.id));
        Ok(ServiceResponse::ok(
            "Government plan sections retrieved successfully",
            sections,
        ))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<GovernmentPlanSection>> {
        let tx = self.store.begin().await?;
        let section = require::<GovernmentPlanSection>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Government plan section retrieved successfully",
            section,
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: GovernmentPlanSectionPatch,
    ) -> Result<ServiceResponse<GovernmentPlanSection>> {
        let mut tx = self.store.begin().await?;
        let mut section = require::<GovernmentPlanSection>(&tx, id)?;

        if let Some(plan_id) = patch.government_plan_id {
            require::<GovernmentPlan>(&tx, plan_id)?;
            section.government_plan_id = plan_id;
        }
        if let Some(sector) = patch.sector {
            section.sector = sector;
        }
        if let Some(title) = patch.title {
            require_text("title", &title)?;
            section.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            require_text("content", &content)?;
            section.content = content;
        }
        if let Some(problem) = patch.problem_identified {
            section.problem_identified = problem;
        }
        if let Some(objective) = patch.strategic_objective {
            section.strategic_objective = objective;
        }
        if let Some(indicators) = patch.indicators {
            section.indicators = indicators;
        }
        if let Some(goals) = patch.goals {
            section.goals = goals;
        }
        if let Some(order) = patch.order {
            section.order = order;
        }

        let section = tx.update(section)?;
        tx.commit()?;

        Ok(ServiceResponse::ok(
            "Government plan section updated successfully",
            section,
        ))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<GovernmentPlanSection>> {
        let mut tx = self.store.begin().await?;
        let section = tx.delete::<GovernmentPlanSection>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok(
            "Government plan section removed successfully",
            section,
        ))
    }
}
