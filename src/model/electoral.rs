//! Elections, their calendars, political groups and government plans

use super::candidate::CandidateSummary;
use crate::patch::Patch;
use crate::store::{Record, Reference};
use crate::types::{ElectionType, ElectoralEventCategory, GovernmentPlanSector, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ElectionType,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Election {
    pub fn summary(&self) -> ElectionSummary {
        ElectionSummary {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            date: self.date,
        }
    }
}

impl Record for Election {
    const ENTITY: &'static str = "election";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElectionType,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElection {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ElectionType,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionPatch {
    pub name: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(rename = "type")]
    pub kind: Option<ElectionType>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionDetails {
    #[serde(flatten)]
    pub election: Election,
    pub electoral_events: Vec<ElectoralEvent>,
}

/// Dated milestone in an election calendar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralEvent {
    pub id: Id,
    pub election_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub category: ElectoralEventCategory,
    pub is_published: bool,
}

impl Record for ElectoralEvent {
    const ENTITY: &'static str = "electoral event";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::cascade(Election::ENTITY, self.election_id)]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElectoralEvent {
    pub election_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub category: ElectoralEventCategory,
    /// Defaults to published
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectoralEventPatch {
    pub election_id: Option<Id>,
    pub name: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<ElectoralEventCategory>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalGroup {
    pub id: Id,
    pub name: String,
    pub short_name: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PoliticalGroup {
    pub fn summary(&self) -> PoliticalGroupSummary {
        PoliticalGroupSummary {
            id: self.id,
            name: self.name.clone(),
            short_name: self.short_name.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}

impl Record for PoliticalGroup {
    const ENTITY: &'static str = "political group";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalGroupSummary {
    pub id: Id,
    pub name: String,
    pub short_name: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoliticalGroup {
    pub name: String,
    pub short_name: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalGroupPatch {
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Patch<String>,
    #[serde(default)]
    pub logo_url: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalGroupDetails {
    #[serde(flatten)]
    pub group: PoliticalGroup,
    pub candidates: Vec<CandidateSummary>,
    pub government_plans: Vec<GovernmentPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentPlan {
    pub id: Id,
    pub political_group_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub document_url: Option<String>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
}

impl Record for GovernmentPlan {
    const ENTITY: &'static str = "government plan";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::cascade(
            PoliticalGroup::ENTITY,
            self.political_group_id,
        )]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGovernmentPlan {
    pub political_group_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub document_url: Option<String>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentPlanPatch {
    pub political_group_id: Option<Id>,
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub document_url: Patch<String>,
    #[serde(default)]
    pub from_year: Patch<i32>,
    #[serde(default)]
    pub to_year: Patch<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentPlanDetails {
    #[serde(flatten)]
    pub plan: GovernmentPlan,
    pub political_group: PoliticalGroupSummary,
    pub sections: Vec<GovernmentPlanSection>,
}

/// One thematic chapter of a government plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentPlanSection {
    pub id: Id,
    pub government_plan_id: Id,
    pub sector: GovernmentPlanSector,
    pub title: String,
    pub content: String,
    pub problem_identified: String,
    pub strategic_objective: String,
    pub indicators: String,
    pub goals: String,
    pub order: i32,
}

impl Record for GovernmentPlanSection {
    const ENTITY: &'static str = "government plan section";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::cascade(
            GovernmentPlan::ENTITY,
            self.government_plan_id,
        )]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGovernmentPlanSection {
    pub government_plan_id: Id,
    pub sector: GovernmentPlanSector,
    pub title: String,
    pub content: String,
    pub problem_identified: String,
    pub strategic_objective: String,
    pub indicators: String,
    pub goals: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernmentPlanSectionPatch {
    pub government_plan_id: Option<Id>,
    pub sector: Option<GovernmentPlanSector>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub problem_identified: Option<String>,
    pub strategic_objective: Option<String>,
    pub indicators: Option<String>,
    pub goals: Option<String>,
    pub order: Option<i32>,
}
