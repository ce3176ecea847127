//! Candidates and their public record: career, education, assets and
//! investigations

use super::account::{Account, AccountSummary};
use super::content::PostSummary;
use super::electoral::{PoliticalGroup, PoliticalGroupSummary};
use crate::patch::Patch;
use crate::store::{Record, Reference, UniqueKey};
use crate::types::{CandidateOffice, EducationLevel, Id, InvestigationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency assumed for asset declarations without one
pub const DEFAULT_CURRENCY: &str = "PEN";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Id,
    pub full_name: String,
    pub office: CandidateOffice,
    pub biography: Option<String>,
    pub photo_url: Option<String>,
    pub political_group_id: Id,
    /// Account the candidate publishes posts with, if any
    pub account_id: Option<Id>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn summary(&self, political_group: Option<PoliticalGroupSummary>) -> CandidateSummary {
        CandidateSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            office: self.office,
            photo_url: self.photo_url.clone(),
            political_group,
        }
    }
}

impl Record for Candidate {
    const ENTITY: &'static str = "candidate";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        self.account_id
            .map(|account_id| UniqueKey::new("account_id", account_id))
            .into_iter()
            .collect()
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = vec![Reference::restrict(
            PoliticalGroup::ENTITY,
            self.political_group_id,
        )];
        if let Some(account_id) = self.account_id {
            references.push(Reference::set_null(Account::ENTITY, account_id));
        }
        references
    }

    fn clear_reference(&mut self, entity: &'static str, id: Id) {
        if entity == Account::ENTITY && self.account_id == Some(id) {
            self.account_id = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub id: Id,
    pub full_name: String,
    pub office: CandidateOffice,
    pub photo_url: Option<String>,
    pub political_group: Option<PoliticalGroupSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub full_name: String,
    pub office: CandidateOffice,
    pub biography: Option<String>,
    pub photo_url: Option<String>,
    pub political_group_id: Id,
    pub account_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatch {
    pub full_name: Option<String>,
    pub office: Option<CandidateOffice>,
    #[serde(default)]
    pub biography: Patch<String>,
    #[serde(default)]
    pub photo_url: Patch<String>,
    pub political_group_id: Option<Id>,
    #[serde(default)]
    pub account_id: Patch<Id>,
}

/// Candidate profile with every public sub-record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDetails {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub political_group: PoliticalGroupSummary,
    pub account: Option<AccountSummary>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub asset_declarations: Vec<AssetDeclaration>,
    pub investigations: Vec<Investigation>,
    pub posts: Vec<PostSummary>,
    pub vote_intention_count: usize,
}

/// Declares the parent link shared by all candidate sub-records
macro_rules! candidate_record {
    ($record:ty, $entity:literal) => {
        impl Record for $record {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> Id {
                self.id
            }

            fn set_id(&mut self, id: Id) {
                self.id = id;
            }

            fn references(&self) -> Vec<Reference> {
                vec![Reference::cascade(Candidate::ENTITY, self.candidate_id)]
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: Id,
    pub candidate_id: Id,
    pub position: String,
    pub company: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub is_current: bool,
    pub description: Option<String>,
    pub order: i32,
}

candidate_record!(WorkExperience, "work experience");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkExperience {
    pub position: String,
    pub company: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    #[serde(default)]
    pub is_current: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperiencePatch {
    pub position: Option<String>,
    pub company: Option<String>,
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Patch<i32>,
    pub is_current: Option<bool>,
    #[serde(default)]
    pub description: Patch<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: Id,
    pub candidate_id: Id,
    pub level: EducationLevel,
    pub degree: String,
    pub institution: String,
    pub graduation_year: i32,
    pub field_of_study: Option<String>,
    pub order: i32,
}

candidate_record!(Education, "education");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub level: EducationLevel,
    pub degree: String,
    pub institution: String,
    pub graduation_year: i32,
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub level: Option<EducationLevel>,
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub field_of_study: Patch<String>,
    pub order: Option<i32>,
}

/// Sworn declaration of income for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDeclaration {
    pub id: Id,
    pub candidate_id: Id,
    pub year: i32,
    pub declared_income: f64,
    pub currency: String,
    pub source: Option<String>,
    pub description: Option<String>,
    pub salary_income: Option<f64>,
    pub rental_income: Option<f64>,
    pub dividend_income: Option<f64>,
    pub other_income: Option<f64>,
}

candidate_record!(AssetDeclaration, "asset declaration");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetDeclaration {
    pub year: i32,
    pub declared_income: f64,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub salary_income: Option<f64>,
    pub rental_income: Option<f64>,
    pub dividend_income: Option<f64>,
    pub other_income: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDeclarationPatch {
    pub year: Option<i32>,
    pub declared_income: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub source: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub salary_income: Patch<f64>,
    #[serde(default)]
    pub rental_income: Patch<f64>,
    #[serde(default)]
    pub dividend_income: Patch<f64>,
    #[serde(default)]
    pub other_income: Patch<f64>,
}

/// Judicial or administrative investigation involving a candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Investigation {
    pub id: Id,
    pub candidate_id: Id,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub institution: String,
    pub status: InvestigationStatus,
    pub filing_date: Option<DateTime<Utc>>,
    pub resolution_date: Option<DateTime<Utc>>,
    pub outcome: Option<String>,
    pub source_url: Option<String>,
}

candidate_record!(Investigation, "investigation");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestigation {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub institution: String,
    pub status: InvestigationStatus,
    pub filing_date: Option<DateTime<Utc>>,
    pub resolution_date: Option<DateTime<Utc>>,
    pub outcome: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub institution: Option<String>,
    pub status: Option<InvestigationStatus>,
    #[serde(default)]
    pub filing_date: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub resolution_date: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub outcome: Patch<String>,
    #[serde(default)]
    pub source_url: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_account_link_is_optional_and_unique() {
        let mut candidate = Candidate {
            id: 1,
            full_name: "Rosa Huamán".to_string(),
            office: CandidateOffice::Mayor,
            biography: None,
            photo_url: None,
            political_group_id: 3,
            account_id: None,
            created_at: Utc::now(),
        };
        assert!(candidate.unique_keys().is_empty());
        assert_eq!(candidate.references().len(), 1);

        candidate.account_id = Some(9);
        assert_eq!(candidate.unique_keys(), vec![UniqueKey::new("account_id", 9)]);

        candidate.clear_reference(Account::ENTITY, 9);
        assert_eq!(candidate.account_id, None);
    }

    #[test]
    fn test_investigation_type_field() {
        let input: NewInvestigation = serde_json::from_value(serde_json::json!({
            "type": "FISCAL",
            "description": "Peculado",
            "institution": "Fiscalía",
            "status": "IN_PROGRESS"
        }))
        .unwrap();

        assert_eq!(input.kind, "FISCAL");
        assert_eq!(input.status, InvestigationStatus::InProgress);
        assert!(input.filing_date.is_none());
    }
}
