//! Candidates and their public record

use super::views::{newest_first, optional_account_summary};
use crate::integrity::{ensure_unique, require};
use crate::model::{
    Account, AssetDeclaration, AssetDeclarationPatch, Candidate, CandidateDetails,
    CandidatePatch, DEFAULT_CURRENCY, Education, EducationPatch, Investigation,
    InvestigationPatch, NewAssetDeclaration, NewCandidate, NewEducation, NewInvestigation,
    NewWorkExperience, PoliticalGroup, Post, VoteIntention, WorkExperience, WorkExperiencePatch,
    require_text, require_year_order,
};
use crate::patch::Patch;
use crate::response::ServiceResponse;
use crate::store::{Record, RecordStore, Transaction};
use crate::types::Id;
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

const ACCOUNT_LINKED: &str = "This account is already linked to another candidate";

fn load(tx: &impl Transaction, candidate: Candidate) -> Result<CandidateDetails> {
    let id = candidate.id;
    let group = require::<PoliticalGroup>(tx, candidate.political_group_id)?;

    let mut work_experience = tx.find_where::<WorkExperience>(|row| row.candidate_id == id);
    work_experience.sort_by_key(|row| (row.order, row.id));

    let mut education = tx.find_where::<Education>(|row| row.candidate_id == id);
    education.sort_by_key(|row| (row.order, row.id));

    let mut asset_declarations = tx.find_where::<AssetDeclaration>(|row| row.candidate_id == id);
    asset_declarations.sort_by_key(|row| (std::cmp::Reverse(row.year), row.id));

    let mut investigations = tx.find_where::<Investigation>(|row| row.candidate_id == id);
    investigations.sort_by_key(|row| row.id);

    let mut posts = tx.find_where::<Post>(|post| post.candidate_id == Some(id));
    newest_first(&mut posts, |post| (post.created_at, post.id));

    let vote_intention_count = tx
        .find_where::<VoteIntention>(|intention| intention.candidate_id == id)
        .len();

    Ok(CandidateDetails {
        political_group: group.summary(),
        account: optional_account_summary(tx, candidate.account_id)?,
        work_experience,
        education,
        asset_declarations,
        investigations,
        posts: posts.iter().map(Post::summary).collect(),
        vote_intention_count,
        candidate,
    })
}

fn check_income(field: &str, amount: Option<f64>) -> Result<()> {
    match amount {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(Error::validation(field, "must be a non-negative amount"))
        }
        _ => Ok(()),
    }
}

fn check_declaration(declaration: &AssetDeclaration) -> Result<()> {
    check_income("declaredIncome", Some(declaration.declared_income))?;
    check_income("salaryIncome", declaration.salary_income)?;
    check_income("rentalIncome", declaration.rental_income)?;
    check_income("dividendIncome", declaration.dividend_income)?;
    check_income("otherIncome", declaration.other_income)?;
    require_text("currency", &declaration.currency)
}

pub struct CandidateService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> CandidateService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewCandidate) -> Result<ServiceResponse<CandidateDetails>> {
        require_text("fullName", &input.full_name)?;

        let mut tx = self.store.begin().await?;
        require::<PoliticalGroup>(&tx, input.political_group_id)?;
        if let Some(account_id) = input.account_id {
            require::<Account>(&tx, account_id)?;
            ensure_unique::<Candidate>(&tx, "account_id", &account_id.to_string(), None, ACCOUNT_LINKED)?;
        }

        let candidate = tx.insert(Candidate {
            id: 0,
            full_name: input.full_name.trim().to_string(),
            office: input.office,
            biography: input.biography,
            photo_url: input.photo_url,
            political_group_id: input.political_group_id,
            account_id: input.account_id,
            created_at: Utc::now(),
        })?;
        let details = load(&tx, candidate)?;
        tx.commit()?;

        info!(
            "🧑‍💼 Candidate {} registered with political group {}",
            details.candidate.id, details.political_group.id
        );
        Ok(ServiceResponse::created("Candidate created successfully", details))
    }

    /// All candidates ordered by full name
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<CandidateDetails>>> {
        let tx = self.store.begin().await?;
        let mut candidates = tx.list::<Candidate>();
        candidates.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
        let candidates = candidates
            .into_iter()
            .map(|candidate| load(&tx, candidate))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Candidates retrieved successfully", candidates))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<CandidateDetails>> {
        let tx = self.store.begin().await?;
        let candidate = require::<Candidate>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Candidate retrieved successfully",
            load(&tx, candidate)?,
        ))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: CandidatePatch,
    ) -> Result<ServiceResponse<CandidateDetails>> {
        let mut tx = self.store.begin().await?;
        let mut candidate = require::<Candidate>(&tx, id)?;

        if let Some(full_name) = patch.full_name {
            require_text("fullName", &full_name)?;
            candidate.full_name = full_name.trim().to_string();
        }
        if let Some(office) = patch.office {
            candidate.office = office;
        }
        patch.biography.apply_to(&mut candidate.biography);
        patch.photo_url.apply_to(&mut candidate.photo_url);
        if let Some(group_id) = patch.political_group_id {
            require::<PoliticalGroup>(&tx, group_id)?;
            candidate.political_group_id = group_id;
        }
        if let Patch::Value(account_id) = patch.account_id {
            require::<Account>(&tx, account_id)?;
            ensure_unique::<Candidate>(
                &tx,
                "account_id",
                &account_id.to_string(),
                Some(id),
                ACCOUNT_LINKED,
            )?;
        }
        patch.account_id.apply_to(&mut candidate.account_id);

        let candidate = tx.update(candidate)?;
        let details = load(&tx, candidate)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Candidate updated successfully", details))
    }

    /// Removes the candidate with its record and vote intentions; posts stay,
    /// detached from the candidate
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<Candidate>> {
        let mut tx = self.store.begin().await?;
        let candidate = tx.delete::<Candidate>(id)?;
        tx.commit()?;

        info!("🗑️ Candidate {} removed", candidate.id);
        Ok(ServiceResponse::ok("Candidate removed successfully", candidate))
    }

    async fn insert_child<R: Record>(&self, child: R, message: &str) -> Result<ServiceResponse<R>> {
        let mut tx = self.store.begin().await?;
        let child = tx.insert(child)?;
        tx.commit()?;
        Ok(ServiceResponse::created(message, child))
    }

    async fn remove_child<R: Record>(&self, id: Id, message: &str) -> Result<ServiceResponse<R>> {
        let mut tx = self.store.begin().await?;
        let child = tx.delete::<R>(id)?;
        tx.commit()?;
        Ok(ServiceResponse::ok(message, child))
    }

    pub async fn add_work_experience(
        &self,
        candidate_id: Id,
        input: NewWorkExperience,
    ) -> Result<ServiceResponse<WorkExperience>> {
        require_text("position", &input.position)?;
        require_text("company", &input.company)?;
        require_year_order("endYear", Some(input.start_year), input.end_year)?;

        self.insert_child(
            WorkExperience {
                id: 0,
                candidate_id,
                position: input.position,
                company: input.company,
                start_year: input.start_year,
                end_year: input.end_year,
                is_current: input.is_current,
                description: input.description,
                order: input.order,
            },
            "Work experience added successfully",
        )
        .await
    }

    pub async fn update_work_experience(
        &self,
        id: Id,
        patch: WorkExperiencePatch,
    ) -> Result<ServiceResponse<WorkExperience>> {
        let mut tx = self.store.begin().await?;
        let mut row = require::<WorkExperience>(&tx, id)?;

        if let Some(position) = patch.position {
            require_text("position", &position)?;
            row.position = position;
        }
        if let Some(company) = patch.company {
            require_text("company", &company)?;
            row.company = company;
        }
        if let Some(start_year) = patch.start_year {
            row.start_year = start_year;
        }
        patch.end_year.apply_to(&mut row.end_year);
        if let Some(is_current) = patch.is_current {
            row.is_current = is_current;
        }
        patch.description.apply_to(&mut row.description);
        if let Some(order) = patch.order {
            row.order = order;
        }
        require_year_order("endYear", Some(row.start_year), row.end_year)?;

        let row = tx.update(row)?;
        tx.commit()?;
        Ok(ServiceResponse::ok("Work experience updated successfully", row))
    }

    pub async fn remove_work_experience(&self, id: Id) -> Result<ServiceResponse<WorkExperience>> {
        self.remove_child(id, "Work experience removed successfully")
            .await
    }

    pub async fn add_education(
        &self,
        candidate_id: Id,
        input: NewEducation,
    ) -> Result<ServiceResponse<Education>> {
        require_text("degree", &input.degree)?;
        require_text("institution", &input.institution)?;

        self.insert_child(
            Education {
                id: 0,
                candidate_id,
                level: input.level,
                degree: input.degree,
                institution: input.institution,
                graduation_year: input.graduation_year,
                field_of_study: input.field_of_study,
                order: input.order,
            },
            "Education added successfully",
        )
        .await
    }

    pub async fn update_education(
        &self,
        id: Id,
        patch: EducationPatch,
    ) -> Result<ServiceResponse<Education>> {
        let mut tx = self.store.begin().await?;
        let mut row = require::<Education>(&tx, id)?;

        if let Some(level) = patch.level {
            row.level = level;
        }
        if let Some(degree) = patch.degree {
            require_text("degree", &degree)?;
            row.degree = degree;
        }
        if let Some(institution) = patch.institution {
            require_text("institution", &institution)?;
            row.institution = institution;
        }
        if let Some(year) = patch.graduation_year {
            row.graduation_year = year;
        }
        patch.field_of_study.apply_to(&mut row.field_of_study);
        if let Some(order) = patch.order {
            row.order = order;
        }

        let row = tx.update(row)?;
        tx.commit()?;
        Ok(ServiceResponse::ok("Education updated successfully", row))
    }

    pub async fn remove_education(&self, id: Id) -> Result<ServiceResponse<Education>> {
        self.remove_child(id, "Education removed successfully").await
    }

    /// Currency defaults to soles
    pub async fn add_asset_declaration(
        &self,
        candidate_id: Id,
        input: NewAssetDeclaration,
    ) -> Result<ServiceResponse<AssetDeclaration>> {
        let declaration = AssetDeclaration {
            id: 0,
            candidate_id,
            year: input.year,
            declared_income: input.declared_income,
            currency: input
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            source: input.source,
            description: input.description,
            salary_income: input.salary_income,
            rental_income: input.rental_income,
            dividend_income: input.dividend_income,
            other_income: input.other_income,
        };
        check_declaration(&declaration)?;

        self.insert_child(declaration, "Asset declaration added successfully")
            .await
    }

    pub async fn update_asset_declaration(
        &self,
        id: Id,
        patch: AssetDeclarationPatch,
    ) -> Result<ServiceResponse<AssetDeclaration>> {
        let mut tx = self.store.begin().await?;
        let mut row = require::<AssetDeclaration>(&tx, id)?;

        if let Some(year) = patch.year {
            row.year = year;
        }
        if let Some(income) = patch.declared_income {
            row.declared_income = income;
        }
        if let Some(currency) = patch.currency {
            row.currency = currency;
        }
        patch.source.apply_to(&mut row.source);
        patch.description.apply_to(&mut row.description);
        patch.salary_income.apply_to(&mut row.salary_income);
        patch.rental_income.apply_to(&mut row.rental_income);
        patch.dividend_income.apply_to(&mut row.dividend_income);
        patch.other_income.apply_to(&mut row.other_income);
        check_declaration(&row)?;

        let row = tx.update(row)?;
        tx.commit()?;
        Ok(ServiceResponse::ok("Asset declaration updated successfully", row))
    }

    pub async fn remove_asset_declaration(
        &self,
        id: Id,
    ) -> Result<ServiceResponse<AssetDeclaration>> {
        self.remove_child(id, "Asset declaration removed successfully")
            .await
    }

    pub async fn add_investigation(
        &self,
        candidate_id: Id,
        input: NewInvestigation,
    ) -> Result<ServiceResponse<Investigation>> {
        require_text("type", &input.kind)?;
        require_text("description", &input.description)?;
        require_text("institution", &input.institution)?;

        self.insert_child(
            Investigation {
                id: 0,
                candidate_id,
                kind: input.kind,
                description: input.description,
                institution: input.institution,
                status: input.status,
                filing_date: input.filing_date,
                resolution_date: input.resolution_date,
                outcome: input.outcome,
                source_url: input.source_url,
            },
            "Investigation added successfully",
        )
        .await
    }

    pub async fn update_investigation(
        &self,
        id: Id,
        patch: InvestigationPatch,
    ) -> Result<ServiceResponse<Investigation>> {
        let mut tx = self.store.begin().await?;
        let mut row = require::<Investigation>(&tx, id)?;

        if let Some(kind) = patch.kind {
            require_text("type", &kind)?;
            row.kind = kind;
        }
        if let Some(description) = patch.description {
            require_text("description", &description)?;
            row.description = description;
        }
        if let Some(institution) = patch.institution {
            require_text("institution", &institution)?;
            row.institution = institution;
        }
        if let Some(status) = patch.status {
            row.status = status;
        }
        patch.filing_date.apply_to(&mut row.filing_date);
        patch.resolution_date.apply_to(&mut row.resolution_date);
        patch.outcome.apply_to(&mut row.outcome);
        patch.source_url.apply_to(&mut row.source_url);

        let row = tx.update(row)?;
        tx.commit()?;
        Ok(ServiceResponse::ok("Investigation updated successfully", row))
    }

    pub async fn remove_investigation(&self, id: Id) -> Result<ServiceResponse<Investigation>> {
        self.remove_child(id, "Investigation removed successfully")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_checks() {
        assert!(check_income("declaredIncome", Some(1200.5)).is_ok());
        assert!(check_income("declaredIncome", None).is_ok());
        assert!(check_income("declaredIncome", Some(-1.0)).is_err());
        assert!(check_income("declaredIncome", Some(f64::NAN)).is_err());
    }
}
