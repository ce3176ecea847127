//! Moderation alerts raised against posts

use super::views::{newest_first, optional_account_summary};
use crate::integrity::{require, require_patched};
use crate::model::{
    Account, ModerationAlertDetails, ModerationAlertPatch, NewModerationAlert, Post,
    PostModerationAlert, require_text,
};
use crate::patch::Patch;
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::{Id, ModerationStatus};
use crate::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

fn load(tx: &impl Transaction, alert: PostModerationAlert) -> Result<ModerationAlertDetails> {
    let post = require::<Post>(tx, alert.post_id)?;
    Ok(ModerationAlertDetails {
        post: post.summary(),
        reviewed_by_admin: optional_account_summary(tx, alert.reviewed_by_admin_id)?,
        alert,
    })
}

/// Resolve the review timestamp for an update
///
/// An explicit value or `null` always wins. Otherwise the first move away
/// from pending stamps the current time.
fn review_timestamp(
    current: Option<DateTime<Utc>>,
    requested: Patch<DateTime<Utc>>,
    new_status: Option<ModerationStatus>,
) -> Option<DateTime<Utc>> {
    match requested {
        Patch::Value(at) => Some(at),
        Patch::Null => None,
        Patch::Absent => match (current, new_status) {
            (None, Some(status)) if status.is_reviewed() => Some(Utc::now()),
            _ => current,
        },
    }
}

pub struct ModerationAlertService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> ModerationAlertService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        input: NewModerationAlert,
    ) -> Result<ServiceResponse<ModerationAlertDetails>> {
        require_text("aiSummary", &input.ai_summary)?;

        let mut tx = self.store.begin().await?;
        require::<Post>(&tx, input.post_id)?;

        let alert = tx.insert(PostModerationAlert {
            id: 0,
            post_id: input.post_id,
            ai_summary: input.ai_summary,
            status: input.status.unwrap_or_default(),
            reviewed_by_admin_id: None,
            reviewed_at: None,
            created_at: Utc::now(),
        })?;
        let details = load(&tx, alert)?;
        tx.commit()?;

        info!("🚩 Moderation alert {} raised on post {}", details.alert.id, details.post.id);
        Ok(ServiceResponse::created("Moderation alert created successfully", details))
    }

    /// All alerts, newest first
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<ModerationAlertDetails>>> {
        let tx = self.store.begin().await?;
        let mut alerts = tx.list::<PostModerationAlert>();
        newest_first(&mut alerts, |alert| (alert.created_at, alert.id));
        let alerts = alerts
            .into_iter()
            .map(|alert| load(&tx, alert))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Moderation alerts retrieved successfully", alerts))
    }

    /// Alerts still waiting for a review, newest first
    pub async fn find_pending(&self) -> Result<ServiceResponse<Vec<ModerationAlertDetails>>> {
        let tx = self.store.begin().await?;
        let mut alerts =
            tx.find_where::<PostModerationAlert>(|alert| !alert.status.is_reviewed());
        newest_first(&mut alerts, |alert| (alert.created_at, alert.id));
        let alerts = alerts
            .into_iter()
            .map(|alert| load(&tx, alert))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Pending moderation alerts retrieved successfully", alerts))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<ModerationAlertDetails>> {
        let tx = self.store.begin().await?;
        let alert = require::<PostModerationAlert>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Moderation alert retrieved successfully",
            load(&tx, alert)?,
        ))
    }

    /// Apply a review or edit to an alert
    pub async fn update(
        &self,
        id: Id,
        patch: ModerationAlertPatch,
    ) -> Result<ServiceResponse<ModerationAlertDetails>> {
        let mut tx = self.store.begin().await?;
        let mut alert = require::<PostModerationAlert>(&tx, id)?;

        if let Some(summary) = patch.ai_summary {
            require_text("aiSummary", &summary)?;
            alert.ai_summary = summary;
        }
        require_patched::<Account>(&tx, &patch.reviewed_by_admin_id)?;
        patch
            .reviewed_by_admin_id
            .apply_to(&mut alert.reviewed_by_admin_id);

        alert.reviewed_at = review_timestamp(alert.reviewed_at, patch.reviewed_at, patch.status);
        if let Some(status) = patch.status {
            alert.status = status;
        }

        let alert = tx.update(alert)?;
        let details = load(&tx, alert)?;
        tx.commit()?;

        info!(
            "🛡️ Moderation alert {} now {:?}",
            details.alert.id, details.alert.status
        );
        Ok(ServiceResponse::ok("Moderation alert updated successfully", details))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<PostModerationAlert>> {
        let mut tx = self.store.begin().await?;
        let alert = tx.delete::<PostModerationAlert>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Moderation alert removed successfully", alert))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_review_timestamp_policy() {
        let earlier = Utc::now() - Duration::days(2);

        // First decision stamps now
        let stamped = review_timestamp(None, Patch::Absent, Some(ModerationStatus::Approved));
        assert!(stamped.is_some());

        // Existing stamp is kept on later decisions
        let kept = review_timestamp(Some(earlier), Patch::Absent, Some(ModerationStatus::Rejected));
        assert_eq!(kept, Some(earlier));

        // Back to pending does not stamp
        assert_eq!(
            review_timestamp(None, Patch::Absent, Some(ModerationStatus::Pending)),
            None
        );
        assert_eq!(review_timestamp(None, Patch::Absent, None), None);

        // Explicit values win
        assert_eq!(
            review_timestamp(None, Patch::Value(earlier), Some(ModerationStatus::Approved)),
            Some(earlier)
        );
        assert_eq!(
            review_timestamp(Some(earlier), Patch::Null, Some(ModerationStatus::Approved)),
            None
        );
    }
}
