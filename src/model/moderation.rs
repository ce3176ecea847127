//! Moderation alerts raised against posts

use super::account::{Account, AccountSummary};
use super::content::{Post, PostSummary};
use crate::patch::Patch;
use crate::store::{Record, Reference};
use crate::types::{Id, ModerationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostModerationAlert {
    pub id: Id,
    pub post_id: Id,
    /// Automated summary of why the post was flagged
    pub ai_summary: String,
    pub status: ModerationStatus,
    pub reviewed_by_admin_id: Option<Id>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Record for PostModerationAlert {
    const ENTITY: &'static str = "moderation alert";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = vec![Reference::cascade(Post::ENTITY, self.post_id)];
        if let Some(reviewer_id) = self.reviewed_by_admin_id {
            references.push(Reference::set_null(Account::ENTITY, reviewer_id));
        }
        references
    }

    fn clear_reference(&mut self, entity: &'static str, id: Id) {
        if entity == Account::ENTITY && self.reviewed_by_admin_id == Some(id) {
            self.reviewed_by_admin_id = None;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewModerationAlert {
    pub post_id: Id,
    pub ai_summary: String,
    /// Defaults to pending
    pub status: Option<ModerationStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationAlertPatch {
    pub ai_summary: Option<String>,
    pub status: Option<ModerationStatus>,
    #[serde(default)]
    pub reviewed_by_admin_id: Patch<Id>,
    #[serde(default)]
    pub reviewed_at: Patch<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationAlertDetails {
    #[serde(flatten)]
    pub alert: PostModerationAlert,
    pub post: PostSummary,
    pub reviewed_by_admin: Option<AccountSummary>,
}
