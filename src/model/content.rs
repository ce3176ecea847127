//! Posts, comments, voter guides and news

use super::account::{Account, AccountSummary};
use super::candidate::{Candidate, CandidateSummary};
use super::electoral::{Election, PoliticalGroup};
use super::moderation::PostModerationAlert;
use crate::patch::Patch;
use crate::store::{Record, Reference};
use crate::types::{GuideCategory, Id, PostStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub author_id: Id,
    pub candidate_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title.clone(),
            status: self.status,
            author_id: self.author_id,
            candidate_id: self.candidate_id,
            created_at: self.created_at,
        }
    }
}

impl Record for Post {
    const ENTITY: &'static str = "post";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = vec![Reference::cascade(Account::ENTITY, self.author_id)];
        if let Some(candidate_id) = self.candidate_id {
            references.push(Reference::set_null(Candidate::ENTITY, candidate_id));
        }
        references
    }

    fn clear_reference(&mut self, entity: &'static str, id: Id) {
        if entity == Candidate::ENTITY && self.candidate_id == Some(id) {
            self.candidate_id = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Id,
    pub title: String,
    pub status: PostStatus,
    pub author_id: Id,
    pub candidate_id: Option<Id>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// Defaults to published
    pub status: Option<PostStatus>,
    pub author_id: Id,
    pub candidate_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
    pub author_id: Option<Id>,
    #[serde(default)]
    pub candidate_id: Patch<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    pub author: AccountSummary,
    pub candidate: Option<CandidateSummary>,
    pub comments: Vec<Comment>,
    pub moderation_alerts: Vec<PostModerationAlert>,
}

/// Comment on a post, optionally replying to another comment of that post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub post_id: Id,
    pub author_id: Id,
    pub content: String,
    pub parent_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Comment {
    const ENTITY: &'static str = "comment";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = vec![
            Reference::cascade(Post::ENTITY, self.post_id),
            Reference::cascade(Account::ENTITY, self.author_id),
        ];
        if let Some(parent_id) = self.parent_id {
            references.push(Reference::cascade(Comment::ENTITY, parent_id));
        }
        references
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub post_id: Id,
    pub author_id: Id,
    pub content: String,
    pub parent_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPatch {
    pub content: Option<String>,
    #[serde(default)]
    pub parent_id: Patch<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetails {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: AccountSummary,
    pub post: PostSummary,
    pub parent: Option<Comment>,
    pub replies: Vec<Comment>,
}

/// Educational content for voters and poll workers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideContent {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub category: GuideCategory,
    pub election_id: Option<Id>,
    pub created_at: DateTime<Utc>,
}

impl Record for GuideContent {
    const ENTITY: &'static str = "guide content";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        self.election_id
            .map(|election_id| Reference::set_null(Election::ENTITY, election_id))
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, entity: &'static str, id: Id) {
        if entity == Election::ENTITY && self.election_id == Some(id) {
            self.election_id = None;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuideContent {
    pub title: String,
    pub content: String,
    pub category: GuideCategory,
    pub election_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideContentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<GuideCategory>,
    #[serde(default)]
    pub election_id: Patch<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: Id,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub election_id: Option<Id>,
    pub political_group_id: Option<Id>,
    pub created_at: DateTime<Utc>,
}

impl Record for NewsItem {
    const ENTITY: &'static str = "news item";

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = Vec::new();
        if let Some(election_id) = self.election_id {
            references.push(Reference::set_null(Election::ENTITY, election_id));
        }
        if let Some(group_id) = self.political_group_id {
            references.push(Reference::set_null(PoliticalGroup::ENTITY, group_id));
        }
        references
    }

    fn clear_reference(&mut self, entity: &'static str, id: Id) {
        if entity == Election::ENTITY && self.election_id == Some(id) {
            self.election_id = None;
        }
        if entity == PoliticalGroup::ENTITY && self.political_group_id == Some(id) {
            self.political_group_id = None;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNewsItem {
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub election_id: Option<Id>,
    pub political_group_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItemPatch {
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub source: Patch<String>,
    #[serde(default)]
    pub source_url: Patch<String>,
    #[serde(default)]
    pub published_at: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub election_id: Patch<Id>,
    #[serde(default)]
    pub political_group_id: Patch<Id>,
}
