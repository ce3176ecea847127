//! Posts published by accounts, optionally on behalf of a candidate

use super::views::{account_summary, candidate_summary, newest_first};
use crate::integrity::{require, require_optional, require_patched};
use crate::model::{
    Account, Candidate, Comment, NewPost, Post, PostDetails, PostModerationAlert, PostPatch,
    require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::{Id, PostStatus};
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

fn load(tx: &impl Transaction, post: Post) -> Result<PostDetails> {
    let candidate = match require_optional::<Candidate>(tx, post.candidate_id)? {
        Some(candidate) => Some(candidate_summary(tx, &candidate)?),
        None => None,
    };

    let mut comments = tx.find_where::<Comment>(|comment| comment.post_id == post.id);
    newest_first(&mut comments, |comment| (comment.created_at, comment.id));

    let mut moderation_alerts =
        tx.find_where::<PostModerationAlert>(|alert| alert.post_id == post.id);
    newest_first(&mut moderation_alerts, |alert| (alert.created_at, alert.id));

    Ok(PostDetails {
        author: account_summary(tx, post.author_id)?,
        candidate,
        comments,
        moderation_alerts,
        post,
    })
}

pub struct PostService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> PostService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Posts are published unless another status is given
    pub async fn create(&self, input: NewPost) -> Result<ServiceResponse<PostDetails>> {
        require_text("title", &input.title)?;
        require_text("content", &input.content)?;

        let mut tx = self.store.begin().await?;
        require::<Account>(&tx, input.author_id)?;
        require_optional::<Candidate>(&tx, input.candidate_id)?;

        let now = Utc::now();
        let post = tx.insert(Post {
            id: 0,
            title: input.title.trim().to_string(),
            content: input.content,
            status: input.status.unwrap_or_default(),
            author_id: input.author_id,
            candidate_id: input.candidate_id,
            created_at: now,
            updated_at: now,
        })?;
        let details = load(&tx, post)?;
        tx.commit()?;

        info!("📝 Post {} published by account {}", details.post.id, details.author.id);
        Ok(ServiceResponse::created("Post created successfully", details))
    }

    /// All posts, newest first
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<PostDetails>>> {
        let tx = self.store.begin().await?;
        let mut posts = tx.list::<Post>();
        newest_first(&mut posts, |post| (post.created_at, post.id));
        let posts = posts
            .into_iter()
            .map(|post| load(&tx, post))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Posts retrieved successfully", posts))
    }

    /// Published posts only, newest first
    pub async fn find_published(&self) -> Result<ServiceResponse<Vec<PostDetails>>> {
        let tx = self.store.begin().await?;
        let mut posts = tx.find_where::<Post>(|post| post.status == PostStatus::Published);
        newest_first(&mut posts, |post| (post.created_at, post.id));
        let posts = posts
            .into_iter()
            .map(|post| load(&tx, post))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Posts retrieved successfully", posts))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<PostDetails>> {
        let tx = self.store.begin().await?;
        let post = require::<Post>(&tx, id)?;
        Ok(ServiceResponse::ok("Post retrieved successfully", load(&tx, post)?))
    }

    pub async fn update(&self, id: Id, patch: PostPatch) -> Result<ServiceResponse<PostDetails>> {
        let mut tx = self.store.begin().await?;
        let mut post = require::<Post>(&tx, id)?;

        if let Some(title) = patch.title {
            require_text("title", &title)?;
            post.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            require_text("content", &content)?;
            post.content = content;
        }
        if let Some(status) = patch.status {
            post.status = status;
        }
        if let Some(author_id) = patch.author_id {
            require::<Account>(&tx, author_id)?;
            post.author_id = author_id;
        }
        require_patched::<Candidate>(&tx, &patch.candidate_id)?;
        patch.candidate_id.apply_to(&mut post.candidate_id);
        post.updated_at = Utc::now();

        let post = tx.update(post)?;
        let details = load(&tx, post)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Post updated successfully", details))
    }

    /// Removes the post with its comments and moderation alerts
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<Post>> {
        let mut tx = self.store.begin().await?;
        let post = tx.delete::<Post>(id)?;
        tx.commit()?;

        info!("🗑️ Post {} removed", post.id);
        Ok(ServiceResponse::ok("Post removed successfully", post))
    }
}
