//! Threaded comments on posts

use super::views::{account_summary, newest_first};
use crate::integrity::require;
use crate::model::{Account, Comment, CommentDetails, CommentPatch, NewComment, Post, require_text};
use crate::patch::Patch;
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::Id;
use crate::{Result, bad_request};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

fn load(tx: &impl Transaction, comment: Comment) -> Result<CommentDetails> {
    let post = require::<Post>(tx, comment.post_id)?;
    let parent = match comment.parent_id {
        Some(parent_id) => Some(require::<Comment>(tx, parent_id)?),
        None => None,
    };

    let mut replies = tx.find_where::<Comment>(|reply| reply.parent_id == Some(comment.id));
    newest_first(&mut replies, |reply| (reply.created_at, reply.id));

    Ok(CommentDetails {
        author: account_summary(tx, comment.author_id)?,
        post: post.summary(),
        parent,
        replies,
        comment,
    })
}

/// A reply must stay inside the thread of its own post
fn require_parent_in_post(tx: &impl Transaction, parent_id: Id, post_id: Id) -> Result<Comment> {
    let parent = require::<Comment>(tx, parent_id)?;
    if parent.post_id != post_id {
        return Err(bad_request!("Parent comment belongs to a different post"));
    }
    Ok(parent)
}

/// Reject a new parent that is the comment itself or one of its replies
fn reject_cycle(tx: &impl Transaction, id: Id, parent: &Comment) -> Result<()> {
    let mut seen = HashSet::new();
    let mut next = Some(parent.id);
    while let Some(ancestor_id) = next {
        if ancestor_id == id {
            return Err(bad_request!("A comment cannot reply to itself or to its own replies"));
        }
        if !seen.insert(ancestor_id) {
            break;
        }
        next = tx
            .get::<Comment>(ancestor_id)
            .and_then(|ancestor| ancestor.parent_id);
    }
    Ok(())
}

pub struct CommentService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> CommentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewComment) -> Result<ServiceResponse<CommentDetails>> {
        require_text("content", &input.content)?;

        let mut tx = self.store.begin().await?;
        require::<Post>(&tx, input.post_id)?;
        require::<Account>(&tx, input.author_id)?;
        if let Some(parent_id) = input.parent_id {
            require_parent_in_post(&tx, parent_id, input.post_id)?;
        }

        let now = Utc::now();
        let comment = tx.insert(Comment {
            id: 0,
            post_id: input.post_id,
            author_id: input.author_id,
            content: input.content,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        })?;
        let details = load(&tx, comment)?;
        tx.commit()?;

        Ok(ServiceResponse::created("Comment created successfully", details))
    }

    /// All comments, newest first
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<CommentDetails>>> {
        let tx = self.store.begin().await?;
        let mut comments = tx.list::<Comment>();
        newest_first(&mut comments, |comment| (comment.created_at, comment.id));
        let comments = comments
            .into_iter()
            .map(|comment| load(&tx, comment))
            .collect::<Result<Vec<_>>>()?;
        Ok(ServiceResponse::ok("Comments retrieved successfully", comments))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<CommentDetails>> {
        let tx = self.store.begin().await?;
        let comment = require::<Comment>(&tx, id)?;
        Ok(ServiceResponse::ok(
            "Comment retrieved successfully",
            load(&tx, comment)?,
        ))
    }

    /// Edit the text or move the comment within its thread
    pub async fn update(&self, id: Id, patch: CommentPatch) -> Result<ServiceResponse<CommentDetails>> {
        let mut tx = self.store.begin().await?;
        let mut comment = require::<Comment>(&tx, id)?;

        if let Some(content) = patch.content {
            require_text("content", &content)?;
            comment.content = content;
        }
        if let Patch::Value(parent_id) = patch.parent_id {
            let parent = require_parent_in_post(&tx, parent_id, comment.post_id)?;
            reject_cycle(&tx, id, &parent)?;
        }
        patch.parent_id.apply_to(&mut comment.parent_id);
        comment.updated_at = Utc::now();

        let comment = tx.update(comment)?;
        let details = load(&tx, comment)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Comment updated successfully", details))
    }

    /// Removes the comment with its replies
    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<Comment>> {
        let mut tx = self.store.begin().await?;
        let comment = tx.delete::<Comment>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Comment removed successfully", comment))
    }
}
