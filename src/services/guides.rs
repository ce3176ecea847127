//! Voter guides and election news

use crate::integrity::{require, require_optional, require_patched};
use crate::model::{
    Election, GuideContent, GuideContentPatch, NewGuideContent, NewNewsItem, NewsItem,
    NewsItemPatch, PoliticalGroup, require_text,
};
use crate::response::ServiceResponse;
use crate::store::{RecordStore, Transaction};
use crate::types::{GuideCategory, Id};
use crate::Result;
use chrono::Utc;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::info;

pub struct GuideContentService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> GuideContentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewGuideContent) -> Result<ServiceResponse<GuideContent>> {
        require_text("title", &input.title)?;
        require_text("content", &input.content)?;

        let mut tx = self.store.begin().await?;
        require_optional::<Election>(&tx, input.election_id)?;
        let guide = tx.insert(GuideContent {
            id: 0,
            title: input.title.trim().to_string(),
            content: input.content,
            category: input.category,
            election_id: input.election_id,
            created_at: Utc::now(),
        })?;
        tx.commit()?;

        info!("📖 Guide content {} published ({:?})", guide.id, guide.category);
        Ok(ServiceResponse::created("Guide content created successfully", guide))
    }

    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<GuideContent>>> {
        let tx = self.store.begin().await?;
        Ok(ServiceResponse::ok(
            "Guide content retrieved successfully",
            tx.list::<GuideContent>(),
        ))
    }

    pub async fn find_by_category(
        &self,
        category: GuideCategory,
    ) -> Result<ServiceResponse<Vec<GuideContent>>> {
        let tx = self.store.begin().await?;
        Ok(ServiceResponse::ok(
            "Guide content retrieved successfully",
            tx.find_where::<GuideContent>(|guide| guide.category == category),
        ))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<GuideContent>> {
        let tx = self.store.begin().await?;
        let guide = require::<GuideContent>(&tx, id)?;
        Ok(ServiceResponse::ok("Guide content retrieved successfully", guide))
    }

    pub async fn update(
        &self,
        id: Id,
        patch: GuideContentPatch,
    ) -> Result<ServiceResponse<GuideContent>> {
        let mut tx = self.store.begin().await?;
        let mut guide = require::<GuideContent>(&tx, id)?;

        if let Some(title) = patch.title {
            require_text("title", &title)?;
            guide.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            require_text("content", &content)?;
            guide.content = content;
        }
        if let Some(category) = patch.category {
            guide.category = category;
        }
        require_patched::<Election>(&tx, &patch.election_id)?;
        patch.election_id.apply_to(&mut guide.election_id);

        let guide = tx.update(guide)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Guide content updated successfully", guide))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<GuideContent>> {
        let mut tx = self.store.begin().await?;
        let guide = tx.delete::<GuideContent>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("Guide content removed successfully", guide))
    }
}

pub struct NewsItemService<S> {
    store: Arc<S>,
}

impl<S: RecordStore> NewsItemService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewNewsItem) -> Result<ServiceResponse<NewsItem>> {
        require_text("title", &input.title)?;

        let mut tx = self.store.begin().await?;
        require_optional::<Election>(&tx, input.election_id)?;
        require_optional::<PoliticalGroup>(&tx, input.political_group_id)?;
        let item = tx.insert(NewsItem {
            id: 0,
            title: input.title.trim().to_string(),
            summary: input.summary,
            content: input.content,
            source: input.source,
            source_url: input.source_url,
            published_at: input.published_at,
            election_id: input.election_id,
            political_group_id: input.political_group_id,
            created_at: Utc::now(),
        })?;
        tx.commit()?;

        info!("📰 News item {} added", item.id);
        Ok(ServiceResponse::created("News item created successfully", item))
    }

    /// Most recently published first; undated items go last
    pub async fn find_all(&self) -> Result<ServiceResponse<Vec<NewsItem>>> {
        let tx = self.store.begin().await?;
        let mut items = tx.list::<NewsItem>();
        items.sort_by_key(|item| {
            (
                Reverse(item.published_at.is_some()),
                Reverse(item.published_at),
                Reverse(item.id),
            )
        });
        Ok(ServiceResponse::ok("News items retrieved successfully", items))
    }

    pub async fn find_one(&self, id: Id) -> Result<ServiceResponse<NewsItem>> {
        let tx = self.store.begin().await?;
        let item = require::<NewsItem>(&tx, id)?;
        Ok(ServiceResponse::ok("News item retrieved successfully", item))
    }

    pub async fn update(&self, id: Id, patch: NewsItemPatch) -> Result<ServiceResponse<NewsItem>> {
        let mut tx = self.store.begin().await?;
        let mut item = require::<NewsItem>(&tx, id)?;

        if let Some(title) = patch.title {
            require_text("title", &title)?;
            item.title = title.trim().to_string();
        }
        patch.summary.apply_to(&mut item.summary);
        patch.content.apply_to(&mut item.content);
        patch.source.apply_to(&mut item.source);
        patch.source_url.apply_to(&mut item.source_url);
        patch.published_at.apply_to(&mut item.published_at);
        require_patched::<Election>(&tx, &patch.election_id)?;
        patch.election_id.apply_to(&mut item.election_id);
        require_patched::<PoliticalGroup>(&tx, &patch.political_group_id)?;
        patch.political_group_id.apply_to(&mut item.political_group_id);

        let item = tx.update(item)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("News item updated successfully", item))
    }

    pub async fn remove(&self, id: Id) -> Result<ServiceResponse<NewsItem>> {
        let mut tx = self.store.begin().await?;
        let item = tx.delete::<NewsItem>(id)?;
        tx.commit()?;

        Ok(ServiceResponse::ok("News item removed successfully", item))
    }
}
