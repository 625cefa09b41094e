use crate::fetcher::Fetcher;
use crate::rss_utils::{feed, time};
use crate::traits::ArticleAdapter;
use crate::types::{ArticleDraft, ArticleSource, Result, PLACEHOLDER_TITLE, PLACEHOLDER_URL};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_READ_TIME: u32 = 5;

/// The dev.to listing sends `tags` as a comma-joined string and `tag_list`
/// as an array; the single-article endpoint swaps them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagField {
    List(Vec<String>),
    Joined(String),
}

impl TagField {
    fn into_tags(self) -> Vec<String> {
        match self {
            TagField::List(tags) => tags,
            TagField::Joined(joined) => joined
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevToUser {
    pub name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevToPost {
    pub id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub canonical_url: Option<String>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<DevToUser>,
    pub tags: Option<TagField>,
    pub tag_list: Option<TagField>,
    pub cover_image: Option<String>,
    pub social_image: Option<String>,
    pub reading_time_minutes: Option<f64>,
}

impl DevToPost {
    /// `tag` is the topic this post was fetched under, used when the post
    /// lists no tags of its own.
    pub fn into_draft(self, tag: &str) -> ArticleDraft {
        let tags = self
            .tags
            .map(TagField::into_tags)
            .filter(|t| !t.is_empty())
            .or_else(|| self.tag_list.map(TagField::into_tags).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| vec![tag.to_string()]);

        let author = self
            .user
            .and_then(|u| u.name.or(u.username))
            .unwrap_or_else(|| "dev.to".to_string());

        let summary = self.description.unwrap_or_default();
        let read_time = self
            .reading_time_minutes
            .map(|m| m.ceil().max(1.0) as u32)
            .unwrap_or(DEFAULT_READ_TIME);

        ArticleDraft {
            id: format!("devto-{}", self.id),
            title: self.title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            body_html: feed::paragraph(&summary),
            summary,
            url: self
                .url
                .or(self.canonical_url)
                .unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
            published_at: time::parse_published(
                self.published_at.as_deref().or(self.created_at.as_deref()),
            ),
            author,
            tags,
            cover_image: self.cover_image.or(self.social_image),
            read_time_minutes: Some(read_time),
            source: ArticleSource::Devto,
        }
    }
}

/// Decode one tag's listing payload.
pub fn parse_listing(body: &str, tag: &str, per_page: usize) -> Result<Vec<ArticleDraft>> {
    let posts: Vec<DevToPost> = serde_json::from_str(body)?;
    Ok(drafts_from_posts(posts, tag, per_page))
}

fn drafts_from_posts(posts: Vec<DevToPost>, tag: &str, per_page: usize) -> Vec<ArticleDraft> {
    posts
        .into_iter()
        .take(per_page)
        .map(|post| post.into_draft(tag))
        .collect()
}

/// Tag-feed adapter: one listing request per topic tag.
pub struct DevToSource {
    fetcher: Arc<Fetcher>,
    api_url: String,
    tags: Vec<String>,
    per_page: usize,
}

impl DevToSource {
    pub fn new(fetcher: Arc<Fetcher>, api_url: String, tags: Vec<String>, per_page: usize) -> Self {
        Self {
            fetcher,
            api_url,
            tags,
            per_page,
        }
    }

    fn tag_url(&self, tag: &str) -> Result<String> {
        let mut url = url::Url::parse(&self.api_url)?;
        url.query_pairs_mut()
            .append_pair("tag", tag)
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url.to_string())
    }

    async fn pull_tag(&self, tag: &str) -> Result<Vec<ArticleDraft>> {
        let url = self.tag_url(tag)?;
        let posts: Vec<DevToPost> = self.fetcher.fetch_json(&url).await?;
        debug!("dev.to tag {} returned {} posts", tag, posts.len());

        Ok(drafts_from_posts(posts, tag, self.per_page))
    }
}

#[async_trait]
impl ArticleAdapter for DevToSource {
    fn source(&self) -> ArticleSource {
        ArticleSource::Devto
    }

    fn source_name(&self) -> String {
        "dev.to".to_string()
    }

    async fn pull(&self, _limit_hint: Option<usize>) -> Result<Vec<ArticleDraft>> {
        let results = join_all(self.tags.iter().map(|tag| self.pull_tag(tag))).await;

        let mut drafts = Vec::new();
        for (tag, result) in self.tags.iter().zip(results) {
            match result {
                Ok(mut posts) => drafts.append(&mut posts),
                Err(e) => warn!("dev.to tag {} fetch error: {}", tag, e),
            }
        }

        info!("Pulled {} articles from dev.to across {} tags", drafts.len(), self.tags.len());
        Ok(drafts)
    }
}
