use super::rss_feed::FeedProfile;
use crate::fetcher::Fetcher;
use crate::rss_utils::synth;
use crate::traits::ArticleAdapter;
use crate::types::{ArticleDraft, ArticleSource, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub fn medium_profile(max_items: usize) -> FeedProfile {
    FeedProfile {
        source: ArticleSource::Medium,
        default_author: "Medium".to_string(),
        default_tags: vec!["javascript".to_string(), "medium".to_string()],
        placeholder_title: Some("Medium Article".to_string()),
        read_time: synth::MEDIUM_READ_TIME,
        max_items,
    }
}

/// Parse a Medium tag feed, keeping the first `limit` items.
pub fn parse_items(content: &str, limit: usize) -> Result<Vec<ArticleDraft>> {
    medium_profile(limit).parse_document(content)
}

/// Medium exposes tag pages as a plain RSS feed.
pub struct MediumSource {
    fetcher: Arc<Fetcher>,
    feed_url: String,
    item_limit: usize,
}

impl MediumSource {
    pub fn new(fetcher: Arc<Fetcher>, feed_url: String, item_limit: usize) -> Self {
        Self {
            fetcher,
            feed_url,
            item_limit,
        }
    }
}

#[async_trait]
impl ArticleAdapter for MediumSource {
    fn source(&self) -> ArticleSource {
        ArticleSource::Medium
    }

    fn source_name(&self) -> String {
        format!("Medium ({})", self.feed_url)
    }

    async fn pull(&self, _limit_hint: Option<usize>) -> Result<Vec<ArticleDraft>> {
        let content = self.fetcher.fetch_text(&self.feed_url).await?;
        let drafts = parse_items(&content, self.item_limit)?;
        info!("Pulled {} articles from Medium", drafts.len());
        Ok(drafts)
    }
}
