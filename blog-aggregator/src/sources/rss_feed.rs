use crate::fetcher::Fetcher;
use crate::parser::{FeedParser, ParsedEntry};
use crate::rss_utils::{feed, ids, synth};
use crate::traits::ArticleAdapter;
use crate::types::{ArticleDraft, ArticleSource, Result, PLACEHOLDER_URL};
use async_trait::async_trait;
use futures::future::join_all;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SUMMARY_MAX_CHARS: usize = 280;

/// How entries of a given kind of feed become drafts.
#[derive(Debug, Clone)]
pub struct FeedProfile {
    pub source: ArticleSource,
    pub default_author: String,
    pub default_tags: Vec<String>,
    /// Used for untitled entries; `None` drops them instead.
    pub placeholder_title: Option<String>,
    pub read_time: Range<u32>,
    pub max_items: usize,
}

impl FeedProfile {
    pub fn tech_blog(max_items: usize) -> Self {
        Self {
            source: ArticleSource::Rss,
            default_author: "Tech Blog".to_string(),
            default_tags: vec!["web-development".to_string(), "programming".to_string()],
            placeholder_title: None,
            read_time: synth::RSS_READ_TIME,
            max_items,
        }
    }

    pub fn entry_to_draft(&self, entry: ParsedEntry) -> Option<ArticleDraft> {
        let title = match (entry.title, &self.placeholder_title) {
            (Some(title), _) => title,
            (None, Some(placeholder)) => placeholder.clone(),
            (None, None) => return None,
        };
        let url = entry.url.unwrap_or_else(|| PLACEHOLDER_URL.to_string());

        let raw_description = entry.description.or(entry.content).unwrap_or_default();
        let summary = feed::smart_truncate(&feed::extract_text_from_html(&raw_description), SUMMARY_MAX_CHARS);

        let tags = if entry.tags.is_empty() {
            self.default_tags.clone()
        } else {
            entry.tags
        };

        Some(ArticleDraft {
            id: ids::stable_id(self.source, &title, &url),
            title,
            summary,
            url,
            published_at: entry.published_at,
            author: entry.author.unwrap_or_else(|| self.default_author.clone()),
            tags,
            cover_image: None,
            read_time_minutes: Some(synth::read_time_minutes(self.read_time.clone())),
            body_html: feed::paragraph(&raw_description),
            source: self.source,
        })
    }

    /// Parse a whole feed document and keep the first `max_items` usable entries.
    pub fn parse_document(&self, content: &str) -> Result<Vec<ArticleDraft>> {
        let parsed = FeedParser::parse_feed(content)?;
        debug!(
            "Feed {} has {} entries",
            parsed.title.as_deref().unwrap_or("(untitled)"),
            parsed.entries.len()
        );
        Ok(parsed
            .entries
            .into_iter()
            .take(self.max_items)
            .filter_map(|entry| self.entry_to_draft(entry))
            .collect())
    }
}

/// Feed-text adapter over a list of feeds, fetched in parallel.
pub struct RssFeedSource {
    fetcher: Arc<Fetcher>,
    feeds: Vec<String>,
    profile: FeedProfile,
}

impl RssFeedSource {
    pub fn new(fetcher: Arc<Fetcher>, feeds: Vec<String>, profile: FeedProfile) -> Self {
        Self {
            fetcher,
            feeds,
            profile,
        }
    }

    async fn pull_feed(&self, url: &str) -> Result<Vec<ArticleDraft>> {
        let content = self.fetcher.fetch_text(url).await?;
        self.profile.parse_document(&content)
    }
}

#[async_trait]
impl ArticleAdapter for RssFeedSource {
    fn source(&self) -> ArticleSource {
        self.profile.source
    }

    fn source_name(&self) -> String {
        format!("RSS feeds ({})", self.feeds.len())
    }

    async fn pull(&self, _limit_hint: Option<usize>) -> Result<Vec<ArticleDraft>> {
        let results = join_all(self.feeds.iter().map(|url| self.pull_feed(url))).await;

        let mut drafts = Vec::new();
        for (url, result) in self.feeds.iter().zip(results) {
            match result {
                Ok(mut items) => drafts.append(&mut items),
                Err(e) => warn!("RSS fetch error for {}: {}", url, e),
            }
        }

        info!("Pulled {} articles from {} RSS feeds", drafts.len(), self.feeds.len());
        Ok(drafts)
    }
}
