use crate::fallback::fallback_drafts;
use crate::fetcher::Fetcher;
use crate::sources::{DevToSource, FeedProfile, HashnodeSource, MediumSource, RssFeedSource};
use crate::traits::ArticleAdapter;
use crate::types::{
    AggregatedPage, Article, ArticleDraft, FetchConfig, PageQuery, Pagination, ResponseSource, Result,
    SourcesConfig, MIN_ARTICLES, PLACEHOLDER_URL, UNPAGED_CAP,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scatter-gather over a fixed set of adapters.
///
/// Every adapter runs concurrently and is awaited to completion; a failing
/// adapter contributes nothing and is only logged. [`Aggregator::aggregate`]
/// therefore has no error path.
#[derive(Clone)]
pub struct Aggregator {
    adapters: Vec<Arc<dyn ArticleAdapter>>,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn ArticleAdapter>>) -> Self {
        Self { adapters }
    }

    /// The four production adapters sharing one HTTP client.
    pub fn from_config(sources: &SourcesConfig, fetch_config: FetchConfig) -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new(fetch_config)?);

        let adapters: Vec<Arc<dyn ArticleAdapter>> = vec![
            Arc::new(DevToSource::new(
                fetcher.clone(),
                sources.devto_api_url.clone(),
                sources.devto_tags.clone(),
                sources.devto_per_page,
            )),
            Arc::new(HashnodeSource::new(
                fetcher.clone(),
                sources.hashnode_endpoint.clone(),
                sources.hashnode_username.clone(),
                sources.hashnode_api_key.clone(),
                sources.hashnode_default_limit,
            )),
            Arc::new(MediumSource::new(
                fetcher.clone(),
                sources.medium_feed_url.clone(),
                sources.medium_item_limit,
            )),
            Arc::new(RssFeedSource::new(
                fetcher,
                sources.rss_feeds.clone(),
                FeedProfile::tech_blog(sources.rss_items_per_feed),
            )),
        ];

        Ok(Self::new(adapters))
    }

    pub fn adapters(&self) -> &[Arc<dyn ArticleAdapter>] {
        &self.adapters
    }

    /// Run every adapter and concatenate whatever succeeded, in adapter order.
    /// Each draft is stamped with the origin of the adapter that produced it.
    pub async fn collect(&self, limit_hint: Option<usize>) -> Vec<ArticleDraft> {
        let results = join_all(self.adapters.iter().map(|adapter| adapter.pull(limit_hint))).await;

        let mut drafts = Vec::new();
        for (adapter, result) in self.adapters.iter().zip(results) {
            match result {
                Ok(items) => {
                    let source = adapter.source();
                    debug!("Source {} returned {} articles", source.tag(), items.len());
                    drafts.extend(items.into_iter().map(|mut draft| {
                        draft.source = source;
                        draft
                    }));
                }
                Err(e) => warn!("Source {} failed: {}", adapter.source_name(), e),
            }
        }
        drafts
    }

    pub async fn aggregate(&self, query: PageQuery) -> AggregatedPage {
        let now = Utc::now();
        let drafts = self.collect(query.limit).await;
        info!("Collected {} articles from {} sources", drafts.len(), self.adapters.len());
        build_page(drafts, query, now)
    }
}

/// Merge adapter output into the final sorted, deduplicated list.
///
/// Real drafts are deduplicated first; when fewer than [`MIN_ARTICLES`]
/// unique ones remain the fallback set is appended (and deduplicated
/// against them). The returned source is `Fallback` only when no real draft
/// came back at all.
pub fn merge(drafts: Vec<ArticleDraft>, now: DateTime<Utc>) -> (Vec<Article>, ResponseSource) {
    let source = if drafts.is_empty() {
        ResponseSource::Fallback
    } else {
        ResponseSource::Multiple
    };

    let mut seen = HashSet::new();
    let mut articles: Vec<Article> = drafts
        .into_iter()
        .map(|draft| draft.normalize(now))
        .filter(|article| seen.insert(dedupe_key(article)))
        .collect();

    if articles.len() < MIN_ARTICLES {
        articles.extend(
            fallback_drafts(now)
                .into_iter()
                .map(|draft| draft.normalize(now))
                .filter(|article| seen.insert(dedupe_key(article))),
        );
    }

    // stable: equal dates keep adapter order
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    (articles, source)
}

/// Trimmed url, or the trimmed title when the url is missing or the `#`
/// placeholder.
pub fn dedupe_key(article: &Article) -> String {
    let url = article.url.trim();
    if url.is_empty() || url == PLACEHOLDER_URL {
        article.title.trim().to_string()
    } else {
        url.to_string()
    }
}

pub fn paginate(articles: Vec<Article>, query: PageQuery) -> (Vec<Article>, Pagination) {
    let total = articles.len();
    match query.limit {
        Some(limit) => {
            let limit = limit.max(1);
            let page = query.page.max(1);
            let start = page.saturating_sub(1).saturating_mul(limit).min(total);
            let end = start.saturating_add(limit).min(total);
            let posts = articles[start..end].to_vec();
            let pagination = Pagination {
                page,
                limit,
                total_pages: total.div_ceil(limit),
            };
            (posts, pagination)
        }
        None => {
            let posts: Vec<Article> = articles.into_iter().take(UNPAGED_CAP).collect();
            let pagination = Pagination {
                page: 1,
                limit: total.min(UNPAGED_CAP),
                total_pages: 1,
            };
            (posts, pagination)
        }
    }
}

pub fn build_page(drafts: Vec<ArticleDraft>, query: PageQuery, now: DateTime<Utc>) -> AggregatedPage {
    let (articles, source) = merge(drafts, now);
    let total = articles.len();
    let (posts, pagination) = paginate(articles, query);

    AggregatedPage {
        posts,
        total,
        pagination,
        source,
        error: None,
    }
}

impl AggregatedPage {
    /// Answer used when the request could not be served at all.
    pub fn fallback(now: DateTime<Utc>, error: impl Into<String>) -> Self {
        let posts: Vec<Article> = fallback_drafts(now)
            .into_iter()
            .map(|draft| draft.normalize(now))
            .collect();
        let total = posts.len();

        Self {
            posts,
            total,
            pagination: Pagination {
                page: 1,
                limit: total,
                total_pages: 1,
            },
            source: ResponseSource::Fallback,
            error: Some(error.into()),
        }
    }
}
