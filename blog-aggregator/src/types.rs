use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Below this many merged articles the fallback set is appended.
pub const MIN_ARTICLES: usize = 20;
/// Upper bound on a single page when the caller asks for one.
pub const MAX_PAGE_LIMIT: usize = 100;
/// Upper bound on the response when no page size is requested.
pub const UNPAGED_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSource {
    Devto,
    Hashnode,
    Medium,
    Rss,
    Fallback,
}

impl ArticleSource {
    pub fn tag(&self) -> &'static str {
        match self {
            ArticleSource::Devto => "devto",
            ArticleSource::Hashnode => "hashnode",
            ArticleSource::Medium => "medium",
            ArticleSource::Rss => "rss",
            ArticleSource::Fallback => "fallback",
        }
    }
}

/// The normalized record served to the blog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    pub source: ArticleSource,
}

/// What an adapter hands back before normalization.
///
/// `published_at` is `None` when the source carried no date at all; a date
/// that was present but unparsable is already mapped to the epoch by the
/// adapter (see [`crate::rss_utils::time::parse_published`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub read_time_minutes: Option<u32>,
    pub body_html: Option<String>,
    pub source: ArticleSource,
}

pub const DEFAULT_TAG: &str = "tech";
pub const PLACEHOLDER_URL: &str = "#";
pub const PLACEHOLDER_TITLE: &str = "Untitled";

impl ArticleDraft {
    /// Fill the remaining defaults. `now` is the single synthesis point for
    /// missing dates so that everything after this call is deterministic.
    pub fn normalize(self, now: DateTime<Utc>) -> Article {
        let title = if self.title.trim().is_empty() {
            PLACEHOLDER_TITLE.to_string()
        } else {
            self.title
        };
        let url = if self.url.trim().is_empty() {
            PLACEHOLDER_URL.to_string()
        } else {
            self.url
        };
        let tags = if self.tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            self.tags
        };
        let id = if self.id.trim().is_empty() {
            crate::rss_utils::ids::stable_id(self.source, &title, &url)
        } else {
            self.id
        };

        Article {
            id,
            title,
            summary: self.summary,
            url,
            published_at: self.published_at.unwrap_or(now),
            author: self.author,
            tags,
            cover_image: self.cover_image,
            read_time_minutes: self.read_time_minutes,
            body_html: self.body_html,
            source: self.source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Multiple,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedPage {
    pub posts: Vec<Article>,
    pub total: usize,
    pub pagination: Pagination,
    pub source: ResponseSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Page request after clamping. `limit == None` means "no pagination".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub page: usize,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { limit: None, page: 1 }
    }
}

impl PageQuery {
    pub fn new(limit: Option<usize>, page: usize) -> Self {
        Self {
            limit: limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT)),
            page: page.max(1),
        }
    }

    /// Build from raw query-string values. Values that are not integers are
    /// treated as if they were not supplied.
    pub fn from_params(limit: Option<&str>, page: Option<&str>) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|l| l.clamp(1, MAX_PAGE_LIMIT as i64) as usize);
        let page = page
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|p| p.max(1) as usize)
            .unwrap_or(1);

        Self { limit, page }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Portfolio-Blog-Aggregator/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

/// Where each adapter points and how much it takes from its source.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub devto_api_url: String,
    pub devto_tags: Vec<String>,
    pub devto_per_page: usize,
    pub hashnode_endpoint: String,
    pub hashnode_username: String,
    pub hashnode_api_key: Option<String>,
    pub hashnode_default_limit: usize,
    pub medium_feed_url: String,
    pub medium_item_limit: usize,
    pub rss_feeds: Vec<String>,
    pub rss_items_per_feed: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            devto_api_url: "https://dev.to/api/articles".to_string(),
            devto_tags: ["javascript", "react", "nextjs", "typescript"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            devto_per_page: 8,
            hashnode_endpoint: "https://gql.hashnode.com/".to_string(),
            hashnode_username: "hashnode".to_string(),
            hashnode_api_key: None,
            hashnode_default_limit: 6,
            medium_feed_url: "https://medium.com/feed/tag/javascript".to_string(),
            medium_item_limit: 10,
            rss_feeds: [
                "https://css-tricks.com/feed/",
                "https://www.smashingmagazine.com/feed/",
                "https://alistapart.com/main/feed/",
                "https://web.dev/feed.xml",
                "https://blog.logrocket.com/feed/",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            rss_items_per_feed: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
