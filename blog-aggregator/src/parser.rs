use crate::types::{AggregatorError, Result};
use chrono::{DateTime, Utc};
use feed_rs::parser;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

/// One feed item with every field optional. Nothing here is required to be
/// present; adapters decide the defaults.
#[derive(Debug, Default, Clone)]
pub struct ParsedEntry {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

pub struct FeedParser;

impl FeedParser {
    /// Parse RSS/Atom text. Only a document that is not a feed at all is an
    /// error; malformed or missing fields inside items become `None`.
    pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        if !Self::is_valid_feed_content(content) {
            return Err(AggregatorError::Parse("Content does not look like an RSS/Atom feed".to_string()));
        }

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<ParsedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> ParsedEntry {
        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty());

        let url = entry
            .links
            .first()
            .map(|link| link.href.trim().to_string())
            .filter(|href| !href.is_empty());

        let description = entry
            .summary
            .map(|s| s.content)
            .filter(|s| !s.trim().is_empty());

        let content = entry
            .content
            .and_then(|c| c.body)
            .filter(|body| !body.trim().is_empty());

        let author = entry
            .authors
            .first()
            .map(|a| a.name.trim().to_string())
            .filter(|name| !name.is_empty());

        let published_at = entry.published.or(entry.updated);

        let tags = entry
            .categories
            .into_iter()
            .map(|c| c.term.trim().to_string())
            .filter(|term| !term.is_empty())
            .collect();

        ParsedEntry {
            url,
            title,
            description,
            content,
            author,
            published_at,
            tags,
        }
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<channel")
            || content_lower.contains("<rdf:rdf")
    }
}
