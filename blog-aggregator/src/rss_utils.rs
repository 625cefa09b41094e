/// Helpers shared by the source adapters

/// URL utilities
pub mod url {
    use url::Url;

    /// Only absolute http(s) urls are fetchable feeds.
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        Url::parse(url_str)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
            .unwrap_or(false)
    }
}

/// Date handling for source payloads
pub mod time {
    use chrono::{DateTime, Utc};

    /// `None` when the source sent no date; the epoch when it sent one we
    /// cannot read, so such items sink to the bottom of a newest-first list.
    pub fn parse_published(raw: Option<&str>) -> Option<DateTime<Utc>> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

        let parsed = DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .map(|dt| dt.with_timezone(&Utc));

        Some(parsed.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
    }
}

/// Text cleanup for feed descriptions
pub mod feed {
    /// Extract clean text content from HTML
    pub fn extract_text_from_html(html: &str) -> String {
        html.chars()
            .fold((String::new(), false), |(mut text, in_tag), c| match c {
                '<' => (text, true),
                '>' => {
                    text.push(' ');
                    (text, false)
                }
                _ if !in_tag => {
                    text.push(c);
                    (text, in_tag)
                }
                _ => (text, in_tag),
            })
            .0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Truncate text to a maximum number of characters, trying to break at a
    /// sentence or word boundary.
    pub fn smart_truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }

        let truncated: String = text.chars().take(max_chars).collect();
        if let Some(last_sentence) = truncated.rfind(". ") {
            truncated[..last_sentence + 1].to_string()
        } else if let Some(last_space) = truncated.rfind(' ') {
            format!("{}...", &truncated[..last_space])
        } else {
            format!("{}...", truncated)
        }
    }

    pub fn paragraph(text: &str) -> Option<String> {
        if text.trim().is_empty() {
            None
        } else {
            Some(format!("<p>{}</p>", text))
        }
    }
}

/// Synthetic values for sources that don't report them. These are the only
/// non-deterministic inputs to an article besides the "now" date default.
pub mod synth {
    use rand::Rng;
    use std::ops::Range;

    pub const MEDIUM_READ_TIME: Range<u32> = 4..12;
    pub const RSS_READ_TIME: Range<u32> = 5..17;

    pub fn read_time_minutes(range: Range<u32>) -> u32 {
        rand::rng().random_range(range)
    }
}

/// Article identifiers
pub mod ids {
    use crate::types::ArticleSource;
    use uuid::Uuid;

    /// Deterministic id for sources without a native key: the same title and
    /// link always produce the same id.
    pub fn stable_id(source: ArticleSource, title: &str, link: &str) -> String {
        let key = format!("{}\n{}", title.trim(), link.trim());
        let hash = Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes());
        format!("{}-{}", source.tag(), hash.simple())
    }
}
