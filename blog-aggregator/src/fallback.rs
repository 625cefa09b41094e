use crate::types::{ArticleDraft, ArticleSource};
use chrono::{DateTime, Duration, Utc};

pub const FALLBACK_TOPICS: [&str; 20] = [
    "React Hooks Deep Dive",
    "Next.js 14 Features",
    "TypeScript Best Practices",
    "Node.js Performance",
    "CSS Grid Layout",
    "JavaScript ES2023",
    "Web Security",
    "API Design",
    "Database Optimization",
    "Cloud Deployment",
    "Testing Strategies",
    "Code Review",
    "Git Workflows",
    "Docker Basics",
    "Microservices",
    "GraphQL vs REST",
    "Progressive Web Apps",
    "Web Accessibility",
    "Performance Optimization",
    "SEO for Developers",
];

const AUTHORS: [&str; 3] = ["Sarah Chen", "Mike Johnson", "Alex Rodriguez"];

/// The placeholder set. Everything but the dates is fixed; item `i` is
/// dated `i` days before `now`, so the set is already newest-first.
pub fn fallback_drafts(now: DateTime<Utc>) -> Vec<ArticleDraft> {
    FALLBACK_TOPICS
        .iter()
        .enumerate()
        .map(|(i, topic)| ArticleDraft {
            id: format!("fallback-{}", i + 1),
            title: topic.to_string(),
            summary: format!("A comprehensive guide to {}.", topic.to_lowercase()),
            url: format!("https://example.com/blog-{}", i + 1),
            published_at: Some(now - Duration::days(i as i64)),
            author: AUTHORS[i % AUTHORS.len()].to_string(),
            tags: vec!["tech".to_string(), "programming".to_string()],
            cover_image: None,
            read_time_minutes: Some(6 + (i % 12) as u32),
            body_html: Some(format!("<p>{} content...</p>", topic)),
            source: ArticleSource::Fallback,
        })
        .collect()
}
