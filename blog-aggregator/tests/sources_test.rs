use blog_aggregator::rss_utils::{feed, ids, time, url};
use blog_aggregator::sources::{devto, hashnode, medium, FeedProfile};
use blog_aggregator::{
    Aggregator, ArticleSource, FeedParser, FetchConfig, PageQuery, SourcesConfig, PLACEHOLDER_URL,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::sync::Once;
use tracing::info;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

const DEVTO_LISTING: &str = r#"[
  {
    "id": 1812345,
    "title": "Understanding React Server Components",
    "description": "A walk through the new rendering model.",
    "url": "https://dev.to/jane/understanding-rsc-1abc",
    "canonical_url": "https://dev.to/jane/understanding-rsc-1abc",
    "published_at": "2024-05-20T09:15:00Z",
    "tag_list": ["react", "webdev"],
    "tags": "react, webdev",
    "user": { "name": "Jane Doe", "username": "jane" },
    "cover_image": "https://media.dev.to/cover.png",
    "reading_time_minutes": 7
  },
  {
    "id": 1812399,
    "title": "Tiny post",
    "description": "",
    "url": null,
    "canonical_url": "https://blog.example.org/tiny",
    "published_at": null,
    "created_at": "not a date",
    "tag_list": [],
    "tags": "",
    "user": { "username": "anon" },
    "social_image": "https://media.dev.to/social.png"
  }
]"#;

const MEDIUM_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>JavaScript on Medium</title>
    <link>https://medium.com/tag/javascript</link>
    <description>Latest stories tagged with JavaScript</description>
    <item>
      <title>Closures Explained</title>
      <link>https://medium.com/@dev/closures-explained-123</link>
      <guid>https://medium.com/p/123</guid>
      <author>Dana Dev</author>
      <category>javascript</category>
      <category>closures</category>
      <pubDate>Mon, 20 May 2024 10:00:00 GMT</pubDate>
      <description><![CDATA[<p>Closures <b>capture</b> their environment.</p>]]></description>
    </item>
    <item>
      <link>https://medium.com/@dev/untitled-456</link>
      <guid>https://medium.com/p/456</guid>
      <description>No title here.</description>
    </item>
    <item>
      <title>Third</title>
      <link>https://medium.com/@dev/third-789</link>
    </item>
  </channel>
</rss>"#;

const BLOG_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Some Tech Blog</title>
    <link>https://blog.example.org</link>
    <description>Posts</description>
    <item>
      <title>Container Queries in Practice</title>
      <link>https://blog.example.org/container-queries</link>
      <pubDate>Tue, 21 May 2024 08:30:00 GMT</pubDate>
      <description>Size components by their container.</description>
    </item>
    <item>
      <link>https://blog.example.org/no-title</link>
      <description>Dropped because it has no title.</description>
    </item>
    <item>
      <title>Undated Post</title>
      <link>https://blog.example.org/undated</link>
    </item>
  </channel>
</rss>"#;

#[test]
fn test_devto_listing_maps_fields() {
    init_tracing();

    let drafts = devto::parse_listing(DEVTO_LISTING, "react", 8).unwrap();
    assert_eq!(drafts.len(), 2);

    let first = &drafts[0];
    assert_eq!(first.id, "devto-1812345");
    assert_eq!(first.title, "Understanding React Server Components");
    assert_eq!(first.author, "Jane Doe");
    assert_eq!(first.tags, vec!["react", "webdev"]);
    assert_eq!(first.read_time_minutes, Some(7));
    assert_eq!(first.cover_image.as_deref(), Some("https://media.dev.to/cover.png"));
    assert_eq!(
        first.published_at,
        Some(Utc.with_ymd_and_hms(2024, 5, 20, 9, 15, 0).unwrap())
    );
    assert_eq!(
        first.body_html.as_deref(),
        Some("<p>A walk through the new rendering model.</p>")
    );
    assert_eq!(first.source, ArticleSource::Devto);

    let second = &drafts[1];
    assert_eq!(second.url, "https://blog.example.org/tiny");
    assert_eq!(second.author, "anon");
    // no tags of its own: falls back to the tag it was fetched under
    assert_eq!(second.tags, vec!["react"]);
    assert_eq!(second.read_time_minutes, Some(5));
    assert_eq!(second.cover_image.as_deref(), Some("https://media.dev.to/social.png"));
    assert_eq!(second.published_at, Some(DateTime::<Utc>::UNIX_EPOCH));
    assert!(second.body_html.is_none());
}

#[test]
fn test_devto_listing_respects_per_page_and_rejects_garbage() {
    let drafts = devto::parse_listing(DEVTO_LISTING, "react", 1).unwrap();
    assert_eq!(drafts.len(), 1);

    assert!(devto::parse_listing("{\"error\":\"rate limited\"}", "react", 8).is_err());
}

#[test]
fn test_hashnode_response_maps_posts() {
    let body = json!({
        "data": { "user": { "publications": { "edges": [ { "node": { "posts": { "edges": [
            { "node": {
                "title": "Edge Functions 101",
                "brief": "Running code close to users.",
                "slug": "edge-functions-101",
                "dateAdded": "2024-05-18T12:00:00.000Z",
                "author": { "name": "Sam" },
                "tags": [ { "name": "serverless" }, { "name": "edge" } ],
                "coverImage": "https://cdn.hashnode.com/cover.png",
                "readTime": 6,
                "content": "<p>Hello edge</p>"
            } },
            { "node": { "title": "No slug" } }
        ] } } } ] } } }
    });

    let drafts = hashnode::parse_response(&body, "sam", 6);
    assert_eq!(drafts.len(), 2);

    let post = &drafts[0];
    assert_eq!(post.id, "hashnode-edge-functions-101");
    assert_eq!(post.url, "https://sam.hashnode.dev/edge-functions-101");
    assert_eq!(post.author, "Sam");
    assert_eq!(post.tags, vec!["serverless", "edge"]);
    assert_eq!(post.read_time_minutes, Some(6));
    assert_eq!(post.body_html.as_deref(), Some("<p>Hello edge</p>"));
    assert!(post.published_at.is_some());

    let bare = &drafts[1];
    assert_eq!(bare.url, PLACEHOLDER_URL);
    assert_eq!(bare.author, "sam");
    assert!(bare.id.starts_with("hashnode-"));
    assert!(bare.published_at.is_none());

    assert_eq!(hashnode::parse_response(&body, "sam", 1).len(), 1);
}

#[test]
fn test_hashnode_missing_publication_is_empty() {
    let body = json!({ "data": { "user": null } });
    assert!(hashnode::parse_response(&body, "sam", 6).is_empty());

    let errors = json!({ "errors": [ { "message": "User not found" } ] });
    assert!(hashnode::parse_response(&errors, "sam", 6).is_empty());
}

#[test]
fn test_hashnode_query_embeds_username_and_limit() {
    let query = hashnode::build_query("sam", 12);
    assert!(query.contains(r#"user(username: "sam")"#));
    assert!(query.contains("posts(first: 12)"));
}

#[test]
fn test_medium_items_use_defaults() {
    let drafts = medium::parse_items(MEDIUM_FEED, 10).unwrap();
    assert_eq!(drafts.len(), 3);

    let first = &drafts[0];
    assert_eq!(first.title, "Closures Explained");
    assert_eq!(first.author, "Dana Dev");
    assert_eq!(first.tags, vec!["javascript", "closures"]);
    assert_eq!(first.summary, "Closures capture their environment.");
    assert_eq!(first.source, ArticleSource::Medium);
    assert!(first.id.starts_with("medium-"));
    let read_time = first.read_time_minutes.unwrap();
    assert!((4..12).contains(&read_time));

    let untitled = &drafts[1];
    assert_eq!(untitled.title, "Medium Article");
    assert_eq!(untitled.author, "Medium");
    assert_eq!(untitled.tags, vec!["javascript", "medium"]);

    assert!(drafts[2].body_html.is_none());
    assert_eq!(medium::parse_items(MEDIUM_FEED, 1).unwrap().len(), 1);
}

#[test]
fn test_tech_blog_profile_skips_untitled_items() {
    let profile = FeedProfile::tech_blog(5);
    let drafts = profile.parse_document(BLOG_FEED).unwrap();

    let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Container Queries in Practice", "Undated Post"]);

    let first = &drafts[0];
    assert_eq!(first.author, "Tech Blog");
    assert_eq!(first.tags, vec!["web-development", "programming"]);
    assert_eq!(first.source, ArticleSource::Rss);
    assert!((5..17).contains(&first.read_time_minutes.unwrap()));

    assert!(drafts[1].published_at.is_none());
}

#[test]
fn test_feed_ids_are_stable() {
    let a = FeedProfile::tech_blog(5).parse_document(BLOG_FEED).unwrap();
    let b = FeedProfile::tech_blog(5).parse_document(BLOG_FEED).unwrap();
    let ids_a: Vec<_> = a.iter().map(|d| d.id.clone()).collect();
    let ids_b: Vec<_> = b.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids_a, ids_b);

    assert_eq!(
        ids::stable_id(ArticleSource::Rss, "T", "https://x.org/a"),
        ids::stable_id(ArticleSource::Rss, " T ", "https://x.org/a ")
    );
    assert_ne!(
        ids::stable_id(ArticleSource::Rss, "T", "https://x.org/a"),
        ids::stable_id(ArticleSource::Rss, "T", "https://x.org/b")
    );
}

#[test]
fn test_non_feed_content_is_rejected() {
    assert!(FeedParser::parse_feed("<html><body>Not a feed</body></html>").is_err());
    assert!(FeedParser::is_valid_feed_content(BLOG_FEED));
}

#[test]
fn test_date_parsing() {
    assert_eq!(time::parse_published(None), None);
    assert_eq!(time::parse_published(Some("   ")), None);
    assert_eq!(
        time::parse_published(Some("garbage")),
        Some(DateTime::<Utc>::UNIX_EPOCH)
    );
    assert_eq!(
        time::parse_published(Some("Tue, 21 May 2024 08:30:00 GMT")),
        Some(Utc.with_ymd_and_hms(2024, 5, 21, 8, 30, 0).unwrap())
    );
    assert_eq!(
        time::parse_published(Some("2024-05-21T10:30:00+02:00")),
        Some(Utc.with_ymd_and_hms(2024, 5, 21, 8, 30, 0).unwrap())
    );
}

#[test]
fn test_text_helpers() {
    assert_eq!(
        feed::extract_text_from_html("<p>Hello<br/>world</p>  <b>!</b>"),
        "Hello world !"
    );
    assert_eq!(feed::smart_truncate("short", 10), "short");
    assert_eq!(
        feed::smart_truncate("One sentence. Another sentence that is long", 20),
        "One sentence."
    );
    assert_eq!(feed::smart_truncate("alpha beta gamma", 12), "alpha beta...");
    assert_eq!(feed::paragraph(""), None);

    assert!(url::is_valid_feed_url("https://web.dev/feed.xml"));
    assert!(!url::is_valid_feed_url("ftp://example.org/feed"));
    assert!(!url::is_valid_feed_url("css-tricks.com/feed"));
}

#[tokio::test]
#[ignore = "Requires network access to the live blog sources"]
async fn test_live_aggregation() {
    init_tracing();

    let aggregator = Aggregator::from_config(&SourcesConfig::default(), FetchConfig::default()).unwrap();
    let page = aggregator.aggregate(PageQuery::new(Some(6), 1)).await;

    info!("Live aggregation: {} total, source {:?}", page.total, page.source);
    assert_eq!(page.posts.len(), 6);
    assert!(page.total >= 20);
}
