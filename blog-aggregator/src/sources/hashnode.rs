use crate::fetcher::Fetcher;
use crate::rss_utils::{ids, time};
use crate::traits::ArticleAdapter;
use crate::types::{ArticleDraft, ArticleSource, Result, PLACEHOLDER_TITLE, PLACEHOLDER_URL};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
struct GraphQlRequest {
    query: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashnodePost {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub brief: Option<String>,
    pub date_added: Option<String>,
    pub author: Option<HashnodeAuthor>,
    #[serde(default)]
    pub tags: Vec<HashnodeTag>,
    pub cover_image: Option<String>,
    pub read_time: Option<u32>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HashnodeAuthor {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HashnodeTag {
    pub name: Option<String>,
}

pub fn build_query(username: &str, limit: usize) -> String {
    format!(
        r#"query {{
  user(username: "{username}") {{
    publications(first: 1) {{
      edges {{
        node {{
          posts(first: {limit}) {{
            edges {{
              node {{
                title
                brief
                slug
                dateAdded
                author {{ name }}
                tags {{ name }}
                coverImage
                readTime
                content
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        username = username.replace('"', ""),
        limit = limit,
    )
}

/// Pull the posts out of a GraphQL reply. Any missing level of the
/// `data.user.publications.edges[0].node.posts.edges[].node` path yields
/// an empty list.
pub fn parse_response(body: &Value, username: &str, limit: usize) -> Vec<ArticleDraft> {
    let edges = body
        .pointer("/data/user/publications/edges/0/node/posts/edges")
        .and_then(Value::as_array);

    let Some(edges) = edges else {
        return Vec::new();
    };

    edges
        .iter()
        .filter_map(|edge| edge.get("node"))
        .filter_map(|node| serde_json::from_value::<HashnodePost>(node.clone()).ok())
        .take(limit)
        .map(|post| post.into_draft(username))
        .collect()
}

impl HashnodePost {
    pub fn into_draft(self, username: &str) -> ArticleDraft {
        let url = self
            .slug
            .as_deref()
            .map(|slug| format!("https://{}.hashnode.dev/{}", username, slug.trim_start_matches('/')))
            .unwrap_or_else(|| PLACEHOLDER_URL.to_string());
        let title = self.title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
        let id = match self.slug {
            Some(slug) if !slug.is_empty() => format!("hashnode-{}", slug),
            _ => ids::stable_id(ArticleSource::Hashnode, &title, &url),
        };

        ArticleDraft {
            id,
            title,
            summary: self.brief.unwrap_or_default(),
            url,
            published_at: time::parse_published(self.date_added.as_deref()),
            author: self
                .author
                .and_then(|a| a.name)
                .unwrap_or_else(|| username.to_string()),
            tags: self.tags.into_iter().filter_map(|t| t.name).collect(),
            cover_image: self.cover_image,
            read_time_minutes: self.read_time,
            body_html: self.content,
            source: ArticleSource::Hashnode,
        }
    }
}

/// Single-publication GraphQL adapter.
pub struct HashnodeSource {
    fetcher: Arc<Fetcher>,
    endpoint: String,
    username: String,
    api_key: Option<String>,
    default_limit: usize,
}

impl HashnodeSource {
    pub fn new(
        fetcher: Arc<Fetcher>,
        endpoint: String,
        username: String,
        api_key: Option<String>,
        default_limit: usize,
    ) -> Self {
        Self {
            fetcher,
            endpoint,
            username,
            api_key,
            default_limit,
        }
    }
}

#[async_trait]
impl ArticleAdapter for HashnodeSource {
    fn source(&self) -> ArticleSource {
        ArticleSource::Hashnode
    }

    fn source_name(&self) -> String {
        format!("Hashnode ({})", self.username)
    }

    async fn pull(&self, limit_hint: Option<usize>) -> Result<Vec<ArticleDraft>> {
        let limit = limit_hint.unwrap_or(self.default_limit);
        let request = GraphQlRequest {
            query: build_query(&self.username, limit),
        };

        let body: Value = self
            .fetcher
            .post_json(&self.endpoint, &request, self.api_key.as_deref())
            .await?;

        let drafts = parse_response(&body, &self.username, limit);
        info!("Pulled {} articles from {}", drafts.len(), self.source_name());
        Ok(drafts)
    }
}
