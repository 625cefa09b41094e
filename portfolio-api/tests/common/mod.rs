#![allow(dead_code)]

use async_trait::async_trait;
use blog_aggregator::{AggregatorError, Aggregator, ArticleAdapter, ArticleDraft, ArticleSource};
use chrono::{Duration, Utc};
use interfaces::{
    ChatRole, Comment, CommentFilter, ContactMessage, ConversationTurn, MailError, Mailer, NewComment,
    NewContactMessage, OutboundEmail, SiteStore, StoreError, StoreResult, Subscriber,
};
use portfolio_api::assistant::Assistant;
use portfolio_api::config::Config;
use portfolio_api::AppState;
use std::sync::{Arc, Mutex, Once};
use uuid::Uuid;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Default)]
struct Tables {
    contacts: Vec<ContactMessage>,
    subscribers: Vec<Subscriber>,
    comments: Vec<Comment>,
    turns: Vec<ConversationTurn>,
}

/// In-memory stand-in for the PostgreSQL store. Rows are kept in insertion
/// order and listed newest first.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every call fails with a backend error.
    pub broken: bool,
}

impl MemoryStore {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.broken {
            return Err(StoreError::Backend(anyhow::anyhow!("connection refused")));
        }
        Ok(())
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.tables.lock().unwrap().turns.clone()
    }
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn create_contact_message(&self, message: NewContactMessage) -> StoreResult<ContactMessage> {
        self.check()?;
        let contact = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name,
            email: message.email,
            message: message.message,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contact_messages(&self, limit: Option<usize>) -> StoreResult<Vec<ContactMessage>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let newest_first = tables.contacts.iter().rev().cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        })
    }

    async fn delete_contact_message(&self, id: Uuid) -> StoreResult<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.contacts.len();
        tables.contacts.retain(|c| c.id != id);
        if tables.contacts.len() == before {
            return Err(StoreError::not_found("contact message", id));
        }
        Ok(())
    }

    async fn add_subscriber(&self, email: &str) -> StoreResult<Subscriber> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.subscribers.iter().any(|s| s.email == email) {
            return Err(StoreError::Duplicate(email.to_string()));
        }
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn find_subscriber(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn list_subscribers(&self) -> StoreResult<Vec<Subscriber>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.subscribers.iter().rev().cloned().collect())
    }

    async fn set_subscriber_active(&self, id: Uuid, is_active: bool) -> StoreResult<Subscriber> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let subscriber = tables
            .subscribers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("subscriber", id))?;
        subscriber.is_active = is_active;
        Ok(subscriber.clone())
    }

    async fn delete_subscriber(&self, id: Uuid) -> StoreResult<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.subscribers.len();
        tables.subscribers.retain(|s| s.id != id);
        if tables.subscribers.len() == before {
            return Err(StoreError::not_found("subscriber", id));
        }
        Ok(())
    }

    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        self.check()?;
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            author: comment.author,
            email: comment.email,
            content: comment.content,
            created_at: Utc::now(),
            approved: false,
        };
        self.tables.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .rev()
            .filter(|c| filter.post_id.as_ref().is_none_or(|p| &c.post_id == p))
            .filter(|c| !filter.approved_only || c.approved)
            .cloned()
            .collect())
    }

    async fn approve_comment(&self, id: Uuid) -> StoreResult<Comment> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("comment", id))?;
        comment.approved = true;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(StoreError::not_found("comment", id));
        }
        Ok(())
    }

    async fn append_turn(&self, session_id: &str, role: ChatRole, message: &str) -> StoreResult<ConversationTurn> {
        self.check()?;
        let turn = ConversationTurn {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            role,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().turns.push(turn.clone());
        Ok(turn)
    }

    async fn recent_turns(&self, session_id: &str, limit: usize) -> StoreResult<Vec<ConversationTurn>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let session: Vec<_> = tables.turns.iter().filter(|t| t.session_id == session_id).cloned().collect();
        let skip = session.len().saturating_sub(limit);
        Ok(session.into_iter().skip(skip).collect())
    }
}

/// Records every email; recipients listed in `failing` get a delivery error.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub failing: Vec<String>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if self.failing.contains(&email.to) {
            return Err(MailError::Delivery(format!("mailbox {} unavailable", email.to)));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Serves `count` dated drafts, or fails when `count` is `None`.
pub struct StubAdapter {
    pub count: Option<usize>,
}

#[async_trait]
impl ArticleAdapter for StubAdapter {
    fn source(&self) -> ArticleSource {
        ArticleSource::Devto
    }

    fn source_name(&self) -> String {
        "stub".to_string()
    }

    async fn pull(&self, _limit_hint: Option<usize>) -> blog_aggregator::Result<Vec<ArticleDraft>> {
        let Some(count) = self.count else {
            return Err(AggregatorError::General("stub offline".to_string()));
        };
        let now = Utc::now();
        Ok((0..count)
            .map(|i| ArticleDraft {
                id: format!("stub-{}", i),
                title: format!("Stub article {}", i),
                summary: "A stub article.".to_string(),
                url: format!("https://stub.example.org/{}", i),
                published_at: Some(now - Duration::hours(i as i64)),
                author: "Stub Author".to_string(),
                tags: vec!["rust".to_string()],
                cover_image: None,
                read_time_minutes: Some(4),
                body_html: None,
                source: ArticleSource::Devto,
            })
            .collect())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DEVELOPER_EMAIL" => Some("dev@example.com".to_string()),
        "DEVELOPER_PHONE" => Some("08012345678".to_string()),
        "SITE_NAME" => Some("Test Portfolio".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn build_app(store: MemoryStore, mailer: RecordingMailer, articles: Option<usize>) -> TestApp {
    init_tracing();

    let config = test_config();
    let store = Arc::new(store);
    let mailer = Arc::new(mailer);
    let assistant = Assistant::new(config.assistant.clone()).expect("assistant client");
    let aggregator = Aggregator::new(vec![Arc::new(StubAdapter { count: articles }) as Arc<dyn ArticleAdapter>]);

    let state = AppState {
        config: Arc::new(config),
        store: store.clone(),
        mailer: mailer.clone(),
        aggregator: Arc::new(aggregator),
        assistant: Arc::new(assistant),
    };

    TestApp { state, store, mailer }
}

pub fn test_app() -> TestApp {
    build_app(MemoryStore::default(), RecordingMailer::default(), Some(30))
}
