use async_trait::async_trait;
use uuid::Uuid;

use crate::defs::{
    ChatRole, Comment, CommentFilter, ContactMessage, ConversationTurn, NewComment,
    NewContactMessage, OutboundEmail, Subscriber,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Duplicate {0}")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound { kind, id: id.to_string() }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The relational store behind the site's forms and admin pages.
///
/// Every list operation returns newest records first unless stated otherwise.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn create_contact_message(&self, message: NewContactMessage) -> StoreResult<ContactMessage>;

    async fn list_contact_messages(&self, limit: Option<usize>) -> StoreResult<Vec<ContactMessage>>;

    async fn delete_contact_message(&self, id: Uuid) -> StoreResult<()>;

    /// Fails with [`StoreError::Duplicate`] when the address is already subscribed.
    async fn add_subscriber(&self, email: &str) -> StoreResult<Subscriber>;

    async fn find_subscriber(&self, email: &str) -> StoreResult<Option<Subscriber>>;

    async fn list_subscribers(&self) -> StoreResult<Vec<Subscriber>>;

    async fn set_subscriber_active(&self, id: Uuid, is_active: bool) -> StoreResult<Subscriber>;

    async fn delete_subscriber(&self, id: Uuid) -> StoreResult<()>;

    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment>;

    async fn list_comments(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>>;

    async fn approve_comment(&self, id: Uuid) -> StoreResult<Comment>;

    async fn delete_comment(&self, id: Uuid) -> StoreResult<()>;

    async fn append_turn(&self, session_id: &str, role: ChatRole, message: &str) -> StoreResult<ConversationTurn>;

    /// The most recent `limit` turns of a session, oldest first.
    async fn recent_turns(&self, session_id: &str, limit: usize) -> StoreResult<Vec<ConversationTurn>>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}
