use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interfaces::{
    ChatRole, Comment, CommentFilter, ContactMessage, ConversationTurn, NewComment, NewContactMessage,
    SiteStore, StoreError, StoreResult, Subscriber,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactMessage {
    fn from(r: ContactRow) -> Self {
        ContactMessage {
            id: r.id,
            name: r.name,
            email: r.email,
            message: r.message,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SubscriberRow {
    id: Uuid,
    email: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<SubscriberRow> for Subscriber {
    fn from(r: SubscriberRow) -> Self {
        Subscriber {
            id: r.id,
            email: r.email,
            is_active: r.is_active,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: String,
    author: String,
    email: String,
    content: String,
    created_at: DateTime<Utc>,
    approved: bool,
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        Comment {
            id: r.id,
            post_id: r.post_id,
            author: r.author,
            email: r.email,
            content: r.content,
            created_at: r.created_at,
            approved: r.approved,
        }
    }
}

#[derive(Debug, FromRow)]
struct TurnRow {
    id: Uuid,
    session_id: String,
    role: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<TurnRow> for ConversationTurn {
    fn from(r: TurnRow) -> Self {
        ConversationTurn {
            id: r.id,
            session_id: r.session_id,
            role: ChatRole::parse(&r.role),
            message: r.message,
            created_at: r.created_at,
        }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.into())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

const CONTACT_COLUMNS: &str = "id, name, email, message, created_at";
const SUBSCRIBER_COLUMNS: &str = "id, email, is_active, created_at";
const COMMENT_COLUMNS: &str = "id, post_id, author, email, content, created_at, approved";
const TURN_COLUMNS: &str = "id, session_id, role, message, created_at";

/// PostgreSQL-backed [`SiteStore`].
#[derive(Clone)]
pub struct SiteDatabase {
    pool: PgPool,
}

impl SiteDatabase {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        info!("Connected to site database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Idempotent: every statement is `IF NOT EXISTS`.
    pub async fn setup_schema(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS newsletter_subscribers (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id UUID PRIMARY KEY,
                post_id TEXT NOT NULL,
                author TEXT NOT NULL,
                email TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                approved BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
            "CREATE INDEX IF NOT EXISTS comments_post_id_idx ON comments (post_id)",
            r#"
            CREATE TABLE IF NOT EXISTS conversation_turns (
                seq BIGSERIAL PRIMARY KEY,
                id UUID NOT NULL UNIQUE,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            "#,
            "CREATE INDEX IF NOT EXISTS conversation_turns_session_idx ON conversation_turns (session_id, seq)",
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Site schema ready");
        Ok(())
    }

    async fn delete_by_id(&self, table: &str, kind: &'static str, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(kind, id));
        }
        debug!("Deleted {} {}", kind, id);
        Ok(())
    }
}

#[async_trait]
impl SiteStore for SiteDatabase {
    async fn create_contact_message(&self, message: NewContactMessage) -> StoreResult<ContactMessage> {
        let row: ContactRow = sqlx::query_as(&format!(
            "INSERT INTO contact_messages (id, name, email, message, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.into())
    }

    async fn list_contact_messages(&self, limit: Option<usize>) -> StoreResult<Vec<ContactMessage>> {
        // LIMIT NULL is no limit
        let rows: Vec<ContactRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contact_messages ORDER BY created_at DESC LIMIT $1",
            CONTACT_COLUMNS
        ))
        .bind(limit.map(|l| l as i64))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_contact_message(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("contact_messages", "contact message", id).await
    }

    async fn add_subscriber(&self, email: &str) -> StoreResult<Subscriber> {
        let result = sqlx::query_as::<_, SubscriberRow>(&format!(
            "INSERT INTO newsletter_subscribers (id, email, is_active, created_at)
             VALUES ($1, $2, TRUE, $3)
             RETURNING {}",
            SUBSCRIBER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate(email.to_string())),
            Err(e) => Err(backend(e)),
        }
    }

    async fn find_subscriber(&self, email: &str) -> StoreResult<Option<Subscriber>> {
        let row: Option<SubscriberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM newsletter_subscribers WHERE email = $1",
            SUBSCRIBER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(Into::into))
    }

    async fn list_subscribers(&self) -> StoreResult<Vec<Subscriber>> {
        let rows: Vec<SubscriberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM newsletter_subscribers ORDER BY created_at DESC",
            SUBSCRIBER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_subscriber_active(&self, id: Uuid, is_active: bool) -> StoreResult<Subscriber> {
        let row: Option<SubscriberRow> = sqlx::query_as(&format!(
            "UPDATE newsletter_subscribers SET is_active = $2 WHERE id = $1 RETURNING {}",
            SUBSCRIBER_COLUMNS
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Into::into)
            .ok_or_else(|| StoreError::not_found("subscriber", id))
    }

    async fn delete_subscriber(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("newsletter_subscribers", "subscriber", id).await
    }

    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let row: CommentRow = sqlx::query_as(&format!(
            "INSERT INTO comments (id, post_id, author, email, content, created_at, approved)
             VALUES ($1, $2, $3, $4, $5, $6, FALSE)
             RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&comment.post_id)
        .bind(&comment.author)
        .bind(&comment.email)
        .bind(&comment.content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.into())
    }

    async fn list_comments(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM comments
             WHERE ($1::TEXT IS NULL OR post_id = $1)
               AND (NOT $2 OR approved)
             ORDER BY created_at DESC",
            COMMENT_COLUMNS
        ))
        .bind(filter.post_id.as_deref())
        .bind(filter.approved_only)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn approve_comment(&self, id: Uuid) -> StoreResult<Comment> {
        let row: Option<CommentRow> = sqlx::query_as(&format!(
            "UPDATE comments SET approved = TRUE WHERE id = $1 RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Into::into).ok_or_else(|| StoreError::not_found("comment", id))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<()> {
        self.delete_by_id("comments", "comment", id).await
    }

    async fn append_turn(&self, session_id: &str, role: ChatRole, message: &str) -> StoreResult<ConversationTurn> {
        let row: TurnRow = sqlx::query_as(&format!(
            "INSERT INTO conversation_turns (id, session_id, role, message, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TURN_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(role.as_str())
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.into())
    }

    async fn recent_turns(&self, session_id: &str, limit: usize) -> StoreResult<Vec<ConversationTurn>> {
        let rows: Vec<TurnRow> = sqlx::query_as(&format!(
            "SELECT {cols} FROM (
                 SELECT seq, {cols} FROM conversation_turns
                 WHERE session_id = $1
                 ORDER BY seq DESC
                 LIMIT $2
             ) recent
             ORDER BY seq ASC",
            cols = TURN_COLUMNS
        ))
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
