use chrono::{DateTime, Utc};
use interfaces::{ChatRole, Comment, ContactMessage, Subscriber};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request bodies keep every field optional so that a missing field is
// reported by our own validation instead of a deserialization error.

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub contact: ContactMessage,
}

#[derive(Debug, Serialize)]
pub struct ContactList {
    pub messages: Vec<ContactMessage>,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    pub subscriber: Subscriber,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStatus {
    pub subscribed: bool,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
    pub post_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub post_id: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub comments: Vec<Comment>,
    pub total: usize,
}

/// A stored comment echoed back to its author, without the content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReceipt {
    pub id: Uuid,
    pub post_id: String,
    pub author: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub approved: bool,
}

impl From<Comment> for CommentReceipt {
    fn from(c: Comment) -> Self {
        CommentReceipt {
            id: c.id,
            post_id: c.post_id,
            author: c.author,
            email: c.email,
            created_at: c.created_at,
            approved: c.approved,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentSubmitted {
    pub message: String,
    pub comment: CommentReceipt,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantStatus {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct History {
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct AdminCommentList {
    pub comments: Vec<Comment>,
    pub total: usize,
    pub pending: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub comment_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub message: String,
    pub comment: Option<Comment>,
}

#[derive(Debug, Serialize)]
pub struct InboxOverview {
    pub messages: Vec<ContactMessage>,
    pub subscribers: Vec<Subscriber>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordRequest {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscriberUpdated {
    pub success: bool,
    pub subscriber: Subscriber,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub original_message: Option<String>,
    pub sender_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplyDetails {
    pub to: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReplySent {
    pub success: bool,
    pub message: String,
    pub details: ReplyDetails,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsletterRequest {
    pub subject: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterReport {
    pub success: bool,
    pub total_subscribers: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}
