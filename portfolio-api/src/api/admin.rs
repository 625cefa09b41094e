//! Moderation and outreach endpoints. Access control happens in front of
//! the service; these handlers assume an authenticated site owner.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use futures::future::join_all;
use interfaces::CommentFilter;
use site_store::{compose_newsletter, compose_reply, ReplyDraft};
use tracing::{info, warn};

use crate::api::models::{
    AdminCommentList, InboxOverview, ModerationRequest, ModerationResponse, NewsletterReport, NewsletterRequest,
    RecordRequest, ReplyDetails, ReplyRequest, ReplySent, SubscriberUpdated, Success,
};
use crate::api::validation::{is_valid_email, parse_id, present, ApiJson};
use crate::error::{AppError, Result};
use crate::AppState;

pub async fn list_all_comments(State(state): State<AppState>) -> Result<Json<AdminCommentList>> {
    let comments = state
        .store
        .list_comments(&CommentFilter::default())
        .await
        .map_err(|e| AppError::store(e, "Failed to fetch comments"))?;

    let pending = comments.iter().filter(|c| !c.approved).count();
    Ok(Json(AdminCommentList {
        total: comments.len(),
        pending,
        comments,
    }))
}

pub async fn moderate_comment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ModerationRequest>,
) -> Result<Json<ModerationResponse>> {
    let (Some(comment_id), Some(action)) = (present(&body.comment_id), present(&body.action)) else {
        return Err(AppError::validation("Missing required fields"));
    };
    let id = parse_id(comment_id)?;

    match action {
        "approve" => {
            let comment = state
                .store
                .approve_comment(id)
                .await
                .map_err(|e| AppError::store(e, "Failed to update comment"))?;
            info!("Approved comment {}", id);
            Ok(Json(ModerationResponse {
                message: "Comment approved successfully".to_string(),
                comment: Some(comment),
            }))
        }
        "reject" => {
            state
                .store
                .delete_comment(id)
                .await
                .map_err(|e| AppError::store(e, "Failed to update comment"))?;
            info!("Rejected comment {}", id);
            Ok(Json(ModerationResponse {
                message: "Comment rejected successfully".to_string(),
                comment: None,
            }))
        }
        _ => Err(AppError::validation("Invalid action")),
    }
}

pub async fn list_contact_messages(State(state): State<AppState>) -> Result<Json<InboxOverview>> {
    let (messages, subscribers) =
        tokio::join!(state.store.list_contact_messages(None), state.store.list_subscribers());

    let messages = messages.map_err(|e| AppError::store(e, "Failed to fetch data"))?;
    let subscribers = subscribers.map_err(|e| AppError::store(e, "Failed to fetch data"))?;

    Ok(Json(InboxOverview { messages, subscribers }))
}

pub async fn delete_record(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecordRequest>,
) -> Result<Json<Success>> {
    let id = present(&body.id).ok_or_else(|| AppError::validation("ID is required"))?;
    let id = parse_id(id)?;

    let result = match body.kind.as_deref() {
        Some("message") => state.store.delete_contact_message(id).await,
        Some("subscriber") => state.store.delete_subscriber(id).await,
        _ => return Err(AppError::validation("Type must be 'message' or 'subscriber'")),
    };
    result.map_err(|e| AppError::store(e, "Failed to delete record"))?;

    info!("Deleted {} {}", body.kind.as_deref().unwrap_or_default(), id);
    Ok(Json(Success { success: true }))
}

pub async fn update_subscriber(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RecordRequest>,
) -> Result<Json<SubscriberUpdated>> {
    let id = present(&body.id).ok_or_else(|| AppError::validation("ID is required"))?;
    let id = parse_id(id)?;

    if body.kind.as_deref() != Some("subscriber") {
        return Err(AppError::validation(
            "PATCH operation only supported for newsletter subscribers",
        ));
    }

    let is_active = match body.action.as_deref() {
        Some("activate") => true,
        Some("deactivate") => false,
        _ => return Err(AppError::validation("Action must be 'activate' or 'deactivate'")),
    };

    let subscriber = state
        .store
        .set_subscriber_active(id, is_active)
        .await
        .map_err(|e| AppError::store(e, "Failed to update subscriber"))?;

    Ok(Json(SubscriberUpdated {
        success: true,
        subscriber,
    }))
}

pub async fn reply_message(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReplyRequest>,
) -> Result<Json<ReplySent>> {
    let (Some(to), Some(subject), Some(message)) =
        (present(&body.to), present(&body.subject), present(&body.message))
    else {
        return Err(AppError::validation("Missing required fields"));
    };

    let to = to.trim();
    if !is_valid_email(to) {
        return Err(AppError::validation("Invalid email address"));
    }

    let draft = ReplyDraft {
        to: to.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
        original_message: body.original_message.clone(),
        sender_name: body.sender_name.clone(),
    };
    let email = compose_reply(&draft, &state.config.reply_signature());
    state.mailer.send(&email).await?;

    info!("Reply sent to {}", to);
    Ok(Json(ReplySent {
        success: true,
        message: "Reply sent successfully".to_string(),
        details: ReplyDetails {
            to: to.to_string(),
            subject: subject.to_string(),
            timestamp: Utc::now(),
        },
    }))
}

/// Every active subscriber gets a copy; one failed delivery does not stop
/// the others.
pub async fn send_newsletter(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewsletterRequest>,
) -> Result<Json<NewsletterReport>> {
    let (Some(subject), Some(content)) = (present(&body.subject), present(&body.content)) else {
        return Err(AppError::validation("Subject and content are required"));
    };

    let subscribers: Vec<_> = state
        .store
        .list_subscribers()
        .await
        .map_err(|e| AppError::store(e, "Failed to send newsletter"))?
        .into_iter()
        .filter(|s| s.is_active)
        .collect();

    if subscribers.is_empty() {
        return Err(AppError::validation("No subscribers found"));
    }

    let emails: Vec<_> = subscribers
        .iter()
        .map(|s| compose_newsletter(&s.email, subject, content))
        .collect();
    let results = join_all(emails.iter().map(|email| state.mailer.send(email))).await;

    let mut failure_count = 0;
    for (email, result) in emails.iter().zip(&results) {
        if let Err(e) = result {
            warn!("Failed to send newsletter to {}: {}", email.to, e);
            failure_count += 1;
        }
    }
    let success_count = results.len() - failure_count;

    let mut message = format!("Newsletter sent to {} subscribers", success_count);
    if failure_count > 0 {
        message.push_str(&format!(" ({} failed)", failure_count));
    }
    info!("{}", message);

    Ok(Json(NewsletterReport {
        success: true,
        total_subscribers: subscribers.len(),
        success_count,
        failure_count,
        message,
    }))
}
