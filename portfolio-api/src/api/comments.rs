use axum::extract::{Query, State};
use axum::Json;
use interfaces::{CommentFilter, NewComment};
use tracing::info;

use crate::api::models::{CommentList, CommentQuery, CommentRequest, CommentSubmitted};
use crate::api::validation::{is_valid_email, present, ApiJson};
use crate::error::{AppError, Result};
use crate::AppState;

pub const MIN_COMMENT_CHARS: usize = 10;
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Approved comments only, newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<CommentList>> {
    let filter = CommentFilter {
        post_id: present(&query.post_id).map(str::to_string),
        approved_only: true,
    };

    let comments = state
        .store
        .list_comments(&filter)
        .await
        .map_err(|e| AppError::store(e, "Failed to fetch comments"))?;

    Ok(Json(CommentList {
        total: comments.len(),
        comments,
    }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CommentRequest>,
) -> Result<Json<CommentSubmitted>> {
    let (Some(post_id), Some(author), Some(email), Some(content)) = (
        present(&body.post_id),
        present(&body.author),
        present(&body.email),
        present(&body.content),
    ) else {
        return Err(AppError::validation("Missing required fields"));
    };

    let content = content.trim();
    let length = content.chars().count();
    if length < MIN_COMMENT_CHARS {
        return Err(AppError::validation("Comment must be at least 10 characters long"));
    }
    if length > MAX_COMMENT_CHARS {
        return Err(AppError::validation("Comment must be less than 1000 characters"));
    }

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email format"));
    }

    let comment = state
        .store
        .create_comment(NewComment {
            post_id: post_id.trim().to_string(),
            author: author.trim().to_string(),
            email,
            content: content.to_string(),
        })
        .await
        .map_err(|e| AppError::store(e, "Failed to create comment"))?;

    info!("Comment {} on {} awaiting approval", comment.id, comment.post_id);

    Ok(Json(CommentSubmitted {
        message: "Comment submitted successfully and awaiting approval".to_string(),
        comment: comment.into(),
    }))
}
