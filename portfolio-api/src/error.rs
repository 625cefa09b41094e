use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use interfaces::{MailError, StoreError};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The message is what the client sees; details are logged where the
    /// error is created.
    #[error("{0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Map a store failure. Backend failures are logged and replaced by
    /// `public_msg`.
    pub fn store(err: StoreError, public_msg: &str) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => AppError::NotFound(format!("{} not found", capitalize(kind))),
            StoreError::Duplicate(_) => AppError::Conflict("Email is already subscribed".to_string()),
            StoreError::Backend(e) => {
                error!("{}: {:#}", public_msg, e);
                AppError::Internal(public_msg.to_string())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::InvalidRecipient(to) => AppError::Validation(format!("Invalid email address: {}", to)),
            MailError::Delivery(msg) => {
                error!("Mail delivery failed: {}", msg);
                AppError::Internal("Failed to send email".to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
