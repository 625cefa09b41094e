use axum::extract::State;
use axum::Json;
use interfaces::NewContactMessage;
use tracing::info;

use crate::api::models::{ContactList, ContactRequest, ContactResponse};
use crate::api::validation::{is_valid_email, present, ApiJson};
use crate::error::{AppError, Result};
use crate::AppState;

const LIST_LIMIT: usize = 50;

pub async fn create_contact(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactRequest>,
) -> Result<Json<ContactResponse>> {
    let (Some(name), Some(email), Some(message)) =
        (present(&body.name), present(&body.email), present(&body.message))
    else {
        return Err(AppError::validation("All fields are required"));
    };

    if !is_valid_email(email) {
        return Err(AppError::validation("Please enter a valid email address"));
    }
    if message.chars().count() < 10 {
        return Err(AppError::validation("Message must be at least 10 characters long"));
    }
    if name.chars().count() < 2 {
        return Err(AppError::validation("Name must be at least 2 characters long"));
    }

    let contact = state
        .store
        .create_contact_message(NewContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
        .await
        .map_err(|e| AppError::store(e, "Failed to send message. Please try again later."))?;

    info!("New contact message {} from {}", contact.id, contact.email);

    Ok(Json(ContactResponse {
        success: true,
        message: "Message sent successfully!".to_string(),
        contact,
    }))
}

pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<ContactList>> {
    let messages = state
        .store
        .list_contact_messages(Some(LIST_LIMIT))
        .await
        .map_err(|e| AppError::store(e, "Failed to fetch messages"))?;

    Ok(Json(ContactList {
        total: messages.len(),
        messages,
    }))
}
