use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use crate::api::models::{EmailQuery, SubscribeRequest, SubscribeResponse, SubscriptionStatus};
use crate::api::validation::{is_valid_email, present, ApiJson};
use crate::error::{AppError, Result};
use crate::AppState;

pub async fn subscribe(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>> {
    let email = present(&body.email)
        .map(str::trim)
        .ok_or_else(|| AppError::validation("Email is required"))?;

    if !is_valid_email(email) {
        return Err(AppError::validation("Please enter a valid email address"));
    }

    let subscriber = state
        .store
        .add_subscriber(email)
        .await
        .map_err(|e| AppError::store(e, "Subscription failed. Please try again later."))?;

    info!("New newsletter subscriber {}", subscriber.id);

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Successfully subscribed to newsletter".to_string(),
        subscriber,
    }))
}

pub async fn subscription_status(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<SubscriptionStatus>> {
    let email = present(&query.email)
        .map(str::trim)
        .ok_or_else(|| AppError::validation("Email parameter required"))?;

    let subscriber = state
        .store
        .find_subscriber(email)
        .await
        .map_err(|e| AppError::store(e, "Failed to check subscription"))?;

    Ok(Json(SubscriptionStatus {
        subscribed: subscriber.is_some(),
        email: email.to_string(),
    }))
}
