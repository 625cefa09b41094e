use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{admin, assistant, blogs, comments, contact, newsletter};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/aggregated-articles", get(blogs::aggregated_articles))
        .route("/api/blogs", get(blogs::aggregated_articles))
        .route("/api/contact", get(contact::list_contacts).post(contact::create_contact))
        .route(
            "/api/subscribe",
            get(newsletter::subscription_status).post(newsletter::subscribe),
        )
        .route("/api/comments", get(comments::list_comments).post(comments::create_comment))
        .route("/api/assistant", get(assistant::status).post(assistant::chat))
        .route("/api/assistant/history", get(assistant::history))
        .route(
            "/api/admin/comments",
            get(admin::list_all_comments).patch(admin::moderate_comment),
        )
        .route(
            "/api/admin/contact-messages",
            get(admin::list_contact_messages)
                .delete(admin::delete_record)
                .patch(admin::update_subscriber),
        )
        .route("/api/admin/reply-message", axum::routing::post(admin::reply_message))
        .route("/api/admin/send-newsletter", axum::routing::post(admin::send_newsletter))
        .layer(cors)
        .with_state(app_state)
}
