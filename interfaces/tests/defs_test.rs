use chrono::Utc;
use interfaces::{ChatRole, Comment, StoreError, Subscriber};
use uuid::Uuid;

#[test]
fn test_records_serialize_camel_case() {
    let subscriber = Subscriber {
        id: Uuid::new_v4(),
        email: "reader@example.com".to_string(),
        is_active: true,
        created_at: Utc::now(),
    };
    let json = serde_json::to_value(&subscriber).unwrap();
    assert_eq!(json["isActive"], true);
    assert!(json.get("createdAt").is_some());

    let comment = Comment {
        id: Uuid::new_v4(),
        post_id: "devto-1".to_string(),
        author: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        content: "Thanks for writing this up.".to_string(),
        created_at: Utc::now(),
        approved: false,
    };
    let json = serde_json::to_value(&comment).unwrap();
    assert_eq!(json["postId"], "devto-1");
    assert_eq!(json["approved"], false);
}

#[test]
fn test_chat_role_round_trip() {
    assert_eq!(ChatRole::parse("user"), ChatRole::User);
    assert_eq!(ChatRole::parse("assistant"), ChatRole::Assistant);
    assert_eq!(ChatRole::parse("system"), ChatRole::Assistant);
    assert_eq!(ChatRole::User.as_str(), "user");
    assert_eq!(serde_json::to_value(ChatRole::Assistant).unwrap(), "assistant");
}

#[test]
fn test_store_error_messages() {
    let err = StoreError::not_found("comment", "abc");
    assert_eq!(err.to_string(), "comment not found: abc");

    let err = StoreError::Duplicate("subscriber reader@example.com".to_string());
    assert_eq!(err.to_string(), "Duplicate subscriber reader@example.com");
}
