mod common;

use common::{init_tracing, setup_test_database, unique};
use interfaces::{ChatRole, CommentFilter, NewComment, NewContactMessage, SiteStore, StoreError};
use tracing::info;
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_schema_setup_is_idempotent() -> anyhow::Result<()> {
    init_tracing();

    let db = setup_test_database().await?;
    db.setup_schema().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_contact_messages_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let db = setup_test_database().await?;

    let name = unique("visitor");
    let created = db
        .create_contact_message(NewContactMessage {
            name: name.clone(),
            email: "visitor@example.org".to_string(),
            message: "I would like to talk about a project.".to_string(),
        })
        .await?;
    info!("Created contact message {}", created.id);

    let newest = db.list_contact_messages(Some(1)).await?;
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].id, created.id);

    db.delete_contact_message(created.id).await?;
    let again = db.delete_contact_message(created.id).await;
    assert!(matches!(again, Err(StoreError::NotFound { .. })));
    Ok(())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_duplicate_subscriber_is_rejected() -> anyhow::Result<()> {
    init_tracing();
    let db = setup_test_database().await?;

    let email = format!("{}@example.org", unique("reader"));
    let subscriber = db.add_subscriber(&email).await?;
    assert!(subscriber.is_active);

    let duplicate = db.add_subscriber(&email).await;
    assert!(matches!(duplicate, Err(StoreError::Duplicate(ref e)) if e == &email));

    let found = db.find_subscriber(&email).await?;
    assert_eq!(found.map(|s| s.id), Some(subscriber.id));

    let deactivated = db.set_subscriber_active(subscriber.id, false).await?;
    assert!(!deactivated.is_active);

    db.delete_subscriber(subscriber.id).await?;
    assert!(db.find_subscriber(&email).await?.is_none());

    let missing = db.set_subscriber_active(Uuid::new_v4(), true).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    Ok(())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_comment_moderation_flow() -> anyhow::Result<()> {
    init_tracing();
    let db = setup_test_database().await?;

    let post_id = unique("post");
    let comment = db
        .create_comment(NewComment {
            post_id: post_id.clone(),
            author: "Reader".to_string(),
            email: "reader@example.org".to_string(),
            content: "Great write-up, thanks!".to_string(),
        })
        .await?;
    assert!(!comment.approved);

    let public = CommentFilter {
        post_id: Some(post_id.clone()),
        approved_only: true,
    };
    assert!(db.list_comments(&public).await?.is_empty());

    let approved = db.approve_comment(comment.id).await?;
    assert!(approved.approved);

    let visible = db.list_comments(&public).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].content, "Great write-up, thanks!");

    db.delete_comment(comment.id).await?;
    assert!(db.list_comments(&public).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at TEST_DATABASE_URL"]
async fn test_recent_turns_are_oldest_first() -> anyhow::Result<()> {
    init_tracing();
    let db = setup_test_database().await?;

    let session = unique("session");
    for i in 0..5 {
        let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
        db.append_turn(&session, role, &format!("turn {}", i)).await?;
    }

    let recent = db.recent_turns(&session, 3).await?;
    let messages: Vec<&str> = recent.iter().map(|t| t.message.as_str()).collect();
    assert_eq!(messages, vec!["turn 2", "turn 3", "turn 4"]);
    assert_eq!(recent[0].role, ChatRole::User);
    assert_eq!(recent[1].role, ChatRole::Assistant);

    assert!(db.recent_turns(&unique("empty"), 10).await?.is_empty());
    Ok(())
}
