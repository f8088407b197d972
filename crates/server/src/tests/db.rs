//! Integration tests against a live Postgres.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use crate::database::connection::DbConnection;
use crate::error::{RequestError, ValidationError};
use crate::models::group::{CreateGroupRequest, GroupId};
use crate::models::listing::ListingMode;
use crate::models::membership::{GroupUserRequest, MembershipAction};
use crate::models::message::{
    DeleteMessageRequest, EditMessageRequest, ListMessagesRequest, MessageAction,
    SendMessageRequest,
};
use crate::models::user::{CreateUserRequest, UserId};
use crate::tests::{init_and_get_db, SERIAL_LOCK};

async fn user(db: &DbConnection, username: &str) -> UserId {
    db.create_user(&CreateUserRequest {
        username: username.to_string(),
        display_name: username.to_uppercase(),
    })
    .await
    .unwrap()
    .id
}

async fn group(db: &DbConnection, name: &str) -> GroupId {
    db.create_group(&CreateGroupRequest {
        name: name.to_string(),
        description: None,
    })
    .await
    .unwrap()
    .id
}

fn send(user_id: UserId, group_id: GroupId, content: &str) -> SendMessageRequest {
    SendMessageRequest {
        content: content.to_string(),
        user_id,
        group_id,
    }
}

fn first_page(group_id: GroupId) -> ListMessagesRequest {
    ListMessagesRequest {
        group_id,
        mode: ListingMode::Page { limit: 100, page: 1 },
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn schema_init_is_idempotent() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    db.init_schema().await.unwrap();
    let ada = user(&db, "ada").await;
    db.init_schema().await.unwrap();
    assert_eq!(db.get_user(ada).await.unwrap().username, "ada");
}

#[tokio::test]
#[ignore = "requires database"]
async fn users_and_groups_round_trip() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ada = user(&db, "ada").await;
    let fetched = db.get_user(ada).await.unwrap();
    assert_eq!(fetched.display_name, "ADA");

    let duplicate = db
        .create_user(&CreateUserRequest {
            username: "ada".to_string(),
            display_name: "Another Ada".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, RequestError::Sqlx(sqlx::Error::Database(ref e)) if e.is_unique_violation()));

    let group_id = db
        .create_group(&CreateGroupRequest {
            name: "Engines".to_string(),
            description: Some("analytical ones".to_string()),
        })
        .await
        .unwrap()
        .id;
    let fetched = db.get_group(group_id).await.unwrap();
    assert_eq!(fetched.description.as_deref(), Some("analytical ones"));

    assert!(matches!(
        db.get_user(9999).await.unwrap_err(),
        RequestError::NotFound(_)
    ));
    assert!(matches!(
        db.get_group(9999).await.unwrap_err(),
        RequestError::NotFound(_)
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn membership_is_tracked() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ada = user(&db, "ada").await;
    let charles = user(&db, "charles").await;
    let engines = group(&db, "Engines").await;

    let add_ada = GroupUserRequest {
        group_id: engines,
        user_id: ada,
    };
    db.add_group_user(&add_ada).await.unwrap();
    db.add_group_user(&GroupUserRequest {
        group_id: engines,
        user_id: charles,
    })
    .await
    .unwrap();

    let again = db.add_group_user(&add_ada).await.unwrap_err();
    assert!(matches!(
        again,
        RequestError::Validation(ValidationError::AlreadyExists)
    ));

    let missing = db
        .add_group_user(&GroupUserRequest {
            group_id: engines,
            user_id: 4242,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        missing,
        RequestError::Validation(ValidationError::MissingReference(_))
    ));
    let missing_group = db
        .add_group_user(&GroupUserRequest {
            group_id: 4242,
            user_id: ada,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        missing_group,
        RequestError::Validation(ValidationError::MissingReference(ref reason))
            if reason == "User or Group does not exist"
    ));

    let members = db.list_group_members(engines).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].username, "ada");

    db.remove_group_user(&add_ada).await.unwrap();
    let not_member = db.remove_group_user(&add_ada).await.unwrap_err();
    assert!(matches!(not_member, RequestError::NotFound(_)));

    let members = db.list_group_members(engines).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, charles);

    let history = db.list_group_user_history(engines).await.unwrap();
    let actions: Vec<_> = history.iter().map(|h| (h.user_id, h.action)).collect();
    assert_eq!(
        actions,
        vec![
            (ada, MembershipAction::Added),
            (charles, MembershipAction::Added),
            (ada, MembershipAction::Removed),
        ]
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn send_requires_existing_user_and_group() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ada = user(&db, "ada").await;
    let engines = group(&db, "Engines").await;

    let message = db.send_message(&send(ada, engines, "first note")).await.unwrap();
    assert_eq!(message.content, "first note");
    assert_eq!(message.user_id, ada);
    assert!(message.edited_at.is_none());

    for request in [send(777, engines, "ghost"), send(ada, 777, "nowhere")] {
        let err = db.send_message(&request).await.unwrap_err();
        assert!(matches!(
            err,
            RequestError::Validation(ValidationError::MissingReference(ref reason))
                if reason == "User or Group does not exist"
        ));
    }

    let listed = db.list_messages(&first_page(engines)).await.unwrap().messages;
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn edit_records_previous_content() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ada = user(&db, "ada").await;
    let charles = user(&db, "charles").await;
    let engines = group(&db, "Engines").await;
    let original = db.send_message(&send(ada, engines, "draft")).await.unwrap();

    let edited = db
        .edit_message(&EditMessageRequest {
            message_id: original.id,
            content: "final".to_string(),
            user_id: charles,
        })
        .await
        .unwrap();
    assert_eq!(edited.content, "final");
    assert!(edited.edited_at.is_some());
    assert_eq!(edited.created_at, original.created_at);

    let history = db.list_message_history(original.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "draft");
    assert_eq!(history[0].action, MessageAction::Edited);
    assert_eq!(history[0].action_by, charles);

    let missing = db
        .edit_message(&EditMessageRequest {
            message_id: original.id + 100,
            content: "nope".to_string(),
            user_id: ada,
        })
        .await
        .unwrap_err();
    assert!(matches!(missing, RequestError::NotFound(ref m) if m == "Message not found"));

    let unknown_actor = db
        .edit_message(&EditMessageRequest {
            message_id: original.id,
            content: "nope".to_string(),
            user_id: 31337,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        unknown_actor,
        RequestError::Validation(ValidationError::MissingReference(_))
    ));
    // rolled back, nothing recorded for the failed attempt
    assert_eq!(db.list_message_history(original.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_keeps_history() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ada = user(&db, "ada").await;
    let engines = group(&db, "Engines").await;
    let message = db.send_message(&send(ada, engines, "oops")).await.unwrap();

    let request = DeleteMessageRequest {
        message_id: message.id,
        user_id: ada,
    };
    db.delete_message(&request).await.unwrap();

    let again = db.delete_message(&request).await.unwrap_err();
    assert!(matches!(again, RequestError::NotFound(_)));

    let listed = db.list_messages(&first_page(engines)).await.unwrap().messages;
    assert!(listed.is_empty());

    let history = db.list_message_history(message.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, MessageAction::Deleted);
    assert_eq!(history[0].content, "oops");
}

#[tokio::test]
#[ignore = "requires database"]
async fn listing_pages_and_offsets() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ada = user(&db, "ada").await;
    let engines = group(&db, "Engines").await;
    let elsewhere = group(&db, "Elsewhere").await;

    let mut ids = Vec::new();
    for n in 0..5 {
        let message = db
            .send_message(&send(ada, engines, &format!("note {n}")))
            .await
            .unwrap();
        ids.push(message.id);
    }
    db.send_message(&send(ada, elsewhere, "unrelated"))
        .await
        .unwrap();

    let second_page = db
        .list_messages(&ListMessagesRequest {
            group_id: engines,
            mode: ListingMode::Page { limit: 2, page: 2 },
        })
        .await
        .unwrap()
        .messages;
    let contents: Vec<_> = second_page.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["note 2", "note 3"]);

    let after_second = db
        .list_messages(&ListMessagesRequest {
            group_id: engines,
            mode: ListingMode::Offset {
                offset: ids[1],
                limit: 10,
            },
        })
        .await
        .unwrap()
        .messages;
    assert_eq!(after_second.len(), 3);
    assert_eq!(after_second[0].id, ids[2]);

    let far_past_end = db
        .list_messages(&ListMessagesRequest {
            group_id: engines,
            mode: ListingMode::Page {
                limit: 200,
                page: 20_000_000,
            },
        })
        .await
        .unwrap()
        .messages;
    assert!(far_past_end.is_empty());

    let unknown = db.list_messages(&first_page(9999)).await.unwrap_err();
    assert!(matches!(unknown, RequestError::NotFound(_)));
}
