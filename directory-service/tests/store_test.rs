//! Direct store contract tests against an in-memory database.

mod common;

use common::TestApp;
use directory_service::models::{NewUser, Role, SortColumn, SortDirection, User, UserQuery};
use directory_service::services::ServiceError;
use directory_service::utils::{hash_password, verify_password, Password, PasswordHashString};

fn new_user(username: &str, secret: &str, role: Role) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: hash_password(&Password::new(secret.to_string()))
            .unwrap()
            .into_string(),
        role,
        name: Some(format!("{} display", username)),
        description: None,
    }
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = TestApp::spawn().await;
    let input = new_user("alice", "secret-1", Role::Admin);

    let created = app.state.db.insert_user(&input).await.unwrap();
    assert!(created.id > 0);

    let fetched = app
        .state
        .db
        .find_user_by_id(created.id)
        .await
        .unwrap()
        .expect("created user must be readable by id");

    // Equal to the input except the identifier is now set and the stored
    // value is a digest, not the raw secret.
    assert_eq!(fetched.username, input.username);
    assert_eq!(fetched.role, input.role);
    assert_eq!(fetched.name, input.name);
    assert_eq!(fetched.description, input.description);
    assert_ne!(fetched.password_hash, "secret-1");
    assert!(verify_password(
        &Password::new("secret-1".to_string()),
        &PasswordHashString::new(fetched.password_hash.clone())
    )
    .is_ok());
}

#[tokio::test]
async fn test_find_absent_is_none_not_error() {
    let app = TestApp::spawn().await;

    assert!(app.state.db.find_user_by_id(999).await.unwrap().is_none());
    assert!(app
        .state
        .db
        .find_user_by_username("nobody")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_username_lookup_is_case_sensitive() {
    let app = TestApp::spawn().await;
    app.state
        .db
        .insert_user(&new_user("Alice", "pw", Role::User))
        .await
        .unwrap();

    assert!(app
        .state
        .db
        .find_user_by_username("Alice")
        .await
        .unwrap()
        .is_some());
    assert!(app
        .state
        .db
        .find_user_by_username("alice")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_insert_duplicate_username_fails() {
    let app = TestApp::spawn().await;
    app.state
        .db
        .insert_user(&new_user("alice", "pw", Role::User))
        .await
        .unwrap();

    let result = app
        .state
        .db
        .insert_user(&new_user("alice", "other", Role::Viewer))
        .await;
    assert!(matches!(result, Err(ServiceError::DuplicateUsername)));
}

#[tokio::test]
async fn test_update_absent_id_is_not_found() {
    let app = TestApp::spawn().await;
    let ghost = User {
        id: 999,
        username: "ghost".to_string(),
        password_hash: "$argon2id$whatever".to_string(),
        role: Role::User,
        name: None,
        description: None,
        created_utc: chrono::Utc::now(),
    };

    assert!(matches!(
        app.state.db.update_user(&ghost).await,
        Err(ServiceError::NotFound)
    ));
}

#[tokio::test]
async fn test_update_rejects_empty_digest() {
    let app = TestApp::spawn().await;
    let mut user = app
        .state
        .db
        .insert_user(&new_user("alice", "pw", Role::User))
        .await
        .unwrap();

    user.password_hash = String::new();
    assert!(matches!(
        app.state.db.update_user(&user).await,
        Err(ServiceError::Validation(_))
    ));

    // The stored digest is untouched.
    let stored = app
        .state
        .db
        .find_user_by_id(user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.password_hash.is_empty());
}

#[tokio::test]
async fn test_delete_absent_id_is_not_found() {
    let app = TestApp::spawn().await;

    assert!(matches!(
        app.state.db.delete_user(999).await,
        Err(ServiceError::NotFound)
    ));
    // Still a clean miss afterwards.
    assert!(app.state.db.find_user_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_count_is_independent_of_page() {
    let app = TestApp::spawn().await;
    for i in 0..7 {
        app.state
            .db
            .insert_user(&new_user(&format!("user{}", i), "pw", Role::User))
            .await
            .unwrap();
    }

    let query = UserQuery::from_parts(3, 2, None, None, None);
    let page = app.state.db.search_users(&query).await.unwrap();

    assert_eq!(page.total_count, 7);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.total_pages(), 4);
}

#[tokio::test]
async fn test_search_orders_by_whitelisted_column() {
    let app = TestApp::spawn().await;
    app.state
        .db
        .insert_user(&new_user("charlie", "pw", Role::User))
        .await
        .unwrap();
    app.state
        .db
        .insert_user(&new_user("alice", "pw", Role::User))
        .await
        .unwrap();
    app.state
        .db
        .insert_user(&new_user("bob", "pw", Role::User))
        .await
        .unwrap();

    let query = UserQuery {
        page: 1,
        page_size: 10,
        search: None,
        sort: SortColumn::Username,
        direction: SortDirection::Descending,
    };
    let page = app.state.db.search_users(&query).await.unwrap();
    let usernames: Vec<&str> = page.data.iter().map(|u| u.username.as_str()).collect();

    assert_eq!(usernames, vec!["charlie", "bob", "alice"]);
}
