//! Shared helpers for the HTTP API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::{TestRequest, TestServer};
use forum_server::config::WebConfig;
use forum_server::db::{Role, UserRepository, UserUpdate};
use forum_server::web::middleware::JwtState;
use forum_server::web::router::create_router;
use forum_server::{AppState, Database, LocalAvatarStore};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";
pub const TEST_PASSWORD: &str = "password123";
pub const MAX_AVATAR_BYTES: usize = 64 * 1024;

/// A running API with its backing store.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub avatar_dir: TempDir,
}

/// A registered and logged-in account.
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        cors_origins: vec![],
        jwt_secret: TEST_SECRET.to_string(),
        jwt_issuer: "forum-test".to_string(),
        jwt_access_token_expiry_secs: 900,
    }
}

/// Create a test server with an in-memory database and a local avatar store.
pub async fn create_test_app() -> TestApp {
    let config = create_test_config();
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let avatar_dir = TempDir::new().expect("Failed to create avatar dir");
    let store = LocalAvatarStore::new(avatar_dir.path(), "/avatars")
        .expect("Failed to create avatar store");

    let app_state = Arc::new(
        AppState::new(db.clone(), &config).with_avatar_store(Arc::new(store), MAX_AVATAR_BYTES),
    );
    let jwt_state = Arc::new(JwtState::new(&config.jwt_secret, &config.jwt_issuer));

    let router = create_router(app_state, jwt_state, &config.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        avatar_dir,
    }
}

/// Attach a bearer token to a request.
pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(AUTHORIZATION, format!("Bearer {}", token))
}

/// Register an account and log it in.
pub async fn register_and_login(server: &TestServer, username: &str) -> TestUser {
    let email = format!("{}@example.com", username);
    server
        .post("/api/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": TEST_PASSWORD
        }))
        .await
        .assert_status_ok();

    let body: Value = server
        .post("/api/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await
        .json();

    TestUser {
        id: body["id"].as_str().unwrap().to_string(),
        username: username.to_string(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}

/// Change an account's role directly in the store.
pub async fn set_role(db: &Database, user_id: &str, role: Role) {
    UserRepository::new(db.pool())
        .update(user_id, &UserUpdate::new().role(role))
        .await
        .unwrap()
        .unwrap();
}

/// Register an account with the given role.
pub async fn user_with_role(app: &TestApp, username: &str, role: Role) -> TestUser {
    let user = register_and_login(&app.server, username).await;
    set_role(&app.db, &user.id, role).await;
    user
}

/// Create a board as `admin` and return its id.
pub async fn create_board(server: &TestServer, admin: &TestUser, name: &str) -> String {
    let response = bearer(server.post("/api/boards"), &admin.token)
        .json(&json!({ "name": name, "description": "A board" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

/// Create a post as `author` and return its id.
pub async fn create_post(server: &TestServer, author: &TestUser, board_id: &str) -> String {
    let response = bearer(
        server.post(&format!("/api/board/{}/newPost", board_id)),
        &author.token,
    )
    .json(&json!({ "title": "Hello", "content": "First post" }))
    .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

/// Create a comment as `author` and return its id.
pub async fn create_comment(
    server: &TestServer,
    author: &TestUser,
    post_id: &str,
    parent_id: Option<&str>,
) -> String {
    let mut body = json!({ "post_id": post_id, "content": "Nice post" });
    if let Some(parent) = parent_id {
        body["parent_id"] = json!(parent);
    }
    let response = bearer(server.post("/api/post/addComment"), &author.token)
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}
