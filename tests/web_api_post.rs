//! Web API Post and Comment Tests
//!
//! Integration tests for posting, commenting, editing and moderation.

mod common;

use axum::http::StatusCode;
use common::{
    bearer, create_board, create_comment, create_post, create_test_app, register_and_login,
    user_with_role, TestApp, TestUser,
};
use forum_server::db::Role;
use serde_json::{json, Value};

async fn board_with_admin(app: &TestApp) -> (TestUser, String) {
    let admin = user_with_role(app, "admin", Role::Admin).await;
    let board = create_board(&app.server, &admin, "General").await;
    (admin, board)
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_read_post() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;

    let response = bearer(
        app.server.post(&format!("/api/board/{}/newPost", board)),
        &alice.token,
    )
    .json(&json!({ "title": "Hello world", "content": "My first post" }))
    .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();

    let response = app
        .server
        .get(&format!("/api/post/{}", created["id"].as_str().unwrap()))
        .await;
    response.assert_status_ok();
    let post: Value = response.json();
    assert_eq!(post["author_id"], alice.id.as_str());
    assert_eq!(post["board_id"], board.as_str());
    assert_eq!(post["title"], "Hello world");
    assert_eq!(post["content"], "My first post");
    assert!(post["update_date"].is_null());
}

#[tokio::test]
async fn test_create_post_requires_token() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;

    let response = app
        .server
        .post(&format!("/api/board/{}/newPost", board))
        .json(&json!({ "title": "Hello", "content": "Body" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_post_in_unknown_board() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;

    let response = bearer(app.server.post("/api/board/missing/newPost"), &alice.token)
        .json(&json!({ "title": "Hello", "content": "Body" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_post_blank_content() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;

    let response = bearer(
        app.server.post(&format!("/api/board/{}/newPost", board)),
        &alice.token,
    )
    .json(&json!({ "title": "Hello", "content": "   " }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_post_owner_only() {
    let app = create_test_app().await;
    let (admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let bob = register_and_login(&app.server, "bob").await;
    let post = create_post(&app.server, &alice, &board).await;

    for other in [&bob, &admin] {
        let response = bearer(app.server.put(&format!("/api/post/{}", post)), &other.token)
            .json(&json!({ "content": "edited by someone else" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    let response = bearer(app.server.put(&format!("/api/post/{}", post)), &alice.token)
        .json(&json!({ "content": "edited" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["content"], "edited");
    assert_eq!(body["title"], "Hello");
    assert!(body["update_date"].is_string());
}

#[tokio::test]
async fn test_update_unknown_post() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;

    let response = bearer(app.server.put("/api/post/missing"), &alice.token)
        .json(&json!({ "content": "edited" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderator_deletes_post_of_another_user() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;

    // A registers, logs in and posts.
    let a = register_and_login(&app.server, "user_a").await;
    let post = create_post(&app.server, &a, &board).await;

    // B is a plain user and may not delete it.
    let b = register_and_login(&app.server, "user_b").await;
    let response = bearer(app.server.delete(&format!("/api/post/{}", post)), &b.token).await;
    response.assert_status(StatusCode::FORBIDDEN);

    // C is a moderator and may.
    let c = user_with_role(&app, "user_c", Role::Moderator).await;
    let response = bearer(app.server.delete(&format!("/api/post/{}", post)), &c.token).await;
    response.assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/post/{}", post))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_and_admin_delete_posts() {
    let app = create_test_app().await;
    let (admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let first = create_post(&app.server, &alice, &board).await;
    let second = create_post(&app.server, &alice, &board).await;

    bearer(app.server.delete(&format!("/api/post/{}", first)), &alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    bearer(app.server.delete(&format!("/api/post/{}", second)), &admin.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    bearer(app.server.delete(&format!("/api/post/{}", second)), &admin.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_comment_thread() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let bob = register_and_login(&app.server, "bob").await;
    let post = create_post(&app.server, &alice, &board).await;

    let top = create_comment(&app.server, &bob, &post, None).await;
    let reply = create_comment(&app.server, &alice, &post, Some(&top)).await;

    let response = app.server.get(&format!("/api/comment/{}", reply)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["parent_id"], top.as_str());
    assert_eq!(body["author_id"], alice.id.as_str());

    let body: Value = app
        .server
        .get(&format!("/api/post/{}/comments", post))
        .await
        .json();
    let comments = body.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], top.as_str());
    assert!(comments[0]["parent_id"].is_null());

    let response = app
        .server
        .get(&format!("/api/post/{}/lastComment", post))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_empty_parent_id_means_top_level() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let post = create_post(&app.server, &alice, &board).await;

    let response = bearer(app.server.post("/api/post/addComment"), &alice.token)
        .json(&json!({ "post_id": post, "content": "hi", "parent_id": "" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["parent_id"].is_null());
}

#[tokio::test]
async fn test_comment_on_unknown_post() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;

    let response = bearer(app.server.post("/api/post/addComment"), &alice.token)
        .json(&json!({ "post_id": "missing", "content": "hi" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reply_to_comment_on_other_post() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let first = create_post(&app.server, &alice, &board).await;
    let second = create_post(&app.server, &alice, &board).await;
    let comment = create_comment(&app.server, &alice, &first, None).await;

    let response = bearer(app.server.post("/api/post/addComment"), &alice.token)
        .json(&json!({ "post_id": second, "content": "hi", "parent_id": comment }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_last_comment_none() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let post = create_post(&app.server, &alice, &board).await;

    let response = app
        .server
        .get(&format!("/api/post/{}/lastComment", post))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_comment_owner_only() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let moderator = user_with_role(&app, "mod", Role::Moderator).await;
    let post = create_post(&app.server, &alice, &board).await;
    let comment = create_comment(&app.server, &alice, &post, None).await;

    let response = bearer(
        app.server.put(&format!("/api/comment/{}", comment)),
        &moderator.token,
    )
    .json(&json!({ "content": "rewritten" }))
    .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = bearer(app.server.put(&format!("/api/comment/{}", comment)), &alice.token)
        .json(&json!({ "content": "rewritten" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["content"], "rewritten");
}

#[tokio::test]
async fn test_delete_comment_permissions() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let bob = register_and_login(&app.server, "bob").await;
    let moderator = user_with_role(&app, "mod", Role::Moderator).await;
    let post = create_post(&app.server, &alice, &board).await;
    let mine = create_comment(&app.server, &alice, &post, None).await;
    let other = create_comment(&app.server, &alice, &post, None).await;

    bearer(app.server.delete(&format!("/api/comment/{}", mine)), &bob.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    bearer(app.server.delete(&format!("/api/comment/{}", mine)), &alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    bearer(app.server.delete(&format!("/api/comment/{}", other)), &moderator.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body: Value = app
        .server
        .get(&format!("/api/post/{}/comments", post))
        .await
        .json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_post_removes_comments() {
    let app = create_test_app().await;
    let (_admin, board) = board_with_admin(&app).await;
    let alice = register_and_login(&app.server, "alice").await;
    let post = create_post(&app.server, &alice, &board).await;
    let comment = create_comment(&app.server, &alice, &post, None).await;

    bearer(app.server.delete(&format!("/api/post/{}", post)), &alice.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/comment/{}", comment))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .get(&format!("/api/post/{}/comments", post))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
