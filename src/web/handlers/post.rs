//! Post handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::audit::AuditAction;
use crate::auth::{decide, Action, ResourceKind};
use crate::board::{Comment, CommentRepository, LastActivity, NewPost, Post, PostRepository, PostUpdate};
use crate::web::dto::{CreatePostRequest, UpdatePostRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/post/:id - Get a post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = PostRepository::new(state.db.pool())
        .get_by_id(&post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))?;
    Ok(Json(post))
}

/// GET /api/post/:id/comments - Comments on a post, oldest first.
pub async fn list_post_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    if PostRepository::new(state.db.pool())
        .owner_of(&post_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("post not found"));
    }
    let comments = CommentRepository::new(state.db.pool())
        .list_by_post(&post_id)
        .await?;
    Ok(Json(comments))
}

/// GET /api/post/:id/lastComment - Latest comment summary of a post.
pub async fn last_post_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<LastActivity>, ApiError> {
    let last = PostRepository::new(state.db.pool())
        .last_comment(&post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("no comments on post"))?;
    Ok(Json(last))
}

/// POST /api/board/:id/newPost - Create a post in a board.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(board_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let identity = state.identity(&claims).await?;
    let decision = decide(&identity, None, ResourceKind::Post, Action::Create);
    if !decision.is_allowed() {
        return Err(ApiError::denied(decision));
    }

    let post = PostRepository::new(state.db.pool())
        .create(&NewPost::new(
            board_id,
            identity.id.as_str(),
            req.title.trim(),
            req.content,
        ))
        .await?;

    tracing::debug!("User {} created post {}", identity.id, post.id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/post/:id - Edit one's own post.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let identity = state.identity(&claims).await?;
    let repo = PostRepository::new(state.db.pool());
    let owner = repo
        .owner_of(&post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))?;

    let decision = decide(&identity, Some(owner.as_str()), ResourceKind::Post, Action::Update);
    if !decision.is_allowed() {
        return Err(ApiError::denied(decision));
    }

    let update = PostUpdate {
        title: req.title.map(|t| t.trim().to_string()),
        content: req.content,
    };
    let post = repo
        .update(&post_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))?;

    Ok(Json(post))
}

/// DELETE /api/post/:id - Delete a post and its comments.
///
/// Allowed for the author and for moderators and admins.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(post_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let identity = state.identity(&claims).await?;
    let repo = PostRepository::new(state.db.pool());
    let owner = repo
        .owner_of(&post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))?;

    let decision = decide(&identity, Some(owner.as_str()), ResourceKind::Post, Action::Delete);
    if !decision.is_allowed() {
        state.auditor.failure(
            Some(identity.id.as_str()),
            AuditAction::DeletePost,
            &post_id,
            decision.message(),
        );
        return Err(ApiError::denied(decision));
    }

    repo.delete(&post_id).await?;
    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::DeletePost, &post_id);

    Ok(StatusCode::NO_CONTENT)
}
