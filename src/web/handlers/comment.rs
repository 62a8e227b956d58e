//! Comment handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::audit::AuditAction;
use crate::auth::{decide, Action, ResourceKind};
use crate::board::{Comment, CommentRepository, NewComment};
use crate::web::dto::{CreateCommentRequest, UpdateCommentRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/comment/:id - Get a comment.
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    let comment = CommentRepository::new(state.db.pool())
        .get_by_id(&comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("comment not found"))?;
    Ok(Json(comment))
}

/// POST /api/post/addComment - Comment on a post.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let identity = state.identity(&claims).await?;
    let decision = decide(&identity, None, ResourceKind::Comment, Action::Create);
    if !decision.is_allowed() {
        return Err(ApiError::denied(decision));
    }

    let mut new_comment = NewComment::new(req.post_id, identity.id.as_str(), req.content);
    if let Some(parent_id) = req.parent_id.filter(|p| !p.trim().is_empty()) {
        new_comment = new_comment.reply_to(parent_id);
    }

    let comment = CommentRepository::new(state.db.pool())
        .create(&new_comment)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /api/comment/:id - Edit one's own comment.
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(comment_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let identity = state.identity(&claims).await?;
    let repo = CommentRepository::new(state.db.pool());
    let owner = repo
        .owner_of(&comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("comment not found"))?;

    let decision = decide(
        &identity,
        Some(owner.as_str()),
        ResourceKind::Comment,
        Action::Update,
    );
    if !decision.is_allowed() {
        return Err(ApiError::denied(decision));
    }

    let comment = repo
        .update_content(&comment_id, &req.content)
        .await?
        .ok_or_else(|| ApiError::not_found("comment not found"))?;

    Ok(Json(comment))
}

/// DELETE /api/comment/:id - Delete a comment.
///
/// Allowed for the author and for moderators and admins.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let identity = state.identity(&claims).await?;
    let repo = CommentRepository::new(state.db.pool());
    let owner = repo
        .owner_of(&comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("comment not found"))?;

    let decision = decide(
        &identity,
        Some(owner.as_str()),
        ResourceKind::Comment,
        Action::Delete,
    );
    if !decision.is_allowed() {
        state.auditor.failure(
            Some(identity.id.as_str()),
            AuditAction::DeleteComment,
            &comment_id,
            decision.message(),
        );
        return Err(ApiError::denied(decision));
    }

    repo.delete(&comment_id).await?;
    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::DeleteComment, &comment_id);

    Ok(StatusCode::NO_CONTENT)
}
