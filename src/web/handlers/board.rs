//! Board handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::audit::AuditAction;
use crate::auth::{decide, Action, Identity, ResourceKind};
use crate::board::{Board, BoardRepository, BoardUpdate, LastActivity, NewBoard, Post, PostRepository};
use crate::web::dto::{CreateBoardRequest, UpdateBoardRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

fn require_admin(identity: &Identity, action: Action) -> Result<(), ApiError> {
    let decision = decide(identity, None, ResourceKind::Board, action);
    if decision.is_allowed() {
        Ok(())
    } else {
        Err(ApiError::denied(decision))
    }
}

/// GET /api/boards - List all boards.
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = BoardRepository::new(state.db.pool()).list_all().await?;
    Ok(Json(boards))
}

/// GET /api/board/:id - Get a board.
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<String>,
) -> Result<Json<Board>, ApiError> {
    let board = BoardRepository::new(state.db.pool())
        .get_by_id(&board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("board not found"))?;
    Ok(Json(board))
}

/// GET /api/board/:id/posts - Posts in a board, newest first.
pub async fn list_board_posts(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    if !BoardRepository::new(state.db.pool()).exists(&board_id).await? {
        return Err(ApiError::not_found("board not found"));
    }
    let posts = PostRepository::new(state.db.pool())
        .list_by_board(&board_id)
        .await?;
    Ok(Json(posts))
}

/// GET /api/board/:id/lastPost - Latest post summary of a board.
pub async fn last_board_post(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<String>,
) -> Result<Json<LastActivity>, ApiError> {
    let last = BoardRepository::new(state.db.pool())
        .last_post(&board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("no posts in board"))?;
    Ok(Json(last))
}

/// POST /api/boards - Create a board (admin only).
pub async fn create_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let identity = state.identity(&claims).await?;
    require_admin(&identity, Action::Create)?;

    let board = BoardRepository::new(state.db.pool())
        .create(&NewBoard::new(req.name.trim()).with_description(req.description))
        .await?;

    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::CreateBoard, &board.id);

    Ok((StatusCode::CREATED, Json(board)))
}

/// PUT /api/board/:id - Update a board (admin only).
pub async fn update_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(board_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBoardRequest>,
) -> Result<Json<Board>, ApiError> {
    let identity = state.identity(&claims).await?;
    require_admin(&identity, Action::Update)?;

    let update = BoardUpdate {
        name: req.name.map(|n| n.trim().to_string()),
        description: req.description,
    };
    let board = BoardRepository::new(state.db.pool())
        .update(&board_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("board not found"))?;

    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::UpdateBoard, &board.id);

    Ok(Json(board))
}

/// DELETE /api/board/:id - Delete a board and everything in it (admin only).
pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(board_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let identity = state.identity(&claims).await?;
    require_admin(&identity, Action::Delete)?;

    if !BoardRepository::new(state.db.pool())
        .delete(&board_id)
        .await?
    {
        return Err(ApiError::not_found("board not found"));
    }

    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::DeleteBoard, &board_id);

    Ok(StatusCode::NO_CONTENT)
}
