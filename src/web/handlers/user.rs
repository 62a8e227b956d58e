//! User handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::audit::AuditAction;
use crate::auth::{decide, decide_ban, hash_password, Action, Identity, ResourceKind};
use crate::board::{Comment, CommentRepository, Post, PostRepository};
use crate::db::{PublicUser, User, UserRepository, UserUpdate};
use crate::storage::{avatar_key, content_type_for};
use crate::web::dto::{LoginResponse, UpdateUserRequest, UserResponse, UserView, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

async fn load_user(state: &AppState, id: &str) -> Result<User, ApiError> {
    UserRepository::new(state.db.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))
}

fn view_for(identity: &Identity, user: &User) -> UserView {
    let private = decide(
        identity,
        Some(user.id.as_str()),
        ResourceKind::UserAccount,
        Action::ReadPrivate,
    );
    UserView::of(user, private.is_allowed())
}

/// GET /api/users - List every user.
///
/// Each entry is the full record where the requester may read it privately,
/// and the public projection otherwise.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let identity = state.identity(&claims).await?;
    let users = UserRepository::new(state.db.pool()).list_all().await?;

    Ok(Json(
        users.iter().map(|u| view_for(&identity, u)).collect(),
    ))
}

/// GET /api/user/:id - Get a user.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let identity = state.identity(&claims).await?;
    let user = load_user(&state, &user_id).await?;
    Ok(Json(view_for(&identity, &user)))
}

/// GET /api/user/public/:id - Public profile by ID.
pub async fn get_public_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    Ok(Json(user.to_public()))
}

/// GET /api/user/publicByUsername/:username - Public profile by username.
pub async fn get_public_user_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(user.to_public()))
}

/// GET /api/user/:id/posts - Posts written by a user.
pub async fn list_user_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = PostRepository::new(state.db.pool())
        .list_by_author(&user_id)
        .await?;
    Ok(Json(posts))
}

/// GET /api/user/:id/comments - Comments written by a user.
pub async fn list_user_comments(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = CommentRepository::new(state.db.pool())
        .list_by_author(&user_id)
        .await?;
    Ok(Json(comments))
}

/// PUT /api/user/:id - Update one's own account.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let identity = state.identity(&claims).await?;
    let target = load_user(&state, &user_id).await?;

    let decision = decide(
        &identity,
        Some(target.id.as_str()),
        ResourceKind::UserAccount,
        Action::Update,
    );
    if !decision.is_allowed() {
        return Err(ApiError::denied(decision));
    }

    let password = match req.password {
        Some(ref p) => Some(hash_password(p)?),
        None => None,
    };
    let update = UserUpdate {
        username: req.username.map(|s| s.trim().to_string()),
        email: req.email.map(|s| s.trim().to_string()),
        password,
        bio: req.bio,
        ..Default::default()
    };

    let user = UserRepository::new(state.db.pool())
        .update(&target.id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::UpdateUser, &user.id);

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/user/:id - Delete one's own account.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let identity = state.identity(&claims).await?;
    let target = load_user(&state, &user_id).await?;

    let decision = decide(
        &identity,
        Some(target.id.as_str()),
        ResourceKind::UserAccount,
        Action::Delete,
    );
    if !decision.is_allowed() {
        state.auditor.failure(
            Some(identity.id.as_str()),
            AuditAction::DeleteUser,
            &target.id,
            decision.message(),
        );
        return Err(ApiError::denied(decision));
    }

    UserRepository::new(state.db.pool())
        .delete(&target.id)
        .await?;
    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::DeleteUser, &target.id);

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/user/:id/avatar - Upload one's own avatar.
///
/// Expects a multipart field named `file`. Responds with a fresh login
/// response so clients can refresh their cached account.
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<LoginResponse>, ApiError> {
    let identity = state.identity(&claims).await?;

    let decision = decide(
        &identity,
        Some(user_id.as_str()),
        ResourceKind::UserProfile,
        Action::Update,
    );
    if !decision.is_allowed() {
        return Err(ApiError::denied(decision));
    }

    let store = state
        .avatar_store
        .clone()
        .ok_or_else(|| ApiError::internal("avatar storage is not configured"))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("file name is required"))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("missing 'file' field"))?;
    if data.is_empty() {
        return Err(ApiError::bad_request("uploaded file is empty"));
    }
    if data.len() > state.max_avatar_bytes {
        return Err(ApiError::payload_too_large(format!(
            "avatar must be at most {} bytes",
            state.max_avatar_bytes
        )));
    }

    let key = avatar_key(&identity.id, &filename)?;
    let url = store
        .put_avatar(&key, data, &content_type_for(&key))
        .await?;

    let user = UserRepository::new(state.db.pool())
        .update(&identity.id, &UserUpdate::new().avatar_url(url))
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::UploadAvatar, &key);

    Ok(Json(state.login_response(&user)?))
}

/// POST /api/user/:id/ban - Deactivate another account.
pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let identity = state.identity(&claims).await?;
    let target = load_user(&state, &user_id).await?;

    let decision = decide_ban(&identity, &Identity::new(target.id.as_str(), target.role));
    if !decision.is_allowed() {
        state.auditor.failure(
            Some(identity.id.as_str()),
            AuditAction::BanUser,
            &target.id,
            decision.message(),
        );
        return Err(ApiError::denied(decision));
    }

    let user = UserRepository::new(state.db.pool())
        .update(&target.id, &UserUpdate::new().is_active(false))
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    state
        .auditor
        .success(Some(identity.id.as_str()), AuditAction::BanUser, &user.id);

    Ok(Json(view_for(&identity, &user)))
}
