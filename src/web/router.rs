//! Router configuration for the forum API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{AvatarBackend, AvatarConfig};

use super::handlers::{
    ban_user, check_role, create_board, create_comment, create_post, delete_board,
    delete_comment, delete_post, delete_user, get_board, get_comment, get_post,
    get_public_user, get_public_user_by_username, get_user, last_board_post, last_post_comment,
    list_board_posts, list_boards, list_post_comments, list_user_comments, list_user_posts,
    list_users, login, register, update_board, update_comment, update_post, update_user,
    upload_avatar, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Slack on top of the avatar limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let avatar_limit = app_state.max_avatar_bytes + MULTIPART_OVERHEAD;

    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/checkRole", get(check_role));

    let user_routes = Router::new()
        .route("/users", get(list_users))
        .route(
            "/user/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/user/:id/posts", get(list_user_posts))
        .route("/user/:id/comments", get(list_user_comments))
        .route("/user/:id/ban", post(ban_user))
        .route(
            "/user/:id/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(avatar_limit)),
        )
        .route("/user/public/:id", get(get_public_user))
        .route(
            "/user/publicByUsername/:username",
            get(get_public_user_by_username),
        );

    let board_routes = Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/board/:id",
            get(get_board).put(update_board).delete(delete_board),
        )
        .route("/board/:id/posts", get(list_board_posts))
        .route("/board/:id/lastPost", get(last_board_post))
        .route("/board/:id/newPost", post(create_post));

    let post_routes = Router::new()
        .route("/post/addComment", post(create_comment))
        .route(
            "/post/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/post/:id/comments", get(list_post_comments))
        .route("/post/:id/lastComment", get(last_post_comment))
        .route(
            "/comment/:id",
            get(get_comment).put(update_comment).delete(delete_comment),
        );

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(board_routes)
        .merge(post_routes);

    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Serve locally stored avatars under their public path.
///
/// Returns `None` for the S3 backend or when the public base URL is not a
/// path on this server.
pub fn create_avatar_router(config: &AvatarConfig) -> Option<Router> {
    if config.backend != AvatarBackend::Local {
        return None;
    }
    let mount = config.public_base_url.trim_end_matches('/');
    if !mount.starts_with('/') || mount.len() < 2 {
        return None;
    }
    Some(Router::new().nest_service(mount, ServeDir::new(&config.local_path)))
}

/// Assemble the full application: API, health check and avatar files.
pub fn create_app(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
    avatars: &AvatarConfig,
) -> Router {
    let mut router =
        create_router(app_state, jwt_state, cors_origins).merge(create_health_router());

    if let Some(avatar_router) = create_avatar_router(avatars) {
        router = router.merge(avatar_router);
    }

    router.layer(CompressionLayer::new())
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
