//! Authentication handlers and the shared application state.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::audit::{AuditAction, Auditor};
use crate::auth::{hash_password, verify_password, Identity};
use crate::config::WebConfig;
use crate::db::{NewUser, User, UserRepository};
use crate::storage::AvatarStore;
use crate::web::dto::{LoginRequest, LoginResponse, RegisterRequest, RoleResponse, UserResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims};
use crate::{Database, ForumError};

/// Application state shared across handlers.
///
/// Immutable once built; the connection pool inside `db` is the only shared
/// mutable resource.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Issuer written into every token.
    pub jwt_issuer: String,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Where uploaded avatars go. Uploads fail with 500 when unset.
    pub avatar_store: Option<Arc<dyn AvatarStore>>,
    /// Maximum avatar upload size in bytes.
    pub max_avatar_bytes: usize,
    /// Audit trail.
    pub auditor: Auditor,
}

impl AppState {
    /// Create a new application state from the web configuration.
    pub fn new(db: Database, web: &WebConfig) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(web.jwt_secret.as_bytes()),
            jwt_issuer: web.jwt_issuer.clone(),
            access_token_expiry: web.jwt_access_token_expiry_secs,
            avatar_store: None,
            max_avatar_bytes: 10 * 1024 * 1024,
            auditor: Auditor::new(),
        }
    }

    /// Attach an avatar store with the given upload limit in bytes.
    pub fn with_avatar_store(mut self, store: Arc<dyn AvatarStore>, max_bytes: usize) -> Self {
        self.avatar_store = Some(store);
        self.max_avatar_bytes = max_bytes;
        self
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            iss: self.jwt_issuer.clone(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("failed to generate token")
        })
    }

    /// Build the login response for a user, with a freshly issued token.
    pub fn login_response(&self, user: &User) -> Result<LoginResponse, ApiError> {
        Ok(LoginResponse {
            id: user.id.clone(),
            username: user.username.clone(),
            token: self.generate_access_token(user)?,
            user: UserResponse::from(user),
        })
    }

    /// Resolve the requester behind verified claims.
    ///
    /// The role is read from the store on every request, so role changes
    /// and bans take effect without reissuing tokens. A vanished account is
    /// 401, a banned one 403, a store failure 500.
    pub async fn identity(&self, claims: &JwtClaims) -> Result<Identity, ApiError> {
        let user = UserRepository::new(self.db.pool())
            .get_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("account no longer exists"))?;

        if !user.is_active {
            return Err(ApiError::forbidden("account is disabled"));
        }

        Ok(Identity::new(user.id, user.role))
    }
}

/// POST /api/login - Log in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = req.email.trim();
    let user = UserRepository::new(state.db.pool())
        .get_by_email(email)
        .await?;

    let user = match user {
        Some(user) if verify_password(&req.password, &user.password).is_ok() => user,
        _ => {
            state
                .auditor
                .failure(None, AuditAction::Login, email, "invalid credentials");
            return Err(ApiError::unauthorized("invalid email or password"));
        }
    };

    if !user.is_active {
        state
            .auditor
            .failure(Some(user.id.as_str()), AuditAction::Login, &user.id, "account disabled");
        return Err(ApiError::forbidden("account is disabled"));
    }

    let response = state.login_response(&user)?;
    state
        .auditor
        .success(Some(user.id.as_str()), AuditAction::Login, &user.id);

    Ok(Json(response))
}

/// POST /api/register - Create a new account.
///
/// Responds 200 with an empty body.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    let password_hash = hash_password(&req.password)?;

    let result = UserRepository::new(state.db.pool())
        .create(&NewUser::new(req.username.trim(), req.email.trim(), password_hash))
        .await;

    match result {
        Ok(user) => {
            state
                .auditor
                .success(Some(user.id.as_str()), AuditAction::Register, &user.id);
            Ok(StatusCode::OK)
        }
        Err(ForumError::Conflict(_)) => {
            state
                .auditor
                .failure(None, AuditAction::Register, &req.username, "duplicate");
            Err(ApiError::conflict("username or email already taken"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/checkRole - Role of the requester.
pub async fn check_role(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<RoleResponse>, ApiError> {
    let identity = state.identity(&claims).await?;
    Ok(Json(RoleResponse {
        role: identity.role,
    }))
}
