//! Request body validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::web::error::ApiError;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// A JSON extractor that validates the request body.
///
/// Bodies that fail to decode and bodies that fail validation are both
/// rejected with 400; validation failures carry per-field messages.
///
/// ```ignore
/// async fn create_board(
///     ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
/// ) -> Result<Json<Board>, ApiError> {
///     // req is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e.body_text())))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Validate that a string does not contain control characters or NULL bytes.
///
/// Newlines, carriage returns and tabs are allowed.
pub fn no_control_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(ValidationError::new("no_control_chars")
            .with_message("must not contain control characters".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty_trimmed").with_message("must not be empty".into()));
    }
    Ok(())
}

/// Non-blank text without any control characters, newlines included.
pub fn single_line_text(value: &str) -> Result<(), ValidationError> {
    not_empty_trimmed(value)?;
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new("single_line_text")
            .with_message("must be a single line without control characters".into()));
    }
    Ok(())
}

/// Validate a username: 3-32 characters of ASCII letters, digits, `_`, `-`
/// or `.`.
pub fn valid_username(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::new("username_length").with_message(
            format!("username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters")
                .into(),
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ValidationError::new("username_chars").with_message(
            "username may only contain letters, digits, '_', '-' and '.'".into(),
        ));
    }
    Ok(())
}
