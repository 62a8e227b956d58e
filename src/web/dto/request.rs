//! Request DTOs for the Web API.
//!
//! None of the update requests carry an author or owner field, so ownership
//! can never be reassigned through the API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed, single_line_text, valid_username};

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "valid_username"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
}

/// Account update request. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "valid_username"))]
    pub username: Option<String>,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    #[validate(
        length(max = 1000, message = "bio must be at most 1000 characters"),
        custom(function = "no_control_chars")
    )]
    pub bio: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: Option<String>,
}

/// Board creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(
        length(max = 100, message = "name must be at most 100 characters"),
        custom(function = "single_line_text")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: String,
}

/// Board update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    #[validate(
        length(max = 100, message = "name must be at most 100 characters"),
        custom(function = "single_line_text")
    )]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Post creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(max = 200, message = "title must be at most 200 characters"),
        custom(function = "single_line_text")
    )]
    pub title: String,
    #[validate(
        length(max = 50000, message = "content must be at most 50000 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub content: String,
}

/// Post update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(
        length(max = 200, message = "title must be at most 200 characters"),
        custom(function = "single_line_text")
    )]
    pub title: Option<String>,
    #[validate(
        length(max = 50000, message = "content must be at most 50000 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub content: Option<String>,
}

/// Comment creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub post_id: String,
    #[validate(
        length(max = 10000, message = "content must be at most 10000 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub content: String,
    /// Comment being replied to. An empty string means none.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Comment update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(
        length(max = 10000, message = "content must be at most 10000 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            username: "alice_01".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            username: "a".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_update_user_request_optional_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let bad = UpdateUserRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_board_request_rejects_blank_name() {
        let req: CreateBoardRequest = serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateBoardRequest = serde_json::from_str(r#"{"name": "general"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_create_post_request() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "Hi", "content": "Body"}"#).unwrap();
        assert!(req.validate().is_ok());

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "Hi", "content": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_comment_request_parent_optional() {
        let req: CreateCommentRequest =
            serde_json::from_str(r#"{"post_id": "p1", "content": "nice"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.parent_id.is_none());
    }
}
