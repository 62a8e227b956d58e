//! Authentication and authorization.
//!
//! Password hashing lives in [`password`]; the ownership and role rules that
//! gate every mutating request live in [`policy`].

mod password;
pub mod policy;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use policy::{decide, decide_ban, Action, Decision, Identity, Reason, ResourceKind};
