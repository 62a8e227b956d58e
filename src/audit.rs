//! Audit trail.
//!
//! Security-relevant events (logins, registrations, account changes,
//! moderation) are emitted as structured tracing events under the `audit`
//! target, so they can be filtered or routed separately, e.g.
//! `RUST_LOG=info,audit=info`.

use std::fmt;

use tracing::{info, warn};

/// Audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ServerStart,
    Login,
    Register,
    UpdateUser,
    DeleteUser,
    UploadAvatar,
    BanUser,
    CreateBoard,
    UpdateBoard,
    DeleteBoard,
    DeletePost,
    DeleteComment,
}

impl AuditAction {
    /// Stable name used in the log record.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ServerStart => "server_start",
            AuditAction::Login => "login",
            AuditAction::Register => "register",
            AuditAction::UpdateUser => "update_user",
            AuditAction::DeleteUser => "delete_user",
            AuditAction::UploadAvatar => "upload_avatar",
            AuditAction::BanUser => "ban_user",
            AuditAction::CreateBoard => "create_board",
            AuditAction::UpdateBoard => "update_board",
            AuditAction::DeleteBoard => "delete_board",
            AuditAction::DeletePost => "delete_post",
            AuditAction::DeleteComment => "delete_comment",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emits audit records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Auditor;

impl Auditor {
    pub fn new() -> Self {
        Self
    }

    /// Record a successful operation.
    ///
    /// `actor` is the requester's user ID, if known; `subject` is the ID of
    /// the affected resource.
    pub fn success(&self, actor: Option<&str>, action: AuditAction, subject: &str) {
        info!(
            target: "audit",
            actor = actor.unwrap_or("-"),
            action = action.as_str(),
            subject,
            outcome = "success",
            "{} succeeded",
            action
        );
    }

    /// Record a rejected or failed operation.
    pub fn failure(&self, actor: Option<&str>, action: AuditAction, subject: &str, reason: &str) {
        warn!(
            target: "audit",
            actor = actor.unwrap_or("-"),
            action = action.as_str(),
            subject,
            outcome = "failure",
            reason,
            "{} rejected",
            action
        );
    }
}
