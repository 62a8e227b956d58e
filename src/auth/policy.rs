//! Authorization policy.
//!
//! A pure decision function consulted by every ownership-sensitive handler.
//! Rules check named roles explicitly; roles are never ranked.

use crate::db::Role;

/// The authenticated requester, rebuilt for every request from verified
/// claims plus the role currently stored for that user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User ID (token subject).
    pub id: String,
    /// Role as stored at request time.
    pub role: Role,
}

impl Identity {
    /// Create a new identity.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Whether this identity owns a resource with the given owner.
    pub fn owns(&self, owner_id: Option<&str>) -> bool {
        owner_id == Some(self.id.as_str())
    }

    fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    fn is_moderator_or_admin(&self) -> bool {
        matches!(self.role, Role::Moderator | Role::Admin)
    }
}

/// Kind of resource an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Board,
    Post,
    Comment,
    UserProfile,
    UserAccount,
}

/// Operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read the public projection.
    ReadPublic,
    /// Read private fields (email, active flag).
    ReadPrivate,
    Create,
    Update,
    Delete,
    /// Deactivate another account.
    Ban,
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    PublicRead,
    Authenticated,
    Owner,
    Admin,
    Moderator,
    AdminOnly,
    NotOwner,
    NotModerator,
    SelfBan,
    /// Target is an admin, or a moderator banned by a moderator.
    ProtectedTarget,
    Unsupported,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allow: bool,
    pub reason: Reason,
}

impl Decision {
    fn allow(reason: Reason) -> Self {
        Self {
            allow: true,
            reason,
        }
    }

    fn deny(reason: Reason) -> Self {
        Self {
            allow: false,
            reason,
        }
    }

    /// Whether the operation is permitted.
    pub fn is_allowed(&self) -> bool {
        self.allow
    }

    /// Short human-readable message for a denial.
    pub fn message(&self) -> &'static str {
        match self.reason {
            Reason::AdminOnly => "admin access required",
            Reason::NotOwner => "you do not own this resource",
            Reason::NotModerator => "moderator access required",
            Reason::SelfBan => "you cannot ban yourself",
            Reason::ProtectedTarget => "you cannot ban a user with this role",
            Reason::Unsupported => "operation not permitted",
            _ => "permitted",
        }
    }
}

/// Decide whether `requester` may perform `action` on a resource of `kind`
/// owned by `owner_id`.
///
/// Boards have no owner; pass `None`. For user resources the owner is the
/// target user's own ID. The first matching rule wins and anything not
/// covered is denied.
pub fn decide(
    requester: &Identity,
    owner_id: Option<&str>,
    kind: ResourceKind,
    action: Action,
) -> Decision {
    use Action::*;
    use ResourceKind::*;

    let is_owner = requester.owns(owner_id);

    match (action, kind) {
        (ReadPublic, _) => Decision::allow(Reason::PublicRead),

        (Create, Board) | (Update, Board) | (Delete, Board) => {
            if requester.is_admin() {
                Decision::allow(Reason::Admin)
            } else {
                Decision::deny(Reason::AdminOnly)
            }
        }
        (Create, Post) | (Create, Comment) => Decision::allow(Reason::Authenticated),

        (Update, Post) | (Update, Comment) | (Update, UserProfile) | (Update, UserAccount) => {
            if is_owner {
                Decision::allow(Reason::Owner)
            } else {
                Decision::deny(Reason::NotOwner)
            }
        }

        (Delete, Post) | (Delete, Comment) => {
            if is_owner {
                Decision::allow(Reason::Owner)
            } else if requester.is_admin() {
                Decision::allow(Reason::Admin)
            } else if requester.role == Role::Moderator {
                Decision::allow(Reason::Moderator)
            } else {
                Decision::deny(Reason::NotOwner)
            }
        }
        (Delete, UserProfile) | (Delete, UserAccount) => {
            if is_owner {
                Decision::allow(Reason::Owner)
            } else {
                Decision::deny(Reason::NotOwner)
            }
        }

        (ReadPrivate, UserProfile) | (ReadPrivate, UserAccount) => {
            if is_owner {
                Decision::allow(Reason::Owner)
            } else if requester.is_admin() {
                Decision::allow(Reason::Admin)
            } else {
                Decision::deny(Reason::NotOwner)
            }
        }

        (Ban, UserAccount) => {
            if is_owner {
                Decision::deny(Reason::SelfBan)
            } else if requester.is_moderator_or_admin() {
                Decision::allow(if requester.is_admin() {
                    Reason::Admin
                } else {
                    Reason::Moderator
                })
            } else {
                Decision::deny(Reason::NotModerator)
            }
        }

        _ => Decision::deny(Reason::Unsupported),
    }
}

/// Decide whether `requester` may ban `target`.
///
/// Applies the role-agnostic [`Action::Ban`] rule first, then protects
/// staff: admins cannot be banned at all and a moderator cannot ban
/// another moderator.
pub fn decide_ban(requester: &Identity, target: &Identity) -> Decision {
    let decision = decide(
        requester,
        Some(target.id.as_str()),
        ResourceKind::UserAccount,
        Action::Ban,
    );
    if !decision.is_allowed() {
        return decision;
    }

    match (requester.role, target.role) {
        (_, Role::Admin) | (Role::Moderator, Role::Moderator) => {
            Decision::deny(Reason::ProtectedTarget)
        }
        _ => decision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];
    const ALL_KINDS: [ResourceKind; 5] = [
        ResourceKind::Board,
        ResourceKind::Post,
        ResourceKind::Comment,
        ResourceKind::UserProfile,
        ResourceKind::UserAccount,
    ];

    fn who(role: Role) -> Identity {
        Identity::new("requester", role)
    }

    #[test]
    fn test_public_read_always_allowed() {
        for role in ALL_ROLES {
            for kind in ALL_KINDS {
                let d = decide(&who(role), Some("someone-else"), kind, Action::ReadPublic);
                assert!(d.is_allowed());
                assert_eq!(d.reason, Reason::PublicRead);
            }
        }
    }

    #[test]
    fn test_owner_allowed_regardless_of_role() {
        let owned = [
            (ResourceKind::Post, Action::Update),
            (ResourceKind::Post, Action::Delete),
            (ResourceKind::Comment, Action::Update),
            (ResourceKind::Comment, Action::Delete),
            (ResourceKind::UserProfile, Action::Update),
            (ResourceKind::UserProfile, Action::Delete),
            (ResourceKind::UserProfile, Action::ReadPrivate),
            (ResourceKind::UserAccount, Action::Update),
            (ResourceKind::UserAccount, Action::Delete),
            (ResourceKind::UserAccount, Action::ReadPrivate),
        ];
        for role in ALL_ROLES {
            for (kind, action) in owned {
                let d = decide(&who(role), Some("requester"), kind, action);
                assert!(d.is_allowed(), "{role:?} {kind:?} {action:?}");
                assert_eq!(d.reason, Reason::Owner);
            }
        }
    }

    #[test]
    fn test_board_mutation_admin_only() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            for role in [Role::User, Role::Moderator] {
                let d = decide(&who(role), None, ResourceKind::Board, action);
                assert!(!d.is_allowed(), "{role:?} {action:?}");
                assert_eq!(d.reason, Reason::AdminOnly);
            }
            let d = decide(&who(Role::Admin), None, ResourceKind::Board, action);
            assert!(d.is_allowed());
        }
    }

    #[test]
    fn test_create_post_and_comment_any_authenticated() {
        for role in ALL_ROLES {
            for kind in [ResourceKind::Post, ResourceKind::Comment] {
                assert!(decide(&who(role), None, kind, Action::Create).is_allowed());
            }
        }
    }

    #[test]
    fn test_moderator_and_admin_delete_others_content() {
        for role in [Role::Moderator, Role::Admin] {
            for kind in [ResourceKind::Post, ResourceKind::Comment] {
                let d = decide(&who(role), Some("author"), kind, Action::Delete);
                assert!(d.is_allowed(), "{role:?} {kind:?}");
            }
        }
    }

    #[test]
    fn test_user_cannot_delete_others_content() {
        for kind in [ResourceKind::Post, ResourceKind::Comment] {
            let d = decide(&who(Role::User), Some("author"), kind, Action::Delete);
            assert!(!d.is_allowed());
            assert_eq!(d.reason, Reason::NotOwner);
        }
    }

    #[test]
    fn test_update_has_no_role_override() {
        for role in ALL_ROLES {
            for kind in [
                ResourceKind::Post,
                ResourceKind::Comment,
                ResourceKind::UserProfile,
                ResourceKind::UserAccount,
            ] {
                let d = decide(&who(role), Some("author"), kind, Action::Update);
                assert!(!d.is_allowed(), "{role:?} {kind:?}");
            }
        }
    }

    #[test]
    fn test_account_delete_has_no_admin_override() {
        let d = decide(
            &who(Role::Admin),
            Some("other"),
            ResourceKind::UserAccount,
            Action::Delete,
        );
        assert!(!d.is_allowed());
    }

    #[test]
    fn test_read_private_owner_or_admin() {
        let admin = decide(
            &who(Role::Admin),
            Some("other"),
            ResourceKind::UserAccount,
            Action::ReadPrivate,
        );
        assert!(admin.is_allowed());
        assert_eq!(admin.reason, Reason::Admin);

        let moderator = decide(
            &who(Role::Moderator),
            Some("other"),
            ResourceKind::UserAccount,
            Action::ReadPrivate,
        );
        assert!(!moderator.is_allowed());
    }

    #[test]
    fn test_ban_rules() {
        let target = Some("other");
        assert!(!decide(&who(Role::User), target, ResourceKind::UserAccount, Action::Ban).is_allowed());
        assert!(
            decide(&who(Role::Moderator), target, ResourceKind::UserAccount, Action::Ban)
                .is_allowed()
        );
        assert!(decide(&who(Role::Admin), target, ResourceKind::UserAccount, Action::Ban).is_allowed());

        let self_ban = decide(
            &who(Role::Admin),
            Some("requester"),
            ResourceKind::UserAccount,
            Action::Ban,
        );
        assert!(!self_ban.is_allowed());
        assert_eq!(self_ban.reason, Reason::SelfBan);
    }

    #[test]
    fn test_ban_respects_target_role() {
        let cases = [
            (Role::Moderator, Role::User, true),
            (Role::Moderator, Role::Moderator, false),
            (Role::Moderator, Role::Admin, false),
            (Role::Admin, Role::User, true),
            (Role::Admin, Role::Moderator, true),
            (Role::Admin, Role::Admin, false),
            (Role::User, Role::User, false),
        ];
        for (requester, target, allowed) in cases {
            let d = decide_ban(&who(requester), &Identity::new("target", target));
            assert_eq!(d.is_allowed(), allowed, "{requester:?} bans {target:?}");
        }

        let d = decide_ban(&who(Role::Moderator), &Identity::new("target", Role::Admin));
        assert_eq!(d.reason, Reason::ProtectedTarget);
        assert_eq!(d.message(), "you cannot ban a user with this role");

        let d = decide_ban(&who(Role::User), &Identity::new("target", Role::Admin));
        assert_eq!(d.reason, Reason::NotModerator);

        let d = decide_ban(&who(Role::Admin), &who(Role::Admin));
        assert_eq!(d.reason, Reason::SelfBan);
    }

    #[test]
    fn test_unsupported_combinations_denied() {
        for role in ALL_ROLES {
            assert!(!decide(&who(role), None, ResourceKind::Post, Action::Ban).is_allowed());
            assert!(!decide(&who(role), None, ResourceKind::Board, Action::ReadPrivate).is_allowed());
            let d = decide(&who(role), None, ResourceKind::UserAccount, Action::Create);
            assert!(!d.is_allowed());
            assert_eq!(d.reason, Reason::Unsupported);
        }
    }

    #[test]
    fn test_missing_owner_is_never_owner() {
        let d = decide(&who(Role::User), None, ResourceKind::Post, Action::Update);
        assert!(!d.is_allowed());
    }

    #[test]
    fn test_denial_messages() {
        let d = decide(&who(Role::User), None, ResourceKind::Board, Action::Create);
        assert_eq!(d.message(), "admin access required");
    }
}
