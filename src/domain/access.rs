//! Access control policy.
//!
//! Every service asks [`decide`] whether an actor may perform an action on a
//! resource, and uses the visibility filters here to narrow list queries.
//! The function is pure: callers load whatever row they need first and
//! describe it as a [`Resource`].

use uuid::Uuid;

use super::user::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// The requester: either anonymous or an authenticated user with a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    Authenticated { id: Uuid, role: UserRole },
}

impl Actor {
    pub fn authenticated(id: Uuid, role: UserRole) -> Self {
        Actor::Authenticated { id, role }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { id, .. } => Some(*id),
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { role, .. } => Some(*role),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Some(UserRole::Admin))
    }

    /// Id of an authenticated actor, or `Unauthorized`.
    pub fn require_id(&self) -> AppResult<Uuid> {
        self.id().ok_or(AppError::Unauthorized)
    }

    /// Which posts this actor may see in list queries.
    pub fn post_visibility(&self) -> PostVisibility {
        match self {
            Actor::Anonymous => PostVisibility::PublishedOnly,
            Actor::Authenticated { role: UserRole::Admin, .. } => PostVisibility::All,
            Actor::Authenticated { id, role: UserRole::Author } => {
                PostVisibility::PublishedOrAuthoredBy(*id)
            }
            Actor::Authenticated { role: UserRole::Reader, .. } => PostVisibility::PublishedOnly,
        }
    }

    /// Which comments this actor may see in list queries.
    pub fn comment_visibility(&self) -> CommentVisibility {
        match self {
            Actor::Anonymous => CommentVisibility::ApprovedOnly,
            Actor::Authenticated { role: UserRole::Admin, .. } => CommentVisibility::All,
            Actor::Authenticated { id, .. } => CommentVisibility::ApprovedOrAuthoredBy(*id),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::authenticated(user.id, user.role)
    }
}

/// Row filter applied to post list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVisibility {
    PublishedOnly,
    PublishedOrAuthoredBy(Uuid),
    All,
}

/// Row filter applied to comment list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentVisibility {
    ApprovedOnly,
    ApprovedOrAuthoredBy(Uuid),
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    ListAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Post,
    Comment,
    Category,
    User,
    /// Moderation queues and platform statistics
    Moderation,
}

/// What the policy needs to know about the target of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    /// Author of a post/comment, or the user itself for user resources
    pub owner_id: Option<Uuid>,
    /// `published` for posts, `approved` for comments, `true` otherwise
    pub visible: bool,
}

impl Resource {
    pub fn post(author_id: Uuid, published: bool) -> Self {
        Self {
            kind: ResourceKind::Post,
            owner_id: Some(author_id),
            visible: published,
        }
    }

    pub fn comment(author_id: Uuid, approved: bool) -> Self {
        Self {
            kind: ResourceKind::Comment,
            owner_id: Some(author_id),
            visible: approved,
        }
    }

    pub fn user(id: Uuid) -> Self {
        Self {
            kind: ResourceKind::User,
            owner_id: Some(id),
            visible: true,
        }
    }

    /// A resource that does not exist yet, or has no owner.
    pub fn unowned(kind: ResourceKind) -> Self {
        Self {
            kind,
            owner_id: None,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No credentials were presented
    Unauthenticated,
    /// Authenticated, but the policy forbids the action
    Forbidden,
    /// The actor may not learn that the resource exists
    Hidden,
    /// Admins may not change their own role or delete themselves
    SelfModification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Map the decision onto the HTTP-facing error taxonomy.
    pub fn into_result(self, action: Action) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(AppError::Unauthorized),
            Decision::Deny(DenyReason::Forbidden) => Err(AppError::Forbidden),
            Decision::Deny(DenyReason::Hidden) => Err(AppError::NotFound),
            Decision::Deny(DenyReason::SelfModification) => Err(AppError::validation(
                if action == Action::Delete {
                    "Cannot delete your own account"
                } else {
                    "Cannot modify your own role"
                },
            )),
        }
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
pub fn decide(actor: &Actor, action: Action, resource: &Resource) -> Decision {
    let (actor_id, role) = match actor {
        Actor::Authenticated { id, role } => (Some(*id), Some(*role)),
        Actor::Anonymous => (None, None),
    };
    let is_owner = actor_id.is_some() && actor_id == resource.owner_id;

    // 1. Admins may do anything except alter or remove their own account.
    if role == Some(UserRole::Admin) {
        if resource.kind == ResourceKind::User
            && is_owner
            && matches!(action, Action::Update | Action::Delete)
        {
            return Decision::Deny(DenyReason::SelfModification);
        }
        return Decision::Allow;
    }

    let content = matches!(resource.kind, ResourceKind::Post | ResourceKind::Comment);

    // 2. Owners manage their own posts and comments.
    if content && is_owner && matches!(action, Action::Read | Action::Update | Action::Delete) {
        return Decision::Allow;
    }

    match (resource.kind, action) {
        // 3 & 4. Published posts and approved comments are public.
        (ResourceKind::Post | ResourceKind::Comment, Action::Read) => {
            if resource.visible {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::Hidden)
            }
        }
        // Modifying something the actor cannot even see must not reveal it.
        (ResourceKind::Post | ResourceKind::Comment, Action::Update | Action::Delete)
            if !resource.visible =>
        {
            Decision::Deny(DenyReason::Hidden)
        }
        // 5. Creation rights.
        (ResourceKind::Post, Action::Create) => match role {
            Some(r) if r.can_author() => Decision::Allow,
            _ => deny(actor),
        },
        (ResourceKind::Comment, Action::Create) if actor_id.is_some() => Decision::Allow,
        (ResourceKind::Category, Action::Read) => Decision::Allow,
        // 6. Administrative actions fall through to the default, since only
        //    admins (handled above) may perform them.
        // 7. Default deny.
        _ => deny(actor),
    }
}

fn deny(actor: &Actor) -> Decision {
    match actor {
        Actor::Anonymous => Decision::Deny(DenyReason::Unauthenticated),
        Actor::Authenticated { .. } => Decision::Deny(DenyReason::Forbidden),
    }
}

/// Evaluate the policy and convert a denial into an error.
pub fn authorize(actor: &Actor, action: Action, resource: &Resource) -> AppResult<()> {
    decide(actor, action, resource).into_result(action)
}
