use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role
///
/// Closed set of capabilities an actor can hold. `User`, `Moderator` and
/// `Admin` mirror membership of the Users/Moderators/Admins groups;
/// `Superuser` mirrors the superuser flag on the account. An actor holds a
/// *set* of these, resolved once per request; the policy engine never goes
/// back to the store mid-decision.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    User,
    Moderator,
    Admin,
    Superuser,
}

impl Role {
    /// Maps a stored group name onto a role. Unknown names are ignored by
    /// the caller.
    pub fn from_group(name: &str) -> Option<Role> {
        match name {
            "Users" => Some(Role::User),
            "Moderators" => Some(Role::Moderator),
            "Admins" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Actor
///
/// The resolved identity attempting an action: login id, authoring profile
/// id, and the full role set. Built by the `AuthUser` extractor (or by
/// `Repository::get_actor`) exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// users.id, the login identity.
    pub user_id: Uuid,
    /// profiles.id, the authoring identity content rows point at.
    pub profile_id: Uuid,
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Actor {
    pub fn has(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Superuser or Admins member: the actors that bypass ownership checks
    /// on most resources.
    pub fn is_elevated(&self) -> bool {
        self.has(Role::Superuser) || self.has(Role::Admin)
    }

    /// Member of any group at all (or superuser). Group-less accounts can
    /// read everything but write nothing.
    fn is_member(&self) -> bool {
        !self.roles.is_empty()
    }

    /// The single highest role, used as the `role` claim inside session
    /// tokens: superuser > admin > moderator > user. Accounts with no
    /// elevated membership report `user`.
    pub fn primary_role(&self) -> Role {
        if self.has(Role::Superuser) {
            Role::Superuser
        } else if self.has(Role::Admin) {
            Role::Admin
        } else if self.has(Role::Moderator) {
            Role::Moderator
        } else {
            Role::User
        }
    }
}

/// Action
///
/// The verb being authorized. `List` and `Retrieve` are the safe (read-only)
/// actions; everything else mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// Resource
///
/// The target of an authorization decision. Instance-level checks only ever
/// consult the owner field, so that is all a variant carries; `None` stands
/// for a class-level decision (create, list) where no instance exists yet.
///
/// Owner semantics per variant:
/// - `User`: the target users.id,
/// - `Profile`: the owning users.id,
/// - `Article` / `Comment` / `Like`: the owning profiles.id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User { id: Option<Uuid> },
    Profile { owner: Option<Uuid> },
    Article { author: Option<Uuid> },
    Comment { author: Option<Uuid> },
    Like { owner: Option<Uuid> },
}

/// authorize
///
/// The single decision function: may `actor` perform `action` on
/// `resource`? Pure and side-effect free; everything it needs rides in on
/// the arguments.
///
/// `None` is the unauthenticated actor: allowed the safe actions on public
/// resources (articles, comments, likes, profiles), denied everything else.
///
/// Like-uniqueness is deliberately not decided here. The duplicate check is
/// a single atomic insert in the store; running it as a policy pre-check as
/// well would reintroduce the check-then-act race.
pub fn authorize(actor: Option<&Actor>, action: Action, resource: &Resource) -> bool {
    match *resource {
        // Users are never public: even reads require an authenticated actor,
        // and only self or an elevated actor may see or remove an account.
        // Updates are strictly self-service.
        Resource::User { id } => {
            let Some(actor) = actor else { return false };
            let is_self = id.is_some_and(|id| id == actor.user_id);
            match action {
                Action::List => actor.is_elevated(),
                Action::Retrieve => is_self || actor.is_elevated(),
                Action::Create => false,
                Action::Update => is_self,
                Action::Delete => is_self || actor.is_elevated(),
            }
        }

        // Profiles are world-readable, owner-editable, and never deletable
        // directly (they fall with their account). Creation happens inside
        // registration, not through this surface.
        Resource::Profile { owner } => match action {
            Action::List | Action::Retrieve => true,
            Action::Update => actor
                .zip(owner)
                .is_some_and(|(a, owner)| a.user_id == owner),
            Action::Create | Action::Delete => false,
        },

        Resource::Article { author } => match action {
            Action::List | Action::Retrieve => true,
            Action::Create => actor.is_some_and(|a| {
                a.has(Role::Moderator) || a.has(Role::Admin) || a.has(Role::Superuser)
            }),
            // Update and delete share one rule. The first arm requires the
            // actor to be the author AND a Moderators member at the same
            // time; authorship alone is not enough.
            Action::Update | Action::Delete => actor.is_some_and(|a| {
                let is_author = author.is_some_and(|owner| owner == a.profile_id);
                (is_author && a.has(Role::Moderator)) || a.is_elevated()
            }),
        },

        Resource::Comment { author } => {
            let is_author =
                |a: &Actor| author.is_some_and(|owner| owner == a.profile_id);
            match action {
                Action::List | Action::Retrieve => true,
                Action::Create => actor.is_some_and(|a| a.is_member()),
                Action::Update => actor.is_some_and(|a| {
                    is_author(a) || a.has(Role::Moderator) || a.is_elevated()
                }),
                Action::Delete => actor.is_some_and(|a| is_author(a) || a.is_elevated()),
            }
        }

        Resource::Like { owner } => match action {
            Action::List | Action::Retrieve => true,
            Action::Create => actor.is_some_and(|a| a.is_member()),
            // Only the liking profile can take its like back; there is no
            // moderator override and no update at all.
            Action::Update => false,
            Action::Delete => actor
                .zip(owner)
                .is_some_and(|(a, owner)| a.profile_id == owner),
        },
    }
}
