//! Authenticated caller identity.
//!
//! A [`Principal`] is produced by a successful login and carried in the
//! session cookie. Services receive it explicitly instead of reading ambient
//! session state.

use serde::{Deserialize, Serialize};

use crate::domain::{Role, User, UserId};

/// Logged-in user id and role.
///
/// # Examples
/// ```
/// use lms_backend::domain::{Principal, Role, UserId};
///
/// let manager = Principal::new(UserId::new(1), Role::Manager);
/// assert!(manager.may_access(UserId::new(42)));
///
/// let customer = Principal::new(UserId::new(9), Role::Customer);
/// assert!(!customer.may_access(UserId::new(42)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    user_id: UserId,
    role: Role,
}

impl Principal {
    /// Construct a principal from its parts.
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Authenticated user id.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Role held by the authenticated user.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the principal holds the manager role.
    pub const fn is_manager(&self) -> bool {
        self.role.is_manager()
    }

    /// Whether the principal is the given user.
    pub fn owns(&self, owner: UserId) -> bool {
        self.user_id == owner
    }

    /// Owners and managers may read resources belonging to `owner`.
    pub fn may_access(&self, owner: UserId) -> bool {
        self.owns(owner) || self.is_manager()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}
