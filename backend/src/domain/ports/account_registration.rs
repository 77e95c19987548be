//! Driving port for account registration and profile lookups.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User, UserId};

/// Domain use-case port for managing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistration: Send + Sync {
    /// Create an account. Duplicate emails fail with `invalid_request`.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Fetch a registered user; unknown ids fail with `not_found`.
    async fn find_user(&self, user_id: UserId) -> Result<User, Error>;
}
