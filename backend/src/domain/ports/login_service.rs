//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! importing persistence or hashing concerns.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown emails and wrong passwords both fail with `unauthorized` so
    /// callers cannot probe which accounts exist.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
