//! Account registration and login.
//!
//! Passwords are hashed with bcrypt on a blocking thread so the async
//! executor is not stalled by the key-derivation rounds.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{AccountRegistration, LoginService, UserRepository, UserRepositoryError};
use crate::domain::{Error, LoginCredentials, NewUser, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing registration and login ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hash_cost: u32,
}

impl<U> AccountService<U> {
    /// Create a service hashing with [`bcrypt::DEFAULT_COST`].
    pub fn new(users: Arc<U>) -> Self {
        Self::with_hash_cost(users, bcrypt::DEFAULT_COST)
    }

    /// Create a service with an explicit bcrypt cost.
    pub fn with_hash_cost(users: Arc<U>, hash_cost: u32) -> Self {
        Self { users, hash_cost }
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

async fn verify_password(password: String, hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
        .map_err(|err| Error::internal(format!("stored password hash is invalid: {err}")))
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail { email } => {
                Error::invalid_request(format!("Email already registered: {email}"))
            }
        }
    }
}

#[async_trait]
impl<U> AccountRegistration for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let email = registration.email().clone();
        if self
            .users
            .find_by_email(email.as_str())
            .await
            .map_err(Self::map_user_error)?
            .is_some()
        {
            warn!(email = %email, "registration with existing email");
            return Err(Error::invalid_request(format!(
                "Email already registered: {email}"
            )));
        }

        let password_hash =
            hash_password(registration.password().to_owned(), self.hash_cost).await?;
        let new_user = NewUser {
            first_name: registration.first_name().to_owned(),
            last_name: registration.last_name().to_owned(),
            email,
            phone: registration.phone().to_owned(),
            role: registration.role(),
            password_hash,
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user)
    }

    async fn find_user(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found(format!("User not found with id: {user_id}")))
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            info!("login attempt for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(credentials.password().to_owned(), account.password_hash).await? {
            warn!(user_id = %account.user.id, "login attempt with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %account.user.id, "user logged in");
        Ok(account.user)
    }
}
