//! Login and registration inputs.
//!
//! Inbound adapters build these from raw payload strings so the services only
//! ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{EmailAddress, Role, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty. It is not format-checked so that a
///   malformed address fails as "invalid credentials" rather than leaking
///   which addresses are well formed.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use lms_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    first_name: String,
    last_name: String,
    phone: String,
    role: Role,
}

/// Raw registration values as received from an adapter.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationParts<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub role_id: i64,
}

/// Reasons a registration payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    User(UserValidationError),
    EmptyPassword,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<UserValidationError> for RegistrationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

impl Registration {
    /// Validate raw registration inputs.
    ///
    /// # Examples
    /// ```
    /// use lms_backend::domain::{Registration, RegistrationParts, Role};
    ///
    /// let registration = Registration::try_from_parts(RegistrationParts {
    ///     email: "ada@example.com",
    ///     password: "secret",
    ///     first_name: "Ada",
    ///     last_name: "Lovelace",
    ///     phone: "555-0100",
    ///     role_id: 2,
    /// })
    /// .unwrap();
    /// assert_eq!(registration.role(), Role::Customer);
    /// ```
    pub fn try_from_parts(parts: RegistrationParts<'_>) -> Result<Self, RegistrationError> {
        let email = EmailAddress::new(parts.email.trim())?;
        if parts.password.is_empty() {
            return Err(RegistrationError::EmptyPassword);
        }
        let first_name = parts.first_name.trim();
        if first_name.is_empty() {
            return Err(UserValidationError::EmptyFirstName.into());
        }
        let last_name = parts.last_name.trim();
        if last_name.is_empty() {
            return Err(UserValidationError::EmptyLastName.into());
        }
        let role = Role::from_id(parts.role_id)?;
        Ok(Self {
            email,
            password: Zeroizing::new(parts.password.to_owned()),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            phone: parts.phone.trim().to_owned(),
            role,
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
