//! User data model.
//!
//! Users are created at registration and their identity is immutable
//! afterwards. Roles are a closed enumeration; the persistence layer stores
//! the numeric role id.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    EmailLocalPartTooLong { max: usize },
    InvalidEmail,
    EmptyFirstName,
    EmptyLastName,
    UnknownRole { id: i64 },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailLocalPartTooLong { max } => {
                write!(f, "email local part must be at most {max} characters")
            }
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::UnknownRole { .. } => write!(f, "Role not found"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable numeric user identifier assigned by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Role held by a user account.
///
/// Role ids follow the seeded `roles` reference table: `1` is `Manager`,
/// `2` is `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Back-office staff allowed to list, approve and reject every loan.
    Manager,
    /// Standard user who may only act on their own loans.
    Customer,
}

impl Role {
    /// Resolve a role from its reference-table id.
    ///
    /// # Examples
    /// ```
    /// use lms_backend::domain::Role;
    ///
    /// assert_eq!(Role::from_id(1), Ok(Role::Manager));
    /// assert!(Role::from_id(9).is_err());
    /// ```
    pub fn from_id(id: i64) -> Result<Self, UserValidationError> {
        match id {
            1 => Ok(Self::Manager),
            2 => Ok(Self::Customer),
            other => Err(UserValidationError::UnknownRole { id: other }),
        }
    }

    /// Reference-table id for this role.
    pub const fn id(self) -> i64 {
        match self {
            Self::Manager => 1,
            Self::Customer => 2,
        }
    }

    /// Human-readable role name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Customer => "Customer",
        }
    }

    /// Whether the role may administer loans it does not own.
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maximum length of the part of an email address before `@`.
pub const EMAIL_LOCAL_PART_MAX: usize = 64;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // The local-part length limit is checked separately; the regex crate
        // has no look-ahead.
        let pattern = r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*@[^-][A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*(\.[A-Za-z]{2,})$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address used as the login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Examples
    /// ```
    /// use lms_backend::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("ada@example.com").is_ok());
    /// assert!(EmailAddress::new("ada@-example.com").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let local_len = email
            .split_once('@')
            .map_or(0, |(local, _)| local.chars().count());
        if local_len > EMAIL_LOCAL_PART_MAX {
            return Err(UserValidationError::EmailLocalPartTooLong {
                max: EMAIL_LOCAL_PART_MAX,
            });
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i64, example = 5)]
    pub id: UserId,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: EmailAddress,
    pub phone: String,
    pub role: Role,
}

impl User {
    /// First and last name joined by a single space.
    ///
    /// # Examples
    /// ```
    /// use lms_backend::domain::{EmailAddress, Role, User, UserId};
    ///
    /// let user = User {
    ///     id: UserId::new(5),
    ///     first_name: "Ada".into(),
    ///     last_name: "Lovelace".into(),
    ///     email: EmailAddress::new("ada@example.com").unwrap(),
    ///     phone: "555-0100".into(),
    ///     role: Role::Customer,
    /// };
    /// assert_eq!(user.full_name(), "Ada Lovelace");
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Stored account: the user plus the bcrypt hash used at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

/// User row awaiting an identifier from the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub role: Role,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com")]
    #[case("ada.lovelace@mail.example.org")]
    #[case("first_last-1@example.io")]
    fn accepts_valid_email(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_str(), raw);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("no-at-sign.example.com", UserValidationError::InvalidEmail)]
    #[case("ada@-example.com", UserValidationError::InvalidEmail)]
    #[case("ada@example", UserValidationError::InvalidEmail)]
    #[case(".ada@example.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_email(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[test]
    fn rejects_overlong_local_part() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_LOCAL_PART_MAX + 1));
        assert_eq!(
            EmailAddress::new(raw),
            Err(UserValidationError::EmailLocalPartTooLong {
                max: EMAIL_LOCAL_PART_MAX
            })
        );
    }

    #[rstest]
    #[case(1, Role::Manager)]
    #[case(2, Role::Customer)]
    fn role_ids_round_trip(#[case] id: i64, #[case] role: Role) {
        assert_eq!(Role::from_id(id), Ok(role));
        assert_eq!(role.id(), id);
    }

    #[test]
    fn unknown_role_reports_role_not_found() {
        let err = Role::from_id(7).expect_err("unknown role");
        assert_eq!(err.to_string(), "Role not found");
    }

    #[test]
    fn role_serialises_as_label() {
        let value = serde_json::to_value(Role::Manager).expect("serialise role");
        assert_eq!(value, serde_json::json!("Manager"));
    }
}
