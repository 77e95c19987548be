//! Loan aggregate, its reference data, and the read projection.
//!
//! Loan types and statuses are reference rows owned by the persistence layer.
//! Status ids are fixed by the seed migration: `1` Pending, `2` Approved,
//! `3` Rejected.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{User, UserId};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Access the raw identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Loan primary key.
    LoanId
);
numeric_id!(
    /// Loan type reference id.
    LoanTypeId
);
numeric_id!(
    /// Loan status reference id.
    LoanStatusId
);

impl LoanStatusId {
    /// Initial status assigned to new loans.
    pub const PENDING: Self = Self(1);
    /// Status set by the approve action.
    pub const APPROVED: Self = Self(2);
    /// Status set by the reject action.
    pub const REJECTED: Self = Self(3);
}

/// Descriptive loan category, e.g. "Personal" or "Mortgage".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanType {
    pub id: LoanTypeId,
    pub label: String,
}

/// Lifecycle status row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanStatus {
    pub id: LoanStatusId,
    pub label: String,
}

impl LoanStatus {
    /// Approved loans can no longer be deleted.
    pub fn is_approved(&self) -> bool {
        self.id == LoanStatusId::APPROVED
    }
}

/// Manager decision applied by the approve and reject endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status id the decision moves the loan to.
    ///
    /// # Examples
    /// ```
    /// use lms_backend::domain::{Decision, LoanStatusId};
    ///
    /// assert_eq!(Decision::Approve.status_id(), LoanStatusId::APPROVED);
    /// assert_eq!(Decision::Reject.status_id(), LoanStatusId::REJECTED);
    /// ```
    pub const fn status_id(self) -> LoanStatusId {
        match self {
            Self::Approve => LoanStatusId::APPROVED,
            Self::Reject => LoanStatusId::REJECTED,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Fully hydrated loan as returned by the repository.
///
/// ## Invariants
/// - Always references exactly one owner, one type and one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub id: LoanId,
    pub amount: Decimal,
    pub term: i32,
    pub owner: User,
    pub loan_type: LoanType,
    pub status: LoanStatus,
}

/// Loan row awaiting an identifier from the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub amount: Decimal,
    pub term: i32,
    pub owner_id: UserId,
    pub loan_type_id: LoanTypeId,
    pub status_id: LoanStatusId,
}

/// Field overwrite applied by the update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanChanges {
    pub amount: Decimal,
    pub term: i32,
    pub loan_type_id: LoanTypeId,
    pub status_id: LoanStatusId,
}

/// Read projection returned to clients.
///
/// # Examples
/// ```
/// use lms_backend::domain::LoanView;
/// use rust_decimal::Decimal;
///
/// let view = LoanView {
///     id: 7.into(),
///     amount: Decimal::new(100_000, 2),
///     term: 12,
///     loan_type: "Personal".into(),
///     status: "Pending".into(),
///     user_full_name: "Ada Lovelace".into(),
///     user_id: 5.into(),
/// };
/// let json = serde_json::to_value(&view).unwrap();
/// assert_eq!(json["type"], "Personal");
/// assert_eq!(json["amount"], "1000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    #[schema(value_type = i64, example = 7)]
    pub id: LoanId,
    #[schema(value_type = String, example = "1000.00")]
    pub amount: Decimal,
    #[schema(example = 12)]
    pub term: i32,
    /// Loan type label.
    #[serde(rename = "type")]
    #[schema(example = "Personal")]
    pub loan_type: String,
    /// Loan status label.
    #[schema(example = "Pending")]
    pub status: String,
    #[schema(example = "Ada Lovelace")]
    pub user_full_name: String,
    #[schema(value_type = i64, example = 5)]
    pub user_id: UserId,
}

impl From<&Loan> for LoanView {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            amount: loan.amount,
            term: loan.term,
            loan_type: loan.loan_type.label.clone(),
            status: loan.status.label.clone(),
            user_full_name: loan.owner.full_name(),
            user_id: loan.owner.id,
        }
    }
}

impl From<Loan> for LoanView {
    fn from(loan: Loan) -> Self {
        Self::from(&loan)
    }
}
