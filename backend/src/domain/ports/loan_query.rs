//! Driving port for loan reads.

use async_trait::async_trait;

use crate::domain::{Error, LoanId, LoanView, Principal, UserId};

/// Domain use-case port for reading loan projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanQuery: Send + Sync {
    /// Return a loan visible to `requester`.
    ///
    /// Loans that exist but belong to another user are reported as
    /// `not_found` unless the requester is a manager.
    async fn get_loan_by_id(&self, loan_id: LoanId, requester: &Principal)
    -> Result<LoanView, Error>;

    /// Return every loan. Role checks are the caller's responsibility.
    async fn get_all_loans(&self) -> Result<Vec<LoanView>, Error>;

    /// Return all loans owned by `user_id`.
    async fn get_loans_by_user_id(&self, user_id: UserId) -> Result<Vec<LoanView>, Error>;
}
