//! Port abstraction for loan persistence adapters and their errors.
//!
//! The repository hands back fully hydrated [`Loan`] values so the service
//! never has to join owner, type and status rows itself.

use async_trait::async_trait;

use crate::domain::{
    Loan, LoanChanges, LoanId, LoanStatus, LoanStatusId, LoanType, LoanTypeId, NewLoan, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by loan repository adapters.
    pub enum LoanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "loan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "loan repository query failed: {message}",
    }
}

/// Driven port for loan storage and reference-data lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Fetch a loan with its owner, type and status.
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>, LoanRepositoryError>;

    /// Fetch every loan ordered by id.
    async fn find_all(&self) -> Result<Vec<Loan>, LoanRepositoryError>;

    /// Fetch the loans owned by `owner`, ordered by id.
    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Loan>, LoanRepositoryError>;

    /// Insert a loan and return its assigned id.
    async fn insert(&self, loan: &NewLoan) -> Result<LoanId, LoanRepositoryError>;

    /// Overwrite amount, term, type and status of an existing loan.
    ///
    /// Returns `false` when no row matched `id`.
    async fn update(&self, id: LoanId, changes: &LoanChanges)
    -> Result<bool, LoanRepositoryError>;

    /// Set the status of an existing loan.
    ///
    /// Returns `false` when no row matched `id`.
    async fn update_status(
        &self,
        id: LoanId,
        status: LoanStatusId,
    ) -> Result<bool, LoanRepositoryError>;

    /// Remove a loan. Returns `false` when no row matched `id`.
    async fn delete(&self, id: LoanId) -> Result<bool, LoanRepositoryError>;

    /// Resolve a loan type reference row.
    async fn find_loan_type(&self, id: LoanTypeId)
    -> Result<Option<LoanType>, LoanRepositoryError>;

    /// Resolve a loan status reference row.
    async fn find_loan_status(
        &self,
        id: LoanStatusId,
    ) -> Result<Option<LoanStatus>, LoanRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LoanRepositoryError::connection("refused"), "loan repository connection failed: refused")]
    #[case(LoanRepositoryError::query("syntax"), "loan repository query failed: syntax")]
    fn errors_render_context(#[case] err: LoanRepositoryError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }
}
