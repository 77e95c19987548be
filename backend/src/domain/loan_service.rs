//! Loan lifecycle domain service.
//!
//! Implements the [`LoanCommand`] and [`LoanQuery`] driving ports over the
//! loan and user repositories. Ownership rules live here; session presence
//! and role gates for the manager-only endpoints stay in the HTTP adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateLoanRequest, LoanCommand, LoanQuery, LoanRepository, LoanRepositoryError,
    UpdateLoanRequest, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Decision, Error, Loan, LoanChanges, LoanId, LoanStatus, LoanStatusId, LoanType, LoanTypeId,
    LoanView, NewLoan, Principal, User, UserId,
};

/// Message returned when a loan is missing or hidden from the caller.
pub const LOAN_NOT_VISIBLE: &str = "Invalid credentials or loan not found";

/// Loan service implementing the loan driving ports.
#[derive(Clone)]
pub struct LoanService<L, U> {
    loans: Arc<L>,
    users: Arc<U>,
}

impl<L, U> LoanService<L, U> {
    /// Create a new service with the given repositories.
    pub fn new(loans: Arc<L>, users: Arc<U>) -> Self {
        Self { loans, users }
    }
}

impl<L, U> LoanService<L, U>
where
    L: LoanRepository,
    U: UserRepository,
{
    fn map_loan_error(error: LoanRepositoryError) -> Error {
        match error {
            LoanRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("loan repository unavailable: {message}"))
            }
            LoanRepositoryError::Query { message } => {
                Error::internal(format!("loan repository error: {message}"))
            }
        }
    }

    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail { email } => {
                Error::internal(format!("unexpected duplicate email during loan lookup: {email}"))
            }
        }
    }

    fn unknown_reference(field: &str, message: String) -> Error {
        Error::invalid_request(message).with_details(json!({
            "field": field,
            "code": "unknown_reference",
        }))
    }

    fn loan_not_found(loan_id: LoanId) -> Error {
        Error::not_found(format!("No loan found with id: {loan_id}"))
    }

    async fn load(&self, loan_id: LoanId) -> Result<Option<Loan>, Error> {
        self.loans
            .find_by_id(loan_id)
            .await
            .map_err(Self::map_loan_error)
    }

    async fn require_owner(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| {
                Self::unknown_reference("userId", format!("User not found with id: {user_id}"))
            })
    }

    async fn require_loan_type(&self, type_id: LoanTypeId) -> Result<LoanType, Error> {
        self.loans
            .find_loan_type(type_id)
            .await
            .map_err(Self::map_loan_error)?
            .ok_or_else(|| {
                Self::unknown_reference("type", format!("Loan type not found with id: {type_id}"))
            })
    }

    async fn require_loan_status(&self, status_id: LoanStatusId) -> Result<LoanStatus, Error> {
        self.loans
            .find_loan_status(status_id)
            .await
            .map_err(Self::map_loan_error)?
            .ok_or_else(|| {
                Self::unknown_reference(
                    "status",
                    format!("Loan status not found with id: {status_id}"),
                )
            })
    }

    async fn reload(&self, loan_id: LoanId) -> Result<LoanView, Error> {
        self.load(loan_id)
            .await?
            .map(LoanView::from)
            .ok_or_else(|| Self::loan_not_found(loan_id))
    }

    fn project(loans: Vec<Loan>) -> Vec<LoanView> {
        loans.into_iter().map(LoanView::from).collect()
    }
}

#[async_trait]
impl<L, U> LoanCommand for LoanService<L, U>
where
    L: LoanRepository,
    U: UserRepository,
{
    async fn create_loan(&self, request: CreateLoanRequest) -> Result<LoanView, Error> {
        let owner = self.require_owner(request.user_id).await?;
        let loan_type = self.require_loan_type(request.loan_type_id).await?;
        let status = self.require_loan_status(request.status_id).await?;

        let new_loan = NewLoan {
            amount: request.amount,
            term: request.term,
            owner_id: owner.id,
            loan_type_id: loan_type.id,
            status_id: status.id,
        };
        let id = self
            .loans
            .insert(&new_loan)
            .await
            .map_err(Self::map_loan_error)?;

        info!(loan_id = %id, user_id = %owner.id, "loan created");
        Ok(LoanView::from(Loan {
            id,
            amount: new_loan.amount,
            term: new_loan.term,
            owner,
            loan_type,
            status,
        }))
    }

    async fn update_loan(
        &self,
        request: UpdateLoanRequest,
        requester: &Principal,
    ) -> Result<LoanView, Error> {
        let loan_id = request.loan_id;
        let existing = self
            .load(loan_id)
            .await?
            .ok_or_else(|| Self::loan_not_found(loan_id))?;

        if !requester.owns(existing.owner.id) {
            warn!(
                loan_id = %loan_id,
                user_id = %requester.user_id(),
                "unauthorized loan update"
            );
            return Err(Error::unauthorized("Unauthorized access to update loan"));
        }

        let loan_type = self.require_loan_type(request.loan_type_id).await?;
        let status_id = match request.status_id {
            Some(status_id) => self.require_loan_status(status_id).await?.id,
            None => existing.status.id,
        };

        let changes = LoanChanges {
            amount: request.amount,
            term: request.term,
            loan_type_id: loan_type.id,
            status_id,
        };
        let updated = self
            .loans
            .update(loan_id, &changes)
            .await
            .map_err(Self::map_loan_error)?;
        if !updated {
            return Err(Self::loan_not_found(loan_id));
        }

        info!(loan_id = %loan_id, "loan updated");
        self.reload(loan_id).await
    }

    async fn delete_loan(&self, loan_id: LoanId, requester: &Principal) -> Result<bool, Error> {
        let Some(loan) = self.load(loan_id).await? else {
            info!(loan_id = %loan_id, "delete requested for missing loan");
            return Ok(false);
        };

        if !requester.owns(loan.owner.id) {
            warn!(
                loan_id = %loan_id,
                user_id = %requester.user_id(),
                "unauthorized loan delete"
            );
            return Ok(false);
        }
        if loan.status.is_approved() {
            warn!(loan_id = %loan_id, "approved loans cannot be deleted");
            return Ok(false);
        }

        let deleted = self
            .loans
            .delete(loan_id)
            .await
            .map_err(Self::map_loan_error)?;
        if deleted {
            info!(loan_id = %loan_id, "loan deleted");
        }
        Ok(deleted)
    }

    async fn approve_or_reject_loan(
        &self,
        loan_id: LoanId,
        decision: Decision,
    ) -> Result<LoanView, Error> {
        let updated = self
            .loans
            .update_status(loan_id, decision.status_id())
            .await
            .map_err(Self::map_loan_error)?;
        if !updated {
            warn!(loan_id = %loan_id, %decision, "decision for missing loan");
            return Err(Self::loan_not_found(loan_id));
        }

        info!(loan_id = %loan_id, %decision, "loan decision recorded");
        self.reload(loan_id).await
    }
}

#[async_trait]
impl<L, U> LoanQuery for LoanService<L, U>
where
    L: LoanRepository,
    U: UserRepository,
{
    async fn get_loan_by_id(
        &self,
        loan_id: LoanId,
        requester: &Principal,
    ) -> Result<LoanView, Error> {
        match self.load(loan_id).await? {
            Some(loan) if requester.may_access(loan.owner.id) => {
                info!(loan_id = %loan_id, user_id = %requester.user_id(), "loan found");
                Ok(LoanView::from(loan))
            }
            _ => {
                info!(loan_id = %loan_id, "loan not found or not visible");
                Err(Error::not_found(LOAN_NOT_VISIBLE))
            }
        }
    }

    async fn get_all_loans(&self) -> Result<Vec<LoanView>, Error> {
        let loans = self.loans.find_all().await.map_err(Self::map_loan_error)?;
        Ok(Self::project(loans))
    }

    async fn get_loans_by_user_id(&self, user_id: UserId) -> Result<Vec<LoanView>, Error> {
        let loans = self
            .loans
            .find_by_owner(user_id)
            .await
            .map_err(Self::map_loan_error)?;
        info!(user_id = %user_id, count = loans.len(), "loans listed for user");
        Ok(Self::project(loans))
    }
}

#[cfg(test)]
#[path = "loan_service_tests.rs"]
mod tests;
