//! Driving port for loan mutations.
//!
//! Inbound adapters validate payload shape and session presence, then hand
//! these requests to the domain together with the authenticated principal.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Decision, Error, LoanId, LoanStatusId, LoanTypeId, LoanView, Principal, UserId};

/// Input for [`LoanCommand::create_loan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLoanRequest {
    pub amount: Decimal,
    pub term: i32,
    pub loan_type_id: LoanTypeId,
    pub user_id: UserId,
    /// Initial status. The HTTP adapter always supplies Pending.
    pub status_id: LoanStatusId,
}

/// Input for [`LoanCommand::update_loan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLoanRequest {
    pub loan_id: LoanId,
    pub amount: Decimal,
    pub term: i32,
    pub loan_type_id: LoanTypeId,
    /// Replacement status; `None` keeps the current one.
    pub status_id: Option<LoanStatusId>,
}

/// Domain use-case port for loan lifecycle changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanCommand: Send + Sync {
    /// Persist a new loan and return its projection.
    ///
    /// Unknown user, type or status ids fail with `invalid_request`.
    async fn create_loan(&self, request: CreateLoanRequest) -> Result<LoanView, Error>;

    /// Overwrite a loan owned by `requester`.
    ///
    /// Missing loans fail with `not_found`; loans owned by someone else fail
    /// with `unauthorized`.
    async fn update_loan(
        &self,
        request: UpdateLoanRequest,
        requester: &Principal,
    ) -> Result<LoanView, Error>;

    /// Delete a loan owned by `requester` unless it is approved.
    ///
    /// Returns `false` when the loan is missing, owned by someone else or
    /// already approved.
    async fn delete_loan(&self, loan_id: LoanId, requester: &Principal) -> Result<bool, Error>;

    /// Apply a manager decision and return the updated projection.
    async fn approve_or_reject_loan(
        &self,
        loan_id: LoanId,
        decision: Decision,
    ) -> Result<LoanView, Error>;
}
