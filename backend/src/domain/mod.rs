//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed loan and account entities plus the services
//! that enforce ownership and lifecycle rules. Adapters reach the domain only
//! through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User, Role, EmailAddress: account identity.
//! - Principal: authenticated caller passed explicitly to services.
//! - Loan, LoanView, Decision: loan aggregate, projection and manager action.
//! - LoanService, AccountService: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod loan;
pub mod loan_service;
pub mod ports;
pub mod principal;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, Registration, RegistrationError, RegistrationParts,
};
pub use self::error::{Error, ErrorCode};
pub use self::loan::{
    Decision, Loan, LoanChanges, LoanId, LoanStatus, LoanStatusId, LoanType, LoanTypeId,
    LoanView, NewLoan,
};
pub use self::loan_service::LoanService;
pub use self::principal::Principal;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_LOCAL_PART_MAX, EmailAddress, NewUser, Role, User, UserAccount, UserId,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use lms_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Access Denied"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
