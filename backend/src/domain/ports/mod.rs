//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoanCommand`, `LoanQuery`, `LoginService`,
//! `AccountRegistration`) are called by inbound adapters. Driven ports
//! (`LoanRepository`, `UserRepository`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registration;
mod loan_command;
mod loan_query;
mod loan_repository;
mod login_service;
mod user_repository;

pub use account_registration::AccountRegistration;
#[cfg(test)]
pub use account_registration::MockAccountRegistration;
pub use loan_command::{CreateLoanRequest, LoanCommand, UpdateLoanRequest};
#[cfg(test)]
pub use loan_command::MockLoanCommand;
pub use loan_query::LoanQuery;
#[cfg(test)]
pub use loan_query::MockLoanQuery;
#[cfg(test)]
pub use loan_repository::MockLoanRepository;
pub use loan_repository::{LoanRepository, LoanRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
