//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the loan and user repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures are mapped to the
//!   port error enums.
//!
//! # Example
//!
//! ```ignore
//! use lms_backend::outbound::persistence::{DbPool, DieselLoanRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/lms")).await?;
//! let loans = DieselLoanRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_loan_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_loan_repository::DieselLoanRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
