//! Shared Diesel error mapping for the loan and user repositories.
//!
//! Both driven ports expose the same `Connection` and `Query` split, so the
//! mapping is written once against [`RepositoryErrorKind`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{LoanRepositoryError, UserRepositoryError};

use super::pool::PoolError;

/// Port error types that can represent connection and query failures.
pub(crate) trait RepositoryErrorKind: Sized {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

impl RepositoryErrorKind for LoanRepositoryError {
    fn connection(message: String) -> Self {
        Self::Connection { message }
    }

    fn query(message: String) -> Self {
        Self::Query { message }
    }
}

impl RepositoryErrorKind for UserRepositoryError {
    fn connection(message: String) -> Self {
        Self::Connection { message }
    }

    fn query(message: String) -> Self {
        Self::Query { message }
    }
}

/// Pool checkout and build failures are always connection errors.
pub(crate) fn map_pool_error<E: RepositoryErrorKind>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map a Diesel failure, logging the driver detail at debug level only.
pub(crate) fn map_diesel_error<E: RepositoryErrorKind>(error: DieselError, operation: &str) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query(format!("{operation}: record not found")),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection(format!("{operation}: database connection error"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            E::query(format!("{operation}: referenced row not found"))
        }
        _ => E::query(format!("{operation}: database error")),
    }
}

/// True when the failure is the unique index on `users.email`.
pub(crate) fn is_duplicate_email(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => info
            .constraint_name()
            .is_none_or(|name| name.contains("email")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::checkout(PoolError::checkout("timed out"))]
    #[case::build(PoolError::build("bad url"))]
    fn pool_errors_map_to_connection(#[case] error: PoolError) {
        let mapped: LoanRepositoryError = map_pool_error(error);
        assert!(matches!(mapped, LoanRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn not_found_maps_to_query_with_operation() {
        let mapped: UserRepositoryError = map_diesel_error(DieselError::NotFound, "find user");
        assert_eq!(
            mapped,
            UserRepositoryError::query("find user: record not found")
        );
    }

    #[rstest]
    fn non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate_email(&DieselError::NotFound));
    }
}
