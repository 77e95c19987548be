//! PostgreSQL-backed `LoanRepository` adapter.
//!
//! Reads join `loans` with its owner, type and status so every returned
//! aggregate is fully hydrated in a single round trip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{LoanRepository, LoanRepositoryError};
use crate::domain::{
    Loan, LoanChanges, LoanId, LoanStatus, LoanStatusId, LoanType, LoanTypeId, NewLoan, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    HydratedLoanRow, LoanRow, LoanStatusRow, LoanTypeRow, LoanUpdate, NewLoanRow, UserRow,
    hydrate_loan,
};
use super::pool::DbPool;
use super::schema::{loan_statuses, loan_types, loans, users};

/// Diesel-backed implementation of the loan repository port.
#[derive(Clone)]
pub struct DieselLoanRepository {
    pool: DbPool,
}

impl DieselLoanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Boxed select over the four joined tables, ordered by loan id.
macro_rules! hydrated_loans {
    () => {
        loans::table
            .inner_join(users::table)
            .inner_join(loan_types::table)
            .inner_join(loan_statuses::table)
            .select((
                LoanRow::as_select(),
                UserRow::as_select(),
                LoanTypeRow::as_select(),
                LoanStatusRow::as_select(),
            ))
            .order_by(loans::id.asc())
    };
}

fn hydrate_all(rows: Vec<HydratedLoanRow>) -> Result<Vec<Loan>, LoanRepositoryError> {
    rows.into_iter()
        .map(hydrate_loan)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LoanRepositoryError::query)
}

#[async_trait]
impl LoanRepository for DieselLoanRepository {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HydratedLoanRow> = hydrated_loans!()
            .filter(loans::id.eq(id.get()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find loan"))?;
        row.map(hydrate_loan)
            .transpose()
            .map_err(LoanRepositoryError::query)
    }

    async fn find_all(&self) -> Result<Vec<Loan>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HydratedLoanRow> = hydrated_loans!()
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list loans"))?;
        hydrate_all(rows)
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Loan>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HydratedLoanRow> = hydrated_loans!()
            .filter(loans::user_id.eq(owner.get()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list owner loans"))?;
        hydrate_all(rows)
    }

    async fn insert(&self, loan: &NewLoan) -> Result<LoanId, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(loans::table)
            .values(NewLoanRow::from(loan))
            .returning(loans::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert loan"))?;
        debug!(loan_id = id, "loan row inserted");
        Ok(LoanId::new(id))
    }

    async fn update(
        &self,
        id: LoanId,
        changes: &LoanChanges,
    ) -> Result<bool, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(loans::table.filter(loans::id.eq(id.get())))
            .set(LoanUpdate::from(changes))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update loan"))?;
        Ok(updated > 0)
    }

    async fn update_status(
        &self,
        id: LoanId,
        status: LoanStatusId,
    ) -> Result<bool, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(loans::table.filter(loans::id.eq(id.get())))
            .set(loans::status_id.eq(status.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update loan status"))?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: LoanId) -> Result<bool, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(loans::table.filter(loans::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete loan"))?;
        Ok(deleted > 0)
    }

    async fn find_loan_type(
        &self,
        id: LoanTypeId,
    ) -> Result<Option<LoanType>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LoanTypeRow> = loan_types::table
            .filter(loan_types::id.eq(id.get()))
            .select(LoanTypeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find loan type"))?;
        Ok(row.map(LoanType::from))
    }

    async fn find_loan_status(
        &self,
        id: LoanStatusId,
    ) -> Result<Option<LoanStatus>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LoanStatusRow> = loan_statuses::table
            .filter(loan_statuses::id.eq(id.get()))
            .select(LoanStatusRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find loan status"))?;
        Ok(row.map(LoanStatus::from))
    }
}
