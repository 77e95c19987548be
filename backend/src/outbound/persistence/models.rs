//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live here so
//! the repositories stay thin.

use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    EmailAddress, Loan, LoanChanges, LoanId, LoanStatus, LoanStatusId, LoanType, LoanTypeId,
    NewLoan, NewUser, Role, User, UserAccount, UserId,
};

use super::schema::{loan_statuses, loan_types, loans, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role_id: i64,
}

impl UserRow {
    /// Rebuild the domain account, rejecting rows that violate domain rules.
    pub fn into_account(self) -> Result<UserAccount, String> {
        let email = EmailAddress::new(self.email)
            .map_err(|err| format!("user {} has an invalid email: {err}", self.id))?;
        let role = Role::from_id(self.role_id)
            .map_err(|err| format!("user {} has an invalid role: {err}", self.id))?;
        Ok(UserAccount {
            user: User {
                id: UserId::new(self.id),
                first_name: self.first_name,
                last_name: self.last_name,
                email,
                phone: self.phone,
                role,
            },
            password_hash: self.password_hash,
        })
    }

    pub fn into_user(self) -> Result<User, String> {
        self.into_account().map(|account| account.user)
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub password_hash: &'a str,
    pub role_id: i64,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: user.email.as_str(),
            phone: &user.phone,
            password_hash: &user.password_hash,
            role_id: user.role.id(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loan_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanTypeRow {
    pub id: i64,
    pub label: String,
}

impl From<LoanTypeRow> for LoanType {
    fn from(row: LoanTypeRow) -> Self {
        Self {
            id: LoanTypeId::new(row.id),
            label: row.label,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loan_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanStatusRow {
    pub id: i64,
    pub label: String,
}

impl From<LoanStatusRow> for LoanStatus {
    fn from(row: LoanStatusRow) -> Self {
        Self {
            id: LoanStatusId::new(row.id),
            label: row.label,
        }
    }
}

/// Row struct for reading from the loans table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanRow {
    pub id: i64,
    pub amount: Decimal,
    pub term: i32,
    #[expect(dead_code, reason = "owner is hydrated from the joined users row")]
    pub user_id: i64,
    #[expect(dead_code, reason = "type is hydrated from the joined loan_types row")]
    pub loan_type_id: i64,
    #[expect(dead_code, reason = "status is hydrated from the joined loan_statuses row")]
    pub status_id: i64,
}

/// A loan joined with its owner, type and status rows.
pub(crate) type HydratedLoanRow = (LoanRow, UserRow, LoanTypeRow, LoanStatusRow);

/// Assemble the domain aggregate from a joined row.
pub(crate) fn hydrate_loan(
    (loan, owner, loan_type, status): HydratedLoanRow,
) -> Result<Loan, String> {
    Ok(Loan {
        id: LoanId::new(loan.id),
        amount: loan.amount,
        term: loan.term,
        owner: owner.into_user()?,
        loan_type: loan_type.into(),
        status: status.into(),
    })
}

/// Insertable struct for creating new loan records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loans)]
pub(crate) struct NewLoanRow {
    pub amount: Decimal,
    pub term: i32,
    pub user_id: i64,
    pub loan_type_id: i64,
    pub status_id: i64,
}

impl From<&NewLoan> for NewLoanRow {
    fn from(loan: &NewLoan) -> Self {
        Self {
            amount: loan.amount,
            term: loan.term,
            user_id: loan.owner_id.get(),
            loan_type_id: loan.loan_type_id.get(),
            status_id: loan.status_id.get(),
        }
    }
}

/// Changeset struct for overwriting the mutable loan columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = loans)]
pub(crate) struct LoanUpdate {
    pub amount: Decimal,
    pub term: i32,
    pub loan_type_id: i64,
    pub status_id: i64,
}

impl From<&LoanChanges> for LoanUpdate {
    fn from(changes: &LoanChanges) -> Self {
        Self {
            amount: changes.amount,
            term: changes.term,
            loan_type_id: changes.loan_type_id.get(),
            status_id: changes.status_id.get(),
        }
    }
}
