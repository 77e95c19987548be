//! In-memory store implementing the loan and user repositories.
//!
//! Used when no database URL is configured and by the HTTP test suites. Rows
//! live in ordered maps behind a single [`RwLock`], so ids are assigned
//! monotonically and listings come back in id order like the SQL adapter.
//! Foreign-key checks mirror the PostgreSQL constraints.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::ports::{
    LoanRepository, LoanRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Loan, LoanChanges, LoanId, LoanStatus, LoanStatusId, LoanType, LoanTypeId, NewLoan, NewUser,
    User, UserAccount, UserId,
};

/// Loan type labels seeded at construction, keyed by id.
pub const SEEDED_LOAN_TYPES: [(i64, &str); 3] = [(1, "Personal"), (2, "Mortgage"), (3, "Auto")];

/// Loan status labels seeded at construction, keyed by id.
pub const SEEDED_LOAN_STATUSES: [(i64, &str); 3] = [(1, "Pending"), (2, "Approved"), (3, "Rejected")];

#[derive(Debug, Clone)]
struct LoanRow {
    amount: Decimal,
    term: i32,
    owner_id: UserId,
    loan_type_id: LoanTypeId,
    status_id: LoanStatusId,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, UserAccount>,
    loans: BTreeMap<LoanId, LoanRow>,
    loan_types: BTreeMap<LoanTypeId, LoanType>,
    loan_statuses: BTreeMap<LoanStatusId, LoanStatus>,
    last_user_id: i64,
    last_loan_id: i64,
}

impl Tables {
    fn seeded() -> Self {
        let mut tables = Self::default();
        for (id, label) in SEEDED_LOAN_TYPES {
            let id = LoanTypeId::new(id);
            tables.loan_types.insert(
                id,
                LoanType {
                    id,
                    label: label.to_owned(),
                },
            );
        }
        for (id, label) in SEEDED_LOAN_STATUSES {
            let id = LoanStatusId::new(id);
            tables.loan_statuses.insert(
                id,
                LoanStatus {
                    id,
                    label: label.to_owned(),
                },
            );
        }
        tables
    }

    fn hydrate(&self, id: LoanId, row: &LoanRow) -> Option<Loan> {
        Some(Loan {
            id,
            amount: row.amount,
            term: row.term,
            owner: self.users.get(&row.owner_id)?.user.clone(),
            loan_type: self.loan_types.get(&row.loan_type_id)?.clone(),
            status: self.loan_statuses.get(&row.status_id)?.clone(),
        })
    }

    fn check_references(
        &self,
        owner_id: Option<UserId>,
        loan_type_id: LoanTypeId,
        status_id: LoanStatusId,
    ) -> Result<(), LoanRepositoryError> {
        if owner_id.is_some_and(|id| !self.users.contains_key(&id)) {
            return Err(LoanRepositoryError::query("loans_user_id_fkey violated"));
        }
        if !self.loan_types.contains_key(&loan_type_id) {
            return Err(LoanRepositoryError::query("loans_loan_type_id_fkey violated"));
        }
        if !self.loan_statuses.contains_key(&status_id) {
            return Err(LoanRepositoryError::query("loans_status_id_fkey violated"));
        }
        Ok(())
    }
}

/// Thread-safe in-memory persistence for users and loans.
///
/// # Examples
/// ```
/// use lms_backend::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// assert_eq!(store.loan_count(), 0);
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> String {
    "in-memory store lock poisoned".to_owned()
}

impl InMemoryStore {
    /// Create a store holding only the seeded reference rows.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::seeded()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, String> {
        self.tables.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, String> {
        self.tables.write().map_err(poisoned)
    }

    /// Number of stored loans. A poisoned lock reports zero.
    pub fn loan_count(&self) -> usize {
        self.read().map(|tables| tables.loans.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.read().map_err(UserRepositoryError::connection)?;
        Ok(tables.users.get(&id).map(|account| account.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError> {
        let tables = self.read().map_err(UserRepositoryError::connection)?;
        Ok(tables
            .users
            .values()
            .find(|account| account.user.email.as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut tables = self.write().map_err(UserRepositoryError::connection)?;
        let email_taken = tables.users.values().any(|account| {
            account
                .user
                .email
                .as_str()
                .eq_ignore_ascii_case(user.email.as_str())
        });
        if email_taken {
            return Err(UserRepositoryError::duplicate_email(user.email.as_str()));
        }

        tables.last_user_id += 1;
        let id = UserId::new(tables.last_user_id);
        let stored = User {
            id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
        };
        tables.users.insert(
            id,
            UserAccount {
                user: stored.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(stored)
    }
}

#[async_trait]
impl LoanRepository for InMemoryStore {
    async fn find_by_id(&self, id: LoanId) -> Result<Option<Loan>, LoanRepositoryError> {
        let tables = self.read().map_err(LoanRepositoryError::connection)?;
        Ok(tables
            .loans
            .get(&id)
            .and_then(|row| tables.hydrate(id, row)))
    }

    async fn find_all(&self) -> Result<Vec<Loan>, LoanRepositoryError> {
        let tables = self.read().map_err(LoanRepositoryError::connection)?;
        Ok(tables
            .loans
            .iter()
            .filter_map(|(id, row)| tables.hydrate(*id, row))
            .collect())
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Loan>, LoanRepositoryError> {
        let tables = self.read().map_err(LoanRepositoryError::connection)?;
        Ok(tables
            .loans
            .iter()
            .filter(|(_, row)| row.owner_id == owner)
            .filter_map(|(id, row)| tables.hydrate(*id, row))
            .collect())
    }

    async fn insert(&self, loan: &NewLoan) -> Result<LoanId, LoanRepositoryError> {
        let mut tables = self.write().map_err(LoanRepositoryError::connection)?;
        tables.check_references(Some(loan.owner_id), loan.loan_type_id, loan.status_id)?;

        tables.last_loan_id += 1;
        let id = LoanId::new(tables.last_loan_id);
        tables.loans.insert(
            id,
            LoanRow {
                amount: loan.amount,
                term: loan.term,
                owner_id: loan.owner_id,
                loan_type_id: loan.loan_type_id,
                status_id: loan.status_id,
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: LoanId,
        changes: &LoanChanges,
    ) -> Result<bool, LoanRepositoryError> {
        let mut tables = self.write().map_err(LoanRepositoryError::connection)?;
        tables.check_references(None, changes.loan_type_id, changes.status_id)?;
        let Some(row) = tables.loans.get_mut(&id) else {
            return Ok(false);
        };
        row.amount = changes.amount;
        row.term = changes.term;
        row.loan_type_id = changes.loan_type_id;
        row.status_id = changes.status_id;
        Ok(true)
    }

    async fn update_status(
        &self,
        id: LoanId,
        status: LoanStatusId,
    ) -> Result<bool, LoanRepositoryError> {
        let mut tables = self.write().map_err(LoanRepositoryError::connection)?;
        if !tables.loan_statuses.contains_key(&status) {
            return Err(LoanRepositoryError::query("loans_status_id_fkey violated"));
        }
        Ok(tables
            .loans
            .get_mut(&id)
            .map(|row| row.status_id = status)
            .is_some())
    }

    async fn delete(&self, id: LoanId) -> Result<bool, LoanRepositoryError> {
        let mut tables = self.write().map_err(LoanRepositoryError::connection)?;
        Ok(tables.loans.remove(&id).is_some())
    }

    async fn find_loan_type(
        &self,
        id: LoanTypeId,
    ) -> Result<Option<LoanType>, LoanRepositoryError> {
        let tables = self.read().map_err(LoanRepositoryError::connection)?;
        Ok(tables.loan_types.get(&id).cloned())
    }

    async fn find_loan_status(
        &self,
        id: LoanStatusId,
    ) -> Result<Option<LoanStatus>, LoanRepositoryError> {
        let tables = self.read().map_err(LoanRepositoryError::connection)?;
        Ok(tables.loan_statuses.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, Role};
    use rstest::{fixture, rstest};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: EmailAddress::new(email).expect("email"),
            phone: "555-0100".into(),
            role: Role::Customer,
            password_hash: "hash".into(),
        }
    }

    fn new_loan(owner_id: UserId) -> NewLoan {
        NewLoan {
            amount: Decimal::new(100_000, 2),
            term: 12,
            owner_id,
            loan_type_id: LoanTypeId::new(1),
            status_id: LoanStatusId::PENDING,
        }
    }

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_hydrates_owner_type_and_status(store: InMemoryStore) {
        let owner = UserRepository::insert(&store, &new_user("ada@example.com"))
            .await
            .expect("user");
        let id = LoanRepository::insert(&store, &new_loan(owner.id))
            .await
            .expect("loan");

        let loan = LoanRepository::find_by_id(&store, id)
            .await
            .expect("lookup")
            .expect("loan present");
        assert_eq!(loan.owner, owner);
        assert_eq!(loan.loan_type.label, "Personal");
        assert_eq!(loan.status.label, "Pending");
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_unknown_owner(store: InMemoryStore) {
        let err = LoanRepository::insert(&store, &new_loan(UserId::new(99)))
            .await
            .expect_err("fk violation");
        assert!(matches!(err, LoanRepositoryError::Query { .. }));
        assert_eq!(store.loan_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_emails_are_rejected_case_insensitively(store: InMemoryStore) {
        UserRepository::insert(&store, &new_user("ada@example.com"))
            .await
            .expect("first insert");
        let err = UserRepository::insert(&store, &new_user("ADA@example.com"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, UserRepositoryError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn mutations_report_missing_rows(store: InMemoryStore) {
        let missing = LoanId::new(404);
        assert!(
            !LoanRepository::update_status(&store, missing, LoanStatusId::APPROVED)
                .await
                .expect("update status")
        );
        assert!(!LoanRepository::delete(&store, missing).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_owner_filters_and_orders(store: InMemoryStore) {
        let ada = UserRepository::insert(&store, &new_user("ada@example.com"))
            .await
            .expect("ada");
        let grace = UserRepository::insert(&store, &new_user("grace@example.com"))
            .await
            .expect("grace");
        let first = LoanRepository::insert(&store, &new_loan(ada.id)).await.expect("loan");
        LoanRepository::insert(&store, &new_loan(grace.id))
            .await
            .expect("loan");
        let third = LoanRepository::insert(&store, &new_loan(ada.id)).await.expect("loan");

        let ids: Vec<_> = LoanRepository::find_by_owner(&store, ada.id)
            .await
            .expect("list")
            .into_iter()
            .map(|loan| loan.id)
            .collect();
        assert_eq!(ids, [first, third]);
    }
}
