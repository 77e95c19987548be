//! Builders wiring repositories into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use lms_backend::domain::ports::{AccountRegistration, LoanRepository, UserRepository};
use lms_backend::domain::{AccountService, ErrorCode, LoanService, Registration, RegistrationParts};
use lms_backend::inbound::http::state::{HttpState, HttpStatePorts};
use lms_backend::outbound::memory::InMemoryStore;
use lms_backend::outbound::persistence::{DbPool, DieselLoanRepository, DieselUserRepository};

use super::ServerConfig;

/// Build the account and loan services over one loan and one user repository.
fn ports_for<L, U>(loans: Arc<L>, users: Arc<U>) -> HttpStatePorts
where
    L: LoanRepository + 'static,
    U: UserRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users.clone()));
    let loan_service = Arc::new(LoanService::new(loans, users));
    HttpStatePorts {
        login: accounts.clone(),
        accounts,
        loans: loan_service.clone(),
        loans_query: loan_service,
    }
}

/// Choose Diesel adapters when a pool is configured, else the in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool),
        None => {
            warn!("no database configured; loans and accounts are kept in memory");
            let store = Arc::new(InMemoryStore::new());
            ports_for(store.clone(), store)
        }
    };
    web::Data::new(HttpState::new(ports))
}

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    ports_for(
        Arc::new(DieselLoanRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
    )
}

struct DemoAccount {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role_id: i64,
}

const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "manager@example.com",
        first_name: "Grace",
        last_name: "Hopper",
        role_id: 1,
    },
    DemoAccount {
        email: "customer@example.com",
        first_name: "Ada",
        last_name: "Lovelace",
        role_id: 2,
    },
];

/// Register the demo manager and customer, skipping ones that already exist.
pub(crate) async fn seed_demo_accounts(
    accounts: &dyn AccountRegistration,
    password: &str,
) -> std::io::Result<()> {
    for demo in DEMO_ACCOUNTS {
        let registration = Registration::try_from_parts(RegistrationParts {
            email: demo.email,
            password,
            first_name: demo.first_name,
            last_name: demo.last_name,
            phone: "",
            role_id: demo.role_id,
        })
        .map_err(|err| std::io::Error::other(format!("invalid demo account: {err}")))?;

        match accounts.register(registration).await {
            Ok(user) => info!(user_id = %user.id, email = demo.email, "demo account seeded"),
            Err(err) if err.code() == ErrorCode::InvalidRequest => {
                info!(email = demo.email, "demo account already present");
            }
            Err(err) => {
                return Err(std::io::Error::other(format!(
                    "failed to seed demo account {}: {err}",
                    demo.email
                )));
            }
        }
    }
    Ok(())
}
