//! Backend entry-point: loads settings, prepares persistence and runs the
//! HTTP server.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lms_backend::inbound::http::health::HealthState;
use lms_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use lms_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{AppSettings, ServerConfig, create_server, seed_demo_accounts};

fn io_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

/// Apply migrations then build the pool, or `None` without a database URL.
async fn prepare_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.clone() else {
        return Ok(None);
    };
    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(io_error)?
        .map_err(io_error)?;
    let config = PoolConfig::new(url).with_max_size(settings.db_max_connections);
    let pool = DbPool::new(config).await.map_err(io_error)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(io_error)?;
    let bind_addr = settings.bind_addr().map_err(io_error)?;
    let demo_password = settings.demo_password().map_err(io_error)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io_error)?;

    let db_pool = prepare_database(&settings).await?;
    let config = ServerConfig::new(session.key, session.cookie_secure, session.same_site, bind_addr)
        .with_db_pool(db_pool);

    let health_state = web::Data::new(HealthState::new());
    let (server, http_state) = create_server(health_state, config)?;
    if let Some(password) = demo_password {
        seed_demo_accounts(http_state.accounts.as_ref(), password).await?;
    }

    info!(%bind_addr, "lms backend listening");
    server.await
}
