//! Account service entry-point: loads settings, connects adapters and runs
//! the HTTP server.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::health::HealthState;
use accounts::inbound::http::session_config::{BuildMode, session_cookie_from_env};
use accounts::outbound::cache::RedisSessionStore;
use accounts::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let cookie = session_cookie_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session cookie settings")?;
    let session_ttl = settings.session_ttl()?;
    let mut config =
        ServerConfig::new(settings.bind_addr()?, cookie).with_session_ttl(session_ttl);

    if let Some(url) = settings.database_url.clone() {
        let migrate_url = url.clone();
        tokio::task::spawn_blocking(move || run_migrations(&migrate_url))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to run migrations")?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(url) = settings.redis_url.as_deref() {
        let store = RedisSessionStore::connect(url).wrap_err("invalid Redis URL")?;
        config = config.with_redis(store);
    }

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "account service listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}
