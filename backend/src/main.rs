//! Backend entry-point: validates configuration, migrates the database and
//! serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::{AppConfig, ServerSettings, env_status};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::BuildMode;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let status = env_status(&env);
    if !status.ok {
        error!(missing = ?status.missing, "required environment variables are missing");
    }
    let app_config = AppConfig::from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("invalid application configuration")?;
    let settings = ServerSettings::load()
        .map_err(|err| eyre!("failed to load server settings: {err}"))?;
    info!(
        config = ?app_config,
        bind_addr = %settings.bind_addr(),
        session_key = %app_config.session().key_fingerprint(),
        "configuration resolved"
    );

    let database_url = app_config.database_url().to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("database migrations failed")?;

    let pool = DbPool::new(
        PoolConfig::new(app_config.database_url())
            .with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(&app_config, settings.bind_addr(), pool),
    )
    .wrap_err("failed to start http server")?;

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("http server terminated with an error")
}
