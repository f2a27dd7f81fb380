//! Backend entry-point: loads settings, prepares persistence, and serves the
//! REST API.

mod server;

use actix_web::rt::task::spawn_blocking;
use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scan_backend::inbound::http::health::HealthState;
use scan_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use scan_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Apply migrations and open the pool when a database URL is configured.
async fn connect_database(settings: &AppSettings) -> Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url() else {
        warn!("DATABASE_URL not set; running without persistence");
        return Ok(None);
    };

    let migration_url = database_url.clone();
    let applied = spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("failed to apply migrations")?;
    info!(count = applied.len(), "database migrations applied");

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_max_connections))
        .await
        .wrap_err("failed to build database pool")?;
    Ok(Some(pool))
}

#[cfg(feature = "metrics")]
fn metrics() -> Option<actix_web_prom::PrometheusMetrics> {
    server::metrics::build_metrics()
        .inspect_err(|err| warn!(error = %err, "metrics disabled"))
        .ok()
}

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

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let db_pool = connect_database(&settings).await?;

    let mut config = ServerConfig::new(bind_addr, settings);
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "scan backend listening");
    server.await?;
    Ok(())
}
