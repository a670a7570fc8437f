//! Contact book entry-point: loads settings, prepares storage and serves the
//! REST API.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contactbook::inbound::http::health::HealthState;
use contactbook::outbound::persistence::{DbPool, PoolConfig, migrate};
use contactbook::settings::AppSettings;
use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(bind_addr, settings.uploads_dir())
        .with_max_avatar_bytes(settings.max_avatar_bytes());
    if let Some(database_url) = settings.database_url.clone() {
        config = config.with_db_pool(prepare_database(&settings, database_url).await?);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("contactbook")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "contact book listening");
    server.await
}

/// Apply migrations when enabled, then build the connection pool.
async fn prepare_database(
    settings: &AppSettings,
    database_url: String,
) -> std::io::Result<DbPool> {
    if settings.run_migrations {
        migrate(database_url.clone())
            .await
            .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    }
    let pool_config = PoolConfig::new(database_url).with_max_size(settings.db_max_connections);
    DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool creation failed: {e}")))
}

/// Build Prometheus metrics, logging and continuing without them on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<E, F>(build: F) -> Option<PrometheusMetrics>
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<PrometheusMetrics, E>,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "Prometheus metrics disabled");
            None
        }
    }
}
