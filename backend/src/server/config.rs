//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use contactbook::inbound::http::state::DEFAULT_MAX_AVATAR_BYTES;
use contactbook::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) uploads_dir: PathBuf,
    pub(crate) max_avatar_bytes: usize,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration listening on `bind_addr` and storing
    /// avatars under `uploads_dir`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            uploads_dir: uploads_dir.into(),
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one, contacts are kept in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the avatar upload ceiling.
    #[must_use]
    pub fn with_max_avatar_bytes(mut self, limit: usize) -> Self {
        self.max_avatar_bytes = limit;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the directory avatars are written to.
    #[must_use]
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    #[cfg(feature = "metrics")]
    /// Return the configured Prometheus middleware, if any.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests behind feature flags")
    )]
    #[must_use]
    pub fn metrics(&self) -> Option<&PrometheusMetrics> {
        self.prometheus.as_ref()
    }
}
