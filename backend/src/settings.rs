//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CONTACTBOOK_*` environment variables and an
//! optional configuration file, in OrthoConfig's usual precedence.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::state::DEFAULT_MAX_AVATAR_BYTES;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_UPLOADS_DIR: &str = "public/uploads";

/// Runtime configuration for the contact book server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTACTBOOK")]
pub struct AppSettings {
    /// Interface to listen on.
    pub bind_host: Option<String>,
    /// Port to listen on.
    #[ortho_config(default = 3000)]
    pub port: u16,
    /// PostgreSQL connection URL. Without it contacts live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Directory avatar uploads are written to.
    pub uploads_dir: Option<PathBuf>,
    /// Largest accepted avatar upload in bytes.
    #[ortho_config(default = 5_242_880)]
    pub max_avatar_bytes: usize,
    /// Apply pending migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Interface to listen on, `0.0.0.0` unless configured.
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Upload directory, `public/uploads` unless configured.
    pub fn uploads_dir(&self) -> &Path {
        self.uploads_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_UPLOADS_DIR))
    }

    /// Resolve the listen address from host and port.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the host does not resolve.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        (self.bind_host(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("bind host {} did not resolve", self.bind_host()),
                )
            })
    }

    /// Avatar size ceiling, never zero.
    pub fn max_avatar_bytes(&self) -> usize {
        if self.max_avatar_bytes == 0 {
            DEFAULT_MAX_AVATAR_BYTES
        } else {
            self.max_avatar_bytes
        }
    }
}
