//! Embedded schema migrations.
//!
//! The SQL under `backend/migrations` is compiled into the binary so a fresh
//! database can be brought up to date at startup without the Diesel CLI.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations bundled with this build.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking migration task did not complete.
    #[error("migration task failed: {message}")]
    Task { message: String },
}

/// Apply every pending migration, returning the versions that ran.
///
/// Opens a dedicated synchronous connection; call from a blocking context.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection or any migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.iter().map(ToString::to_string).collect())
}

/// Run [`run_pending_migrations`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`MigrationError`] when migrating fails or the task panics.
pub async fn migrate(database_url: String) -> Result<(), MigrationError> {
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })??;

    if applied.is_empty() {
        info!("database schema is up to date");
    } else {
        info!(versions = ?applied, "applied database migrations");
    }
    Ok(())
}
