//! Shared helpers for the embedded PostgreSQL integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! helpers used by more than one suite live here.

pub mod cluster_skip;
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;

use contactbook::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

/// Render a `postgres` error with enough detail to be useful in CI logs.
///
/// `postgres::Error`'s `Display` often collapses database errors to a
/// generic `db error`; `as_db_error()` keeps the message and SQLSTATE.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Drop and recreate `name`, then apply the embedded migrations to it.
///
/// Uses `postgres` rather than Diesel so `DROP DATABASE` runs outside a
/// transaction. Returns the database URL.
pub fn fresh_database(cluster: &TestCluster, name: &str) -> Result<String, String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))?;

    let url = cluster.connection().database_url(name);
    run_pending_migrations(&url).map_err(|err| err.to_string())?;
    Ok(url)
}
