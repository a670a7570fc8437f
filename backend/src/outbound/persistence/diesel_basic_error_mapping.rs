//! Diesel and pool error mapping shared by the persistence adapters.
//!
//! Helpers take constructor closures so each repository can map into its own
//! port error without repeating the classification.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(%error, "database pool checkout failed");
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query or connection constructors.
///
/// Connection loss is reported through `connection`; every other failure,
/// including constraint violations, is a query error.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("contact violates a table constraint")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            query("concurrent update conflict")
        }
        _ => query("database error"),
    }
}
