//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and nothing more. Row structs (`models.rs`) and the table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool driven by `diesel-async`; schema changes ship as embedded migrations.
//!
//! ```ignore
//! use contactbook::outbound::persistence::{DbPool, DieselContactRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/contactbook")).await?;
//! let repo = DieselContactRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_contact_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use migrations::{MIGRATIONS, MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
