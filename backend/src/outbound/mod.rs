//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL contact storage through Diesel
//! - **memory**: process-local contact storage for database-less runs
//! - **uploads**: avatar files in a `cap_std` directory
//!
//! Adapters translate between domain types and their backing store and hold
//! no business rules.

pub mod memory;
pub mod persistence;
pub mod uploads;
