//! Contact book service library.
//!
//! A small REST API over contact records with optional avatar images,
//! organised as ports and adapters:
//!
//! - [`domain`]: contact values, the contact service and its ports.
//! - [`inbound`]: the actix-web HTTP adapter.
//! - [`outbound`]: Diesel/PostgreSQL, in-memory and filesystem adapters.
//! - [`middleware`]: request tracing and error envelopes.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
