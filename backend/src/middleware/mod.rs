//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route: the per-request
//! trace identifier, cross-origin access, and the failure envelope for
//! responses no handler rendered.

pub mod cors;
pub mod envelope;
pub mod trace;

pub use cors::cors_layer;
pub use envelope::ErrorEnvelope;
pub use trace::Trace;
