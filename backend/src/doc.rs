//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every contacts endpoint, the welcome and upload resources,
//!   and the health probes
//! - **Schemas**: domain type wrappers and the success/failure envelopes
//!   from [`crate::inbound::http::schemas`], which provide OpenAPI
//!   definitions without coupling domain types to the utoipa framework
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::contacts::ContactRequest;
use crate::inbound::http::schemas::{
    ContactDataSchema, ContactEnvelopeSchema, ContactListDataSchema, ContactListEnvelopeSchema,
    ContactSchema, EmptyEnvelopeSchema, ErrorCodeSchema, ErrorEnvelopeSchema, FailEnvelopeSchema,
    PaginationMetadataSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contactbook API",
        description = "Contacts with optional avatar images, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::public::welcome,
        crate::inbound::http::public::serve_upload,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::delete_all_contacts,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::contacts::put_avatar,
        crate::inbound::http::contacts::delete_avatar,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ContactRequest,
        ContactSchema,
        ContactDataSchema,
        ContactEnvelopeSchema,
        ContactListDataSchema,
        ContactListEnvelopeSchema,
        PaginationMetadataSchema,
        EmptyEnvelopeSchema,
        FailEnvelopeSchema,
        ErrorEnvelopeSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "contacts", description = "Contact records and avatar uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
