//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration, plus the response envelopes
//! every endpoint wraps its payload in.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes. They select the HTTP status and
/// envelope status but are not themselves serialised into responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The path exists but does not support the method.
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    /// The request body exceeds the accepted size.
    #[schema(rename = "payload_too_large")]
    PayloadTooLarge,
    /// The request body has an unsupported content type.
    #[schema(rename = "unsupported_media_type")]
    UnsupportedMediaType,
    /// A dependency such as the database is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Envelope for client errors (4xx).
#[derive(ToSchema)]
#[schema(as = FailEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FailEnvelopeSchema {
    /// Always `fail`.
    #[schema(example = "fail")]
    status: String,
    /// Human-readable reason.
    #[schema(example = "Contact not found")]
    message: String,
    /// Validation details when available.
    data: Option<serde_json::Value>,
}

/// Envelope for server errors (5xx).
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `error`.
    #[schema(example = "error")]
    status: String,
    /// Public description of the failed operation.
    #[schema(example = "An error occurred while creating the contact")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::Contact`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Contact)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactSchema {
    /// Storage-assigned identifier.
    #[schema(example = 1)]
    id: i64,
    /// Display name; never blank.
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: Option<String>,
    #[schema(example = "+44 20 7946 0000")]
    phone: Option<String>,
    address: Option<String>,
    favorite: bool,
    /// Public path of the avatar image.
    #[schema(example = "/public/uploads/6f1c0d0e-1d8e-4a55-9bde-3b6a1fa4c2f1.png")]
    avatar: Option<String>,
}

/// OpenAPI schema for [`pagination::PaginationMetadata`].
#[derive(ToSchema)]
#[schema(as = pagination::PaginationMetadata)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginationMetadataSchema {
    #[schema(example = 12)]
    total_records: u64,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 5)]
    limit: u32,
    #[schema(example = 1)]
    first_page: u32,
    #[schema(example = 3)]
    last_page: u64,
}

/// `data` member of a single-contact response.
#[derive(ToSchema)]
#[schema(as = ContactData)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactDataSchema {
    contact: ContactSchema,
}

/// Success envelope around one contact.
#[derive(ToSchema)]
#[schema(as = ContactEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactEnvelopeSchema {
    #[schema(example = "success")]
    status: String,
    data: ContactDataSchema,
}

/// `data` member of a list response.
#[derive(ToSchema)]
#[schema(as = ContactListData)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactListDataSchema {
    contacts: Vec<ContactSchema>,
    metadata: PaginationMetadataSchema,
}

/// Success envelope around a page of contacts.
#[derive(ToSchema)]
#[schema(as = ContactListEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactListEnvelopeSchema {
    #[schema(example = "success")]
    status: String,
    data: ContactListDataSchema,
}

/// Success envelope with `data: null`, returned by deletions.
#[derive(ToSchema)]
#[schema(as = EmptyEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmptyEnvelopeSchema {
    #[schema(example = "success")]
    status: String,
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
}
