//! Contacts API handlers.
//!
//! ```text
//! GET    /api/v1/contacts?name=ann&favorite=true&page=1&limit=5
//! POST   /api/v1/contacts {"name":"Ada Lovelace","email":"ada@example.com"}
//! POST   /api/v1/contacts   (multipart form, optional avatarFile part)
//! DELETE /api/v1/contacts
//! GET    /api/v1/contacts/{id}
//! PUT    /api/v1/contacts/{id} {"favorite":true}
//! PUT    /api/v1/contacts/{id}   (multipart form, optional avatarFile part)
//! DELETE /api/v1/contacts/{id}
//! PUT    /api/v1/contacts/{id}/avatar   (raw image body)
//! DELETE /api/v1/contacts/{id}/avatar
//! ```
//!
//! Handlers are plain functions registered per resource so every path can
//! answer unsupported methods with 405; see [`configure`].

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, guard, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Contact, ContactChanges, ContactFilter, ContactId, Error, ImageKind, NewContact, non_blank,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::contact_form::{AvatarPart, ContactForm, is_multipart};
use crate::inbound::http::error::success;
use crate::inbound::http::fallback::method_not_allowed;
use crate::inbound::http::schemas::{
    ContactEnvelopeSchema, ContactListEnvelopeSchema, EmptyEnvelopeSchema, ErrorEnvelopeSchema,
    FailEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    empty_update_error, optional_name, parse_contact_id, require_name,
};

/// Base path of the contacts collection.
pub const CONTACTS_PATH: &str = "/api/v1/contacts";

/// Message returned when a contact id matches no record.
pub const CONTACT_NOT_FOUND_MESSAGE: &str = "Contact not found";

/// Request body for creating or updating a contact.
///
/// `name` is kept as raw JSON so a missing, non-string or blank name yields
/// the contact book's own validation message rather than a decoder error.
/// There is no `avatar` member: JSON clients upload avatars through the
/// avatar endpoint, and form clients send an `avatarFile` part.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[schema(value_type = Option<String>, example = "Ada Lovelace")]
    pub name: Option<Value>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub favorite: Option<bool>,
}

impl ContactRequest {
    fn into_new_contact(self) -> Result<NewContact, Error> {
        let name = require_name(self.name.as_ref())?;
        Ok(NewContact {
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            favorite: self.favorite.unwrap_or(false),
            ..NewContact::named(name)
        })
    }

    fn into_partial_changes(self) -> Result<ContactChanges, Error> {
        Ok(ContactChanges {
            name: optional_name(self.name.as_ref())?,
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            favorite: self.favorite,
            ..ContactChanges::default()
        })
    }

    fn into_changes(self) -> Result<ContactChanges, Error> {
        let changes = self.into_partial_changes()?;
        if changes.is_empty() {
            return Err(empty_update_error());
        }
        Ok(changes)
    }
}

/// Query parameters accepted by the list endpoint.
///
/// Values stay textual: unparsable `page` and `limit` fall back to their
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of the contact name.
    pub name: Option<String>,
    /// `true` restricts to favourites; absent, `false` or `0` lists all.
    pub favorite: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Page size (default 5).
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactData {
    contact: Contact,
}

fn contact_not_found() -> Error {
    Error::not_found(CONTACT_NOT_FOUND_MESSAGE)
}

fn contact_location(id: ContactId) -> String {
    format!("{CONTACTS_PATH}/{id}")
}

fn contact_response(contact: Contact) -> HttpResponse {
    HttpResponse::Ok().json(success(ContactData { contact }))
}

fn created_response(contact: Contact) -> HttpResponse {
    HttpResponse::Created()
        .insert_header((header::LOCATION, contact_location(contact.id)))
        .json(success(ContactData { contact }))
}

/// Image type declared by the request's `Content-Type`, parameters ignored.
fn image_kind(req: &HttpRequest) -> Result<ImageKind, Error> {
    let declared = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    avatar_kind(declared.split(';').next().unwrap_or_default())
}

/// Map a MIME essence onto a supported avatar image type.
pub(crate) fn avatar_kind(essence: &str) -> Result<ImageKind, Error> {
    ImageKind::from_mime(essence).ok_or_else(|| {
        Error::unsupported_media_type(format!(
            "Unsupported avatar content type '{}'; expected image/png, image/jpeg, image/gif or image/webp",
            essence.trim()
        ))
    })
}

/// List contacts, optionally filtered by name and favourite flag.
#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    params(ListQuery),
    responses(
        (status = 200, description = "A page of contacts", body = ContactListEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema),
        (status = 503, description = "Database unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let ListQuery {
        name,
        favorite,
        page,
        limit,
    } = query.into_inner();
    let filter = ContactFilter::from_query(
        name,
        favorite.as_deref(),
        page.as_deref(),
        limit.as_deref(),
    );
    let list = state
        .contacts_query
        .list(filter)
        .await
        .map_err(|err| err.in_context("An error occurred while retrieving contacts"))?;
    Ok(HttpResponse::Ok().json(success(list)))
}

/// Create a contact.
///
/// `multipart/form-data` bodies with the same members and an optional
/// `avatarFile` image part are accepted too.
#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactEnvelopeSchema,
            headers(("Location" = String, description = "URL of the new contact"))),
        (status = 400, description = "Invalid request", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
pub async fn create_contact(
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let new_contact = payload.into_inner().into_new_contact()?;
    let contact = state
        .contacts
        .create(new_contact)
        .await
        .map_err(|err| err.in_context(CREATE_FAILED_CONTEXT))?;
    Ok(created_response(contact))
}

const CREATE_FAILED_CONTEXT: &str = "An error occurred while creating the contact";

/// Create a contact from a form, storing an `avatarFile` part when present.
///
/// The stored file is discarded again if the contact cannot be created.
pub async fn create_contact_form(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let ContactForm { request, avatar } =
        ContactForm::read(payload, state.max_avatar_bytes).await?;
    let new_contact = request.into_new_contact()?;
    let created = match avatar {
        Some(AvatarPart { bytes, kind }) => {
            state
                .contacts
                .create_with_avatar(new_contact, bytes, kind)
                .await
        }
        None => state.contacts.create(new_contact).await,
    };
    let contact = created.map_err(|err| err.in_context(CREATE_FAILED_CONTEXT))?;
    Ok(created_response(contact))
}

/// Delete every contact and their avatar files.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts",
    responses(
        (status = 200, description = "All contacts deleted", body = EmptyEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteAllContacts"
)]
pub async fn delete_all_contacts(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state
        .contacts
        .delete_all()
        .await
        .map_err(|err| err.in_context("An error occurred while removing all contacts"))?;
    Ok(HttpResponse::Ok().json(success(())))
}

/// Fetch one contact.
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "The contact", body = ContactEnvelopeSchema),
        (status = 400, description = "Invalid identifier", body = FailEnvelopeSchema),
        (status = 404, description = "Contact not found", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "getContact"
)]
pub async fn get_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_contact_id(&path)?;
    let contact = state
        .contacts_query
        .get(id)
        .await
        .map_err(|err| err.in_context(format!("Error retrieving contact with id={id}")))?
        .ok_or_else(contact_not_found)?;
    Ok(contact_response(contact))
}

/// Partially update a contact. Omitted and blank members keep their value.
///
/// `multipart/form-data` bodies are accepted too; an `avatarFile` part
/// replaces the avatar.
#[utoipa::path(
    put,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact identifier")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Updated contact", body = ContactEnvelopeSchema),
        (status = 400, description = "Invalid request or nothing to update", body = FailEnvelopeSchema),
        (status = 404, description = "Contact not found", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
pub async fn update_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_contact_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let contact = state
        .contacts
        .update(id, changes)
        .await
        .map_err(|err| err.in_context(update_failed_context(id)))?
        .ok_or_else(contact_not_found)?;
    Ok(contact_response(contact))
}

fn update_failed_context(id: ContactId) -> String {
    format!("Error updating contact with id={id}")
}

/// Partially update a contact from a form.
///
/// An `avatarFile` part replaces the avatar and counts as a change on its
/// own; the previous file is reclaimed once the contact is updated.
pub async fn update_contact_form(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id = parse_contact_id(&path)?;
    let ContactForm { request, avatar } =
        ContactForm::read(payload, state.max_avatar_bytes).await?;
    let updated = match avatar {
        Some(AvatarPart { bytes, kind }) => {
            let changes = request.into_partial_changes()?;
            state
                .contacts
                .update_with_avatar(id, changes, bytes, kind)
                .await
        }
        None => {
            let changes = request.into_changes()?;
            state.contacts.update(id, changes).await
        }
    };
    let contact = updated
        .map_err(|err| err.in_context(update_failed_context(id)))?
        .ok_or_else(contact_not_found)?;
    Ok(contact_response(contact))
}

/// Delete one contact and its avatar file.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Contact deleted", body = EmptyEnvelopeSchema),
        (status = 400, description = "Invalid identifier", body = FailEnvelopeSchema),
        (status = 404, description = "Contact not found", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact"
)]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_contact_id(&path)?;
    state
        .contacts
        .delete(id)
        .await
        .map_err(|err| err.in_context(format!("Could not delete contact with id={id}")))?
        .ok_or_else(contact_not_found)?;
    Ok(HttpResponse::Ok().json(success(())))
}

/// Upload an avatar image and make it the contact's avatar.
///
/// The body is the raw image; its type comes from `Content-Type`. Any
/// previous avatar file is reclaimed after the contact is updated.
#[utoipa::path(
    put,
    path = "/api/v1/contacts/{id}/avatar",
    params(("id" = i64, Path, description = "Contact identifier")),
    request_body(
        content = Vec<u8>,
        content_type = "image/*",
        description = "Raw PNG, JPEG, GIF or WebP bytes"
    ),
    responses(
        (status = 200, description = "Contact with its new avatar", body = ContactEnvelopeSchema),
        (status = 400, description = "Invalid identifier or empty body", body = FailEnvelopeSchema),
        (status = 404, description = "Contact not found", body = FailEnvelopeSchema),
        (status = 413, description = "Image too large", body = FailEnvelopeSchema),
        (status = 415, description = "Unsupported image type", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "putContactAvatar"
)]
pub async fn put_avatar(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let id = parse_contact_id(&path)?;
    let kind = image_kind(&req)?;
    if body.is_empty() {
        return Err(Error::invalid_request("Avatar image body is empty"));
    }
    let contact = state
        .contacts
        .set_avatar(id, body.to_vec(), kind)
        .await
        .map_err(|err| err.in_context(format!("Error updating avatar of contact with id={id}")))?
        .ok_or_else(contact_not_found)?;
    Ok(contact_response(contact))
}

/// Remove a contact's avatar and reclaim its file.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}/avatar",
    params(("id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Contact without avatar", body = ContactEnvelopeSchema),
        (status = 400, description = "Invalid identifier", body = FailEnvelopeSchema),
        (status = 404, description = "Contact not found", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteContactAvatar"
)]
pub async fn delete_avatar(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_contact_id(&path)?;
    let contact = state
        .contacts
        .clear_avatar(id)
        .await
        .map_err(|err| err.in_context(format!("Error removing avatar of contact with id={id}")))?
        .ok_or_else(contact_not_found)?;
    Ok(contact_response(contact))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("Invalid JSON body: {err}")).into()
    })
}

/// Register the contact resources under `/api/v1`.
///
/// `max_avatar_bytes` bounds raw upload bodies; larger bodies are rejected
/// with 413 before a handler runs. Form uploads read their limit from
/// [`HttpState`]. Form routes are matched before the JSON ones on
/// `multipart/form-data` requests.
pub fn configure(cfg: &mut web::ServiceConfig, max_avatar_bytes: usize) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .service(
                web::resource("/contacts")
                    .route(web::get().to(list_contacts))
                    .route(
                        web::post()
                            .guard(guard::fn_guard(is_multipart))
                            .to(create_contact_form),
                    )
                    .route(web::post().to(create_contact))
                    .route(web::delete().to(delete_all_contacts))
                    .default_service(web::to(method_not_allowed(&["GET", "POST", "DELETE"]))),
            )
            .service(
                web::resource("/contacts/{id}")
                    .route(web::get().to(get_contact))
                    .route(
                        web::put()
                            .guard(guard::fn_guard(is_multipart))
                            .to(update_contact_form),
                    )
                    .route(web::put().to(update_contact))
                    .route(web::delete().to(delete_contact))
                    .default_service(web::to(method_not_allowed(&["GET", "PUT", "DELETE"]))),
            )
            .service(
                web::resource("/contacts/{id}/avatar")
                    .app_data(web::PayloadConfig::new(max_avatar_bytes))
                    .route(web::put().to(put_avatar))
                    .route(web::delete().to(delete_avatar))
                    .default_service(web::to(method_not_allowed(&["PUT", "DELETE"]))),
            ),
    );
}

#[cfg(test)]
#[path = "contacts_tests.rs"]
mod tests;
