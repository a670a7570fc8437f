//! `multipart/form-data` bodies for the contact create and update routes.
//!
//! Browser forms post contact members as text parts and the avatar image as
//! an `avatarFile` part. Text parts fill a [`ContactRequest`] so forms go
//! through the same validation as JSON bodies. Parts with other names are
//! skipped.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::guard::GuardContext;
use actix_web::http::header;
use futures_util::TryStreamExt;
use serde_json::Value;

use crate::domain::{Error, ImageKind};
use crate::inbound::http::contacts::{ContactRequest, avatar_kind};
use crate::inbound::http::validation::parse_favorite;

/// Form part carrying the avatar image.
pub const AVATAR_FIELD: &str = "avatarFile";

/// Ceiling for a single text part.
const MAX_TEXT_PART_BYTES: usize = 16 * 1024;

/// Avatar image received in a form, not yet stored.
#[derive(Debug)]
pub(crate) struct AvatarPart {
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
}

/// Decoded contact form.
#[derive(Debug, Default)]
pub(crate) struct ContactForm {
    pub request: ContactRequest,
    pub avatar: Option<AvatarPart>,
}

/// Route guard matching `multipart/form-data` requests.
pub(crate) fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

fn malformed(err: MultipartError) -> Error {
    Error::invalid_request(format!("Invalid multipart body: {err}"))
}

async fn read_part(field: &mut Field, limit: usize, too_large: Error) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(too_large);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, Error> {
    let too_large = Error::payload_too_large(format!(
        "Form field '{name}' exceeds {MAX_TEXT_PART_BYTES} bytes"
    ));
    let bytes = read_part(field, MAX_TEXT_PART_BYTES, too_large).await?;
    String::from_utf8(bytes)
        .map_err(|_| Error::invalid_request(format!("Form field '{name}' is not valid UTF-8")))
}

async fn read_avatar(field: &mut Field, max_bytes: usize) -> Result<Option<AvatarPart>, Error> {
    let declared = field
        .content_type()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    let too_large = Error::payload_too_large(format!("Avatar image exceeds {max_bytes} bytes"));
    let bytes = read_part(field, max_bytes, too_large).await?;
    // Browsers send an empty part when no file was chosen.
    if bytes.is_empty() {
        return Ok(None);
    }
    let kind = avatar_kind(&declared)?;
    Ok(Some(AvatarPart { bytes, kind }))
}

impl ContactForm {
    /// Drain `payload` into a form, rejecting avatar parts above
    /// `max_avatar_bytes`.
    pub(crate) async fn read(
        mut payload: Multipart,
        max_avatar_bytes: usize,
    ) -> Result<Self, Error> {
        let mut form = Self::default();
        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                AVATAR_FIELD => form.avatar = read_avatar(&mut field, max_avatar_bytes).await?,
                "name" => {
                    form.request.name = Some(Value::String(read_text(&mut field, &name).await?));
                }
                "email" => form.request.email = Some(read_text(&mut field, &name).await?),
                "phone" => form.request.phone = Some(read_text(&mut field, &name).await?),
                "address" => form.request.address = Some(read_text(&mut field, &name).await?),
                "favorite" => {
                    form.request.favorite = parse_favorite(&read_text(&mut field, &name).await?)?;
                }
                _ => {}
            }
        }
        Ok(form)
    }
}
