//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while turning handler
//! failures into the contact book's JSend-style envelopes:
//!
//! - 4xx: `{"status":"fail","message":...,"data":<details>?}`
//! - 5xx: `{"status":"error","message":...}`, where the message is the public
//!   context attached with [`Error::in_context`] or the code's default text.
//!
//! Every rendered response carries the [`EnvelopeWritten`] extension so the
//! `ErrorEnvelope` middleware leaves it alone.

use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Response extension marking a body that is already an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeWritten;

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    status: &'static str,
    data: T,
}

/// Wrap handler output in a success envelope.
pub fn success<T: Serialize>(data: T) -> Success<T> {
    Success {
        status: "success",
        data,
    }
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    status: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Closest error code for a bare HTTP status.
pub(crate) fn code_for(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::METHOD_NOT_ALLOWED => ErrorCode::MethodNotAllowed,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorCode::PayloadTooLarge,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ErrorCode::UnsupportedMediaType,
        StatusCode::SERVICE_UNAVAILABLE => ErrorCode::ServiceUnavailable,
        other if other.is_client_error() => ErrorCode::InvalidRequest,
        _ => ErrorCode::InternalError,
    }
}

/// Message a client may see for this error.
fn public_message(error: &Error) -> &str {
    if !error.code().is_server_error() || error.internal_message().is_some() {
        error.message()
    } else {
        error.code().default_message()
    }
}

fn log_error(error: &Error, status: StatusCode) {
    if error.code().is_server_error() {
        error!(
            status = status.as_u16(),
            code = ?error.code(),
            message = error.message(),
            internal = error.internal_message(),
            cause = ?error.cause().map(ToString::to_string),
            details = ?error.details(),
            trace_id = error.trace_id(),
            "request failed"
        );
    } else {
        debug!(
            status = status.as_u16(),
            code = ?error.code(),
            message = error.message(),
            trace_id = error.trace_id(),
            "request rejected"
        );
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        log_error(self, status);

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() == ErrorCode::MethodNotAllowed && !self.allowed_methods().is_empty() {
            if let Ok(allow) = HeaderValue::from_str(&self.allowed_methods().join(", ")) {
                builder.insert_header((header::ALLOW, allow));
            }
        }

        let body = if self.code().is_server_error() {
            Failure {
                status: "error",
                message: public_message(self),
                data: None,
            }
        } else {
            Failure {
                status: "fail",
                message: self.message(),
                data: self.details(),
            }
        };

        let mut response = builder.json(body);
        response.extensions_mut().insert(EnvelopeWritten);
        response
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        let status = err.as_response_error().status_code();
        let code = code_for(status);
        if code.is_server_error() {
            // Do not leak implementation details to clients.
            error!(error = %err, "actix error promoted to domain error");
            Self::new(code, code.default_message())
        } else {
            Self::new(code, err.to_string())
        }
    }
}
