//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope. An error carries a
//! public message for clients and, separately, an optional internal cause
//! that adapters log but never render.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The path exists but does not accept the request method.
    MethodNotAllowed,
    /// The request body exceeds the configured size limit.
    PayloadTooLarge,
    /// The request body has a content type the endpoint cannot accept.
    UnsupportedMediaType,
    /// A dependency (such as the database) is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// Whether the failure is attributable to the server rather than the client.
    #[must_use]
    pub fn is_server_error(self) -> bool {
        matches!(self, Self::ServiceUnavailable | Self::InternalError)
    }

    /// Message used when a caller supplies a blank one.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Bad request",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "Method not allowed",
            Self::PayloadTooLarge => "Payload too large",
            Self::UnsupportedMediaType => "Unsupported media type",
            Self::ServiceUnavailable => "Service unavailable",
            Self::InternalError => "Internal Server Error",
        }
    }
}

type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `internal` and `cause` are diagnostic only; adapters must not expose them.
///
/// # Examples
/// ```
/// use contactbook::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Contact not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Contact not found");
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
    allowed_methods: Vec<String>,
    internal: Option<String>,
    cause: Option<Cause>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was empty once trimmed.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Create a new error.
    ///
    /// Captures the current trace identifier if one is in scope. A blank
    /// message is replaced with [`ErrorCode::default_message`].
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match Self::try_new(code, message) {
            Ok(error) => error,
            Err(_) => Self::build(code, code.default_message().to_owned()),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::build(code, message))
    }

    fn build(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
            allowed_methods: Vec::new(),
            internal: None,
            cause: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier captured when the error was created.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Methods the resource accepts; populated for
    /// [`ErrorCode::MethodNotAllowed`].
    #[must_use]
    pub fn allowed_methods(&self) -> &[String] {
        &self.allowed_methods
    }

    /// Diagnostic message superseded by [`Error::in_context`].
    #[must_use]
    pub fn internal_message(&self) -> Option<&str> {
        self.internal.as_deref()
    }

    /// Underlying failure, for logging.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use contactbook::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a trace identifier, replacing any captured one.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach a trace identifier, rejecting blank values.
    pub fn try_with_trace_id(self, id: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(id))
    }

    /// Record the failure that produced this error.
    #[must_use]
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Replace the public message of a server-side error with `context`.
    ///
    /// The previous message is retained as [`Error::internal_message`] and
    /// structured details are dropped so neither reaches clients. Client
    /// errors are returned unchanged.
    ///
    /// # Examples
    /// ```
    /// use contactbook::domain::Error;
    ///
    /// let err = Error::internal("contact repository error: database error")
    ///     .in_context("An error occurred while creating the contact");
    /// assert_eq!(err.message(), "An error occurred while creating the contact");
    /// assert_eq!(
    ///     err.internal_message(),
    ///     Some("contact repository error: database error"),
    /// );
    /// ```
    #[must_use]
    pub fn in_context(mut self, context: impl Into<String>) -> Self {
        if !self.code.is_server_error() {
            return self;
        }
        let context = context.into();
        if context.trim().is_empty() {
            return self;
        }
        let previous = std::mem::replace(&mut self.message, context);
        self.internal = Some(match self.internal.take() {
            Some(earlier) => format!("{previous}: {earlier}"),
            None => previous,
        });
        self.details = None;
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::MethodNotAllowed`].
    pub fn method_not_allowed<I, M>(message: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let mut error = Self::new(ErrorCode::MethodNotAllowed, message);
        error.allowed_methods = allowed.into_iter().map(Into::into).collect();
        error
    }

    /// Convenience constructor for [`ErrorCode::PayloadTooLarge`].
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    /// Convenience constructor for [`ErrorCode::UnsupportedMediaType`].
    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedMediaType, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
