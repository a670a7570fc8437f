//! Middleware that wraps stray error responses in the failure envelope.
//!
//! Handler errors are rendered by `ResponseError for Error` and tagged with
//! [`EnvelopeWritten`]. Anything else that produces a 4xx or 5xx (extractor
//! rejections, payload limits, framework defaults) reaches this layer
//! untagged and is re-rendered once as a domain [`Error`].

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::ResponseError as _;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::Error as DomainError;
use crate::inbound::http::error::{EnvelopeWritten, code_for};

/// Rewrites untagged error responses into envelopes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use contactbook::middleware::ErrorEnvelope;
///
/// let app = App::new().wrap(ErrorEnvelope);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorEnvelope;

impl<S, B> Transform<S, ServiceRequest> for ErrorEnvelope
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorEnvelopeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorEnvelopeMiddleware { service }))
    }
}

/// Service wrapper produced by [`ErrorEnvelope`].
pub struct ErrorEnvelopeMiddleware<S> {
    service: S,
}

/// Domain error equivalent to an untagged failure response.
fn envelope_error<B>(res: &ServiceResponse<B>) -> DomainError {
    let status = res.status();
    let code = code_for(status);
    match res.response().error() {
        Some(error) if !code.is_server_error() => DomainError::new(code, error.to_string()),
        _ => DomainError::new(code, code.default_message()),
    }
}

impl<S, B> Service<ServiceRequest> for ErrorEnvelopeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let failed = status.is_client_error() || status.is_server_error();
            if !failed || res.response().extensions().contains::<EnvelopeWritten>() {
                return Ok(res.map_into_boxed_body());
            }

            let error = envelope_error(&res);
            let mut rendered = error.error_response();
            // Keep headers such as `Allow` set by the framework.
            for (name, value) in res.headers() {
                if !rendered.headers().contains_key(name) {
                    rendered.headers_mut().insert(name.clone(), value.clone());
                }
            }
            Ok(res.into_response(rendered))
        })
    }
}
