//! Synthetic 404 and 405 responses for requests no handler accepts.

use std::future::{Ready, ready};

use actix_web::{HttpRequest, HttpResponse};

use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// Message for paths that match no route.
pub const RESOURCE_NOT_FOUND_MESSAGE: &str = "Resource not found";

/// App-level default service: any unknown path is a 404.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found(RESOURCE_NOT_FOUND_MESSAGE))
}

/// Resource-level default service rejecting methods outside `allowed`.
///
/// The error message names the method and path; the `Allow` header lists
/// `allowed`.
pub fn method_not_allowed(
    allowed: &'static [&'static str],
) -> impl Fn(HttpRequest) -> Ready<ApiResult<HttpResponse>> + Clone + 'static {
    move |req: HttpRequest| {
        let message = format!("{} method not allowed for {}", req.method(), req.path());
        ready(Err(Error::method_not_allowed(
            message,
            allowed.iter().copied(),
        )))
    }
}
