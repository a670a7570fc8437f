//! Cross-origin access for browser clients.
//!
//! Any origin may call the API with any method and request header. Browsers
//! may read the `Location` and `Trace-Id` response headers.

use actix_cors::Cors;
use actix_web::http::header;

use crate::domain::TRACE_ID_HEADER;

/// Seconds a browser may cache a preflight answer.
pub const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// CORS middleware allowing every origin.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use contactbook::middleware::cors_layer;
///
/// let app = App::new().wrap(cors_layer());
/// ```
#[must_use]
pub fn cors_layer() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .expose_headers([header::LOCATION.as_str(), TRACE_ID_HEADER])
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}

#[cfg(test)]
mod tests {
    use actix_web::http::{Method, StatusCode};
    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    #[actix_web::test]
    async fn preflight_is_answered_for_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(cors_layer())
                .route("/things", web::delete().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/things")
                .insert_header((header::ORIGIN, "https://app.example"))
                .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_MAX_AGE)
                .and_then(|v| v.to_str().ok()),
            Some("3600")
        );
    }

    #[actix_web::test]
    async fn simple_requests_expose_location_and_trace_headers() {
        let app = test::init_service(
            App::new()
                .wrap(cors_layer())
                .route("/things", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/things")
                .insert_header((header::ORIGIN, "https://app.example"))
                .to_request(),
        )
        .await;

        let exposed = res
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(exposed.contains("location"));
        assert!(exposed.contains(TRACE_ID_HEADER));
    }

    #[actix_web::test]
    async fn requests_without_origin_pass_through() {
        let app = test::init_service(
            App::new()
                .wrap(cors_layer())
                .route("/things", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/things").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
