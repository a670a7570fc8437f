//! Health endpoints: liveness and readiness probes for orchestration.
//!
//! ```text
//! GET /health/ready
//! GET /health/live
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, http::header, web};

/// Readiness and liveness flags shared with the server bootstrap.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready to take traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes, e.g. while draining for shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe: 200 once the server is accepting traffic, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 405, description = "Method not allowed; only GET probes are supported"),
        (status = 503, description = "Server is not ready")
    )
)]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe: 200 while the process is marked alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 405, description = "Method not allowed; only GET probes are supported"),
        (status = 503, description = "Server is shutting down")
    )
)]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    use crate::inbound::http::fallback::method_not_allowed;

    async fn probe(state: web::Data<HealthState>, uri: &str) -> StatusCode {
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(
                    web::resource("/health/ready")
                        .route(web::get().to(ready))
                        .default_service(web::to(method_not_allowed(&["GET"]))),
                )
                .service(web::resource("/health/live").route(web::get().to(live))),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
        res.status()
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_state() {
        let state = web::Data::new(HealthState::new());
        assert_eq!(probe(state.clone(), "/health/ready").await, StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        assert_eq!(probe(state, "/health/ready").await, StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_once_unhealthy() {
        let state = web::Data::new(HealthState::new());
        assert_eq!(probe(state.clone(), "/health/live").await, StatusCode::OK);

        state.mark_unhealthy();
        assert_eq!(probe(state, "/health/live").await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    fn probe_responses_are_not_cached() {
        let response = HealthState::probe_response(true);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }
}
