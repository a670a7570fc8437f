//! HTTP inbound adapter exposing REST endpoints.

pub mod contact_form;
pub mod contacts;
pub mod error;
pub mod fallback;
pub mod health;
pub mod public;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

use crate::inbound::http::fallback::method_not_allowed;

/// Register every HTTP resource: welcome, uploads, contacts and probes.
///
/// Callers supply `web::Data<HttpState>` and `web::Data<HealthState>` and
/// should install [`fallback::not_found`] as the app's default service.
pub fn configure(cfg: &mut web::ServiceConfig, max_avatar_bytes: usize) {
    public::configure(cfg);
    contacts::configure(cfg, max_avatar_bytes);
    cfg.service(
        web::resource("/health/ready")
            .route(web::get().to(health::ready))
            .default_service(web::to(method_not_allowed(&["GET"]))),
    )
    .service(
        web::resource("/health/live")
            .route(web::get().to(health::live))
            .default_service(web::to(method_not_allowed(&["GET"]))),
    );
}
