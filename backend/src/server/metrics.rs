//! Optional Prometheus metrics middleware wrapper.
//!
//! `App::wrap` needs one concrete middleware type whether or not a registry
//! was configured, so [`MetricsLayer`] boxes either the Prometheus
//! middleware or a pass-through.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

type BoxedResponseService = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedResponseService;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            Self::Enabled(metrics) => {
                let fut = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move { Ok(boxed::service(fut.await?)) })
            }
            Self::Disabled => Box::pin(async move {
                let svc = service.map(ServiceResponse::map_into_boxed_body);
                Ok(boxed::service(svc))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use actix_web_prom::PrometheusMetricsBuilder;

    #[actix_web::test]
    async fn enabled_layer_serves_metrics_endpoint() {
        let metrics = PrometheusMetricsBuilder::new("contactbook_test")
            .endpoint("/metrics")
            .build()
            .expect("metrics should build for tests");
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(Some(metrics)))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        let app = test::init_service(
            App::new()
                .wrap(MetricsLayer::from_option(None))
                .route("/", web::get().to(|| async { HttpResponse::Ok().body("ok") })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await.as_ref(), b"ok");
    }
}
