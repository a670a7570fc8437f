//! Unversioned endpoints: the welcome message and uploaded avatar files.
//!
//! ```text
//! GET /
//! GET /public/uploads/{file}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::domain::{AvatarFileName, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::success;
use crate::inbound::http::fallback::{RESOURCE_NOT_FOUND_MESSAGE, method_not_allowed};
use crate::inbound::http::state::HttpState;

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to the Contactbook API";

#[derive(Debug, Serialize)]
struct Welcome {
    message: &'static str,
}

/// API welcome message.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message")),
    tags = ["contacts"],
    operation_id = "welcome"
)]
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(success(Welcome {
        message: WELCOME_MESSAGE,
    }))
}

/// Serve an uploaded avatar image.
///
/// Only plain file names with an image extension are served; anything
/// else, path traversal attempts included, is a plain 404.
#[utoipa::path(
    get,
    path = "/public/uploads/{file}",
    params(("file" = String, Path, description = "Avatar file name")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 404, description = "No such upload")
    ),
    tags = ["contacts"],
    operation_id = "getUpload"
)]
pub async fn serve_upload(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = AvatarFileName::new(path.into_inner())
        .map_err(|_| Error::not_found(RESOURCE_NOT_FOUND_MESSAGE))?;
    let kind = name
        .kind()
        .ok_or_else(|| Error::not_found(RESOURCE_NOT_FOUND_MESSAGE))?;
    let bytes = state.contacts_query.avatar(&name).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, kind.mime()))
        .body(bytes))
}

/// Register the welcome and upload resources.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(welcome))
            .default_service(web::to(method_not_allowed(&["GET"]))),
    )
    .service(
        web::resource("/public/uploads/{file}")
            .route(web::get().to(serve_upload))
            .default_service(web::to(method_not_allowed(&["GET"]))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{FixtureContactsCommand, MockContactsQuery};
    use crate::middleware::ErrorEnvelope;

    fn state_with(query: MockContactsQuery) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(FixtureContactsCommand),
            Arc::new(query),
        ))
    }

    #[actix_web::test]
    async fn welcome_wraps_message_in_success_envelope() {
        let app = test::init_service(App::new().configure(configure)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"status": "success", "data": {"message": "Welcome to the Contactbook API"}})
        );
    }

    #[actix_web::test]
    async fn serves_stored_upload_with_its_content_type() {
        let name = AvatarFileName::new("0b0c5b6e-8f4e-4d54-9d8e-2a4a3e0f1b2c.png")
            .expect("valid avatar name");
        let mut query = MockContactsQuery::new();
        query
            .expect_avatar()
            .with(eq(name.clone()))
            .times(1)
            .return_once(|_| Ok(vec![0x89, b'P', b'N', b'G']));
        let app = test::init_service(
            App::new()
                .app_data(state_with(query))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&name.public_path())
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
        assert_eq!(test::read_body(res).await.as_ref(), &[0x89, b'P', b'N', b'G']);
    }

    #[rstest]
    #[case("/public/uploads/notes.txt")]
    #[case("/public/uploads/..%2Fsecret.png")]
    #[actix_web::test]
    async fn unknown_upload_names_are_not_found(#[case] uri: &str) {
        let mut query = MockContactsQuery::new();
        query.expect_avatar().never();
        let app = test::init_service(
            App::new()
                .wrap(ErrorEnvelope)
                .app_data(state_with(query))
                .configure(configure),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"status": "fail", "message": "Resource not found"}));
    }

    #[actix_web::test]
    async fn posting_to_root_is_method_not_allowed() {
        let app = test::init_service(App::new().configure(configure)).await;

        let res = test::call_service(&app, test::TestRequest::post().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            res.headers().get(header::ALLOW).and_then(|v| v.to_str().ok()),
            Some("GET")
        );
    }
}
