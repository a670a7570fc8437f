//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use cap_std::{ambient_authority, fs::Dir};
use tempfile::TempDir;

use crate::Trace;
use crate::domain::ContactService;
use crate::inbound::http::fallback::not_found;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;
use crate::middleware::{ErrorEnvelope, cors_layer};
use crate::outbound::memory::InMemoryContactRepository;
use crate::outbound::uploads::CapStdAvatarStore;

/// Contact book backed by the in-memory repository and a temporary upload
/// directory that lives as long as this value.
pub struct TestBook {
    pub state: web::Data<HttpState>,
    pub store: Arc<CapStdAvatarStore>,
    service: Arc<ContactService<InMemoryContactRepository, CapStdAvatarStore>>,
    _uploads: TempDir,
}

impl TestBook {
    /// Fresh, empty contact book.
    pub fn new() -> Self {
        let uploads = TempDir::new().expect("create upload dir");
        let store = Arc::new(CapStdAvatarStore::open(uploads.path()).expect("open upload dir"));
        let service = Arc::new(ContactService::new(
            Arc::new(InMemoryContactRepository::new()),
            Arc::clone(&store),
        ));
        Self {
            state: web::Data::new(HttpState::from_service(Arc::clone(&service))),
            store,
            service,
            _uploads: uploads,
        }
    }

    /// Wait for avatar files queued for reclamation to be removed.
    pub async fn settled(&self) {
        self.service.settled().await;
    }

    /// Number of files currently in the upload directory.
    pub fn stored_files(&self) -> usize {
        Dir::open_ambient_dir(self.store.root(), ambient_authority())
            .expect("open upload dir")
            .entries()
            .expect("list upload dir")
            .count()
    }

    /// Limit avatar uploads to `limit` bytes.
    pub fn with_max_avatar_bytes(mut self, limit: usize) -> Self {
        let state = self.state.get_ref().clone().with_max_avatar_bytes(limit);
        self.state = web::Data::new(state);
        self
    }
}

/// App wired like the server: tracing, envelopes, CORS, all routes and the
/// 404 fallback.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let max_avatar_bytes = state.max_avatar_bytes;
    App::new()
        .app_data(state)
        .app_data(web::Data::new(HealthState::new()))
        .wrap(cors_layer())
        .wrap(ErrorEnvelope)
        .wrap(Trace)
        .configure(|cfg| super::configure(cfg, max_avatar_bytes))
        .default_service(web::to(not_found))
}
