//! Builds the HTTP adapter state from server configuration.

use std::io;
use std::sync::Arc;

use tracing::{info, warn};

use contactbook::domain::ContactService;
use contactbook::inbound::http::state::HttpState;
use contactbook::outbound::memory::InMemoryContactRepository;
use contactbook::outbound::persistence::DieselContactRepository;
use contactbook::outbound::uploads::CapStdAvatarStore;

use super::ServerConfig;

/// Wire the contact service over the configured repository and upload
/// directory.
///
/// Uses the Diesel repository when a pool is configured; otherwise falls back
/// to the in-memory repository and says so in the log.
///
/// # Errors
/// Returns [`io::Error`] when the upload directory cannot be created or
/// opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let store = Arc::new(CapStdAvatarStore::open(config.uploads_dir()).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!(
                "failed to open upload directory {}: {err}",
                config.uploads_dir().display()
            ),
        )
    })?);
    info!(uploads_dir = %store.root().display(), "avatar uploads enabled");

    let state = match &config.db_pool {
        Some(pool) => {
            let repo = Arc::new(DieselContactRepository::new(pool.clone()));
            HttpState::from_service(Arc::new(ContactService::new(repo, store)))
        }
        None => {
            warn!("no database configured; contacts are kept in memory and lost on restart");
            let repo = Arc::new(InMemoryContactRepository::new());
            HttpState::from_service(Arc::new(ContactService::new(repo, store)))
        }
    };
    Ok(state.with_max_avatar_bytes(config.max_avatar_bytes))
}

#[cfg(test)]
mod tests {
    //! Tests for HTTP state wiring.

    use super::*;
    use contactbook::domain::{ContactFilter, ContactName, NewContact};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[tokio::test]
    async fn without_pool_contacts_are_kept_in_memory() {
        let uploads = TempDir::new().expect("temp dir");
        let config = ServerConfig::new(([127, 0, 0, 1], 0).into(), uploads.path().join("avatars"))
            .with_max_avatar_bytes(1024);

        let state = build_http_state(&config).expect("state builds");
        state
            .contacts
            .create(NewContact::named(
                ContactName::new("Ada").expect("valid name"),
            ))
            .await
            .expect("create succeeds");
        let list = state
            .contacts_query
            .list(ContactFilter::default())
            .await
            .expect("list succeeds");

        assert_eq!(list.metadata.total_records, 1);
        assert_eq!(state.max_avatar_bytes, 1024);
        assert!(
            cap_std::fs::Dir::open_ambient_dir(
                uploads.path().join("avatars"),
                cap_std::ambient_authority()
            )
            .is_ok()
        );
    }

    #[rstest]
    fn unusable_upload_directory_is_an_error() {
        let uploads = TempDir::new().expect("temp dir");
        let blocker = uploads.path().join("file");
        cap_std::fs::Dir::open_ambient_dir(uploads.path(), cap_std::ambient_authority())
            .and_then(|dir| dir.write("file", b"x"))
            .expect("create blocking file");
        let config = ServerConfig::new(([127, 0, 0, 1], 0).into(), blocker.join("nested"));

        assert!(build_http_state(&config).is_err());
    }
}
