//! Port for avatar image files.
//!
//! Adapters confine every operation to the upload directory; callers pass
//! validated [`AvatarFileName`]s, never paths.

use async_trait::async_trait;

use crate::domain::{AvatarFileName, ImageKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by avatar store adapters.
    pub enum AvatarStoreError {
        /// No file with this name exists.
        NotFound { name: String } => "avatar file not found: {name}",
        /// The filesystem operation failed.
        Io { message: String } => "avatar store I/O failed: {message}",
    }
}

/// Port for storing, reading and deleting avatar files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Persist image bytes under a fresh name and return that name.
    async fn store(&self, bytes: Vec<u8>, kind: ImageKind)
    -> Result<AvatarFileName, AvatarStoreError>;

    /// Delete a stored file.
    async fn remove(&self, name: &AvatarFileName) -> Result<(), AvatarStoreError>;

    /// Read a stored file.
    async fn read(&self, name: &AvatarFileName) -> Result<Vec<u8>, AvatarStoreError>;
}

/// Fixture store that accepts writes, forgets them, and finds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAvatarStore;

#[async_trait]
impl AvatarStore for FixtureAvatarStore {
    async fn store(
        &self,
        _bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<AvatarFileName, AvatarStoreError> {
        Ok(AvatarFileName::generate(kind))
    }

    async fn remove(&self, _name: &AvatarFileName) -> Result<(), AvatarStoreError> {
        Ok(())
    }

    async fn read(&self, name: &AvatarFileName) -> Result<Vec<u8>, AvatarStoreError> {
        Err(AvatarStoreError::not_found(name.as_str()))
    }
}
