//! Avatar files on the local filesystem.
//!
//! [`CapStdAvatarStore`] holds a `cap_std` handle to the upload directory, so
//! no operation can escape it whatever name it is given. File I/O runs on the
//! blocking thread pool. Writes land under a hidden staging name first and
//! are renamed into place, so readers never observe a partial image.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{AvatarStore, AvatarStoreError};
use crate::domain::{AvatarFileName, ImageKind};

/// `AvatarStore` rooted at a directory on disk.
#[derive(Clone)]
pub struct CapStdAvatarStore {
    dir: Arc<Dir>,
    root: PathBuf,
}

impl CapStdAvatarStore {
    /// Open the upload directory, creating it and its parents when missing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            root: path.to_path_buf(),
        })
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

async fn blocking<T, F>(task: F) -> io::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| io::Error::other(format!("blocking file task failed: {err}")))?
}

fn map_io_error(name: &AvatarFileName, error: &io::Error) -> AvatarStoreError {
    if error.kind() == io::ErrorKind::NotFound {
        AvatarStoreError::not_found(name.as_str())
    } else {
        AvatarStoreError::io(format!("{name}: {error}"))
    }
}

#[async_trait]
impl AvatarStore for CapStdAvatarStore {
    async fn store(
        &self,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<AvatarFileName, AvatarStoreError> {
        let name = AvatarFileName::generate(kind);
        let staging = format!(".tmp-avatar-{}", Uuid::new_v4().simple());
        let dir = Arc::clone(&self.dir);
        let target = name.clone();

        blocking(move || {
            dir.write(&staging, &bytes)?;
            if let Err(error) = dir.rename(&staging, &dir, target.as_str()) {
                if let Err(cleanup) = dir.remove_file(&staging) {
                    debug!(%cleanup, file = %staging, "failed to remove staged avatar");
                }
                return Err(error);
            }
            Ok(())
        })
        .await
        .map_err(|err| map_io_error(&name, &err))?;

        debug!(file = %name, "avatar stored");
        Ok(name)
    }

    async fn remove(&self, name: &AvatarFileName) -> Result<(), AvatarStoreError> {
        let dir = Arc::clone(&self.dir);
        let target = name.clone();
        blocking(move || dir.remove_file(target.as_str()))
            .await
            .map_err(|err| map_io_error(name, &err))
    }

    async fn read(&self, name: &AvatarFileName) -> Result<Vec<u8>, AvatarStoreError> {
        let dir = Arc::clone(&self.dir);
        let target = name.clone();
        blocking(move || dir.read(target.as_str()))
            .await
            .map_err(|err| map_io_error(name, &err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Uploads {
        _temp: TempDir,
        store: CapStdAvatarStore,
    }

    #[fixture]
    fn uploads() -> Uploads {
        let temp = TempDir::new().expect("temp dir");
        let store = CapStdAvatarStore::open(temp.path().join("public").join("uploads"))
            .expect("open uploads dir");
        Uploads { _temp: temp, store }
    }

    #[rstest]
    #[tokio::test]
    async fn stored_files_can_be_read_back(uploads: Uploads) {
        let name = uploads
            .store
            .store(b"\x89PNG".to_vec(), ImageKind::Png)
            .await
            .expect("store");

        assert_eq!(name.kind(), Some(ImageKind::Png));
        assert!(uploads.store.dir.exists(name.as_str()));
        let bytes = uploads.store.read(&name).await.expect("read");
        assert_eq!(bytes, b"\x89PNG");
    }

    #[rstest]
    #[tokio::test]
    async fn staging_files_do_not_linger(uploads: Uploads) {
        uploads
            .store
            .store(vec![1, 2, 3], ImageKind::Gif)
            .await
            .expect("store");

        let entries: Vec<String> = uploads
            .store
            .dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|entry| !entry.starts_with('.')));
    }

    #[rstest]
    #[tokio::test]
    async fn removed_files_are_gone(uploads: Uploads) {
        let name = uploads
            .store
            .store(vec![0xFF, 0xD8], ImageKind::Jpeg)
            .await
            .expect("store");

        uploads.store.remove(&name).await.expect("remove");

        let err = uploads.store.read(&name).await.expect_err("file removed");
        assert!(matches!(err, AvatarStoreError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_files_report_not_found(uploads: Uploads) {
        let name = AvatarFileName::new("absent.webp").expect("valid name");

        let remove = uploads.store.remove(&name).await;
        let read = uploads.store.read(&name).await;

        assert_eq!(remove, Err(AvatarStoreError::not_found("absent.webp")));
        assert_eq!(read, Err(AvatarStoreError::not_found("absent.webp")));
    }
}
