//! Avatar file naming and reclamation.
//!
//! Contacts reference avatar images by public path (`/public/uploads/<file>`).
//! When a path is replaced, cleared, or its contact deleted, the old file is
//! reclaimed: deleted from the upload directory on a best-effort basis. The
//! database is the source of truth; a file that cannot be removed is logged
//! and left behind as an orphan.

use std::future::Future;
use std::path::{Component, Path};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::TraceId;
use crate::domain::ports::{AvatarStore, AvatarStoreError};

/// URL prefix under which stored avatars are served.
pub const PUBLIC_UPLOAD_PREFIX: &str = "/public/uploads/";

/// Upper bound on how long a single file deletion may run.
pub const RECLAIM_TIMEOUT: Duration = Duration::from_secs(2);

/// Rejection reasons for avatar file names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvatarPathError {
    /// The path does not live under [`PUBLIC_UPLOAD_PREFIX`].
    #[error("avatar path must start with {PUBLIC_UPLOAD_PREFIX}")]
    OutsideUploads,
    /// The file name is empty, hidden, or contains separators.
    #[error("avatar file name must be a single plain path component")]
    InvalidFileName,
}

/// Name of a file directly inside the upload directory.
///
/// ## Invariants
/// - Exactly one normal path component: no separators, no `.`/`..`, no NUL.
/// - Not hidden (does not start with `.`).
///
/// # Examples
/// ```
/// use contactbook::domain::AvatarFileName;
///
/// let name = AvatarFileName::from_public_path("/public/uploads/cat.png").expect("upload");
/// assert_eq!(name.as_str(), "cat.png");
/// assert!(AvatarFileName::from_public_path("/public/uploads/../secret").is_err());
/// assert!(AvatarFileName::from_public_path("/etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvatarFileName(String);

impl AvatarFileName {
    /// Validate a bare file name.
    pub fn new(value: impl Into<String>) -> Result<Self, AvatarPathError> {
        let value = value.into();
        if is_plain_file_name(&value) {
            Ok(Self(value))
        } else {
            Err(AvatarPathError::InvalidFileName)
        }
    }

    /// Fresh random name for an image of the given kind.
    #[must_use]
    pub fn generate(kind: ImageKind) -> Self {
        Self(format!("{}.{}", Uuid::new_v4(), kind.extension()))
    }

    /// Extract the file name from a public avatar path.
    ///
    /// Only paths under [`PUBLIC_UPLOAD_PREFIX`] naming a single file are
    /// accepted, so a stored path can never steer deletion outside the
    /// upload directory.
    pub fn from_public_path(path: &str) -> Result<Self, AvatarPathError> {
        let file = path
            .strip_prefix(PUBLIC_UPLOAD_PREFIX)
            .ok_or(AvatarPathError::OutsideUploads)?;
        Self::new(file)
    }

    /// Public path clients use to fetch this file.
    #[must_use]
    pub fn public_path(&self) -> String {
        format!("{PUBLIC_UPLOAD_PREFIX}{}", self.0)
    }

    /// Bare file name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Image kind implied by the file extension, if recognised.
    #[must_use]
    pub fn kind(&self) -> Option<ImageKind> {
        Path::new(&self.0)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageKind::from_extension)
    }
}

impl std::fmt::Display for AvatarFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_plain_file_name(value: &str) -> bool {
    if value.is_empty() || value.starts_with('.') || value.contains(['\\', '\0']) {
        return false;
    }
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == value
    )
}

/// Image formats accepted for avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// Match a `Content-Type` essence such as `image/png`.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Match a file extension without the leading dot.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Canonical extension used for stored files.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// MIME type served for this kind.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Result of a single reclamation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimOutcome {
    /// No deletion was warranted.
    Skipped,
    /// The old file was deleted.
    Removed,
    /// Deletion was attempted and failed or timed out; the failure was logged.
    Failed,
}

/// Decide which file, if any, must be reclaimed when `old` gives way to `new`.
///
/// A file is reclaimed only when `old` is non-empty, differs from `new`, and
/// names a file under [`PUBLIC_UPLOAD_PREFIX`].
///
/// # Examples
/// ```
/// use contactbook::domain::reclaim_candidate;
///
/// assert!(reclaim_candidate(Some("/public/uploads/a.png"), Some("/public/uploads/b.png")).is_some());
/// assert!(reclaim_candidate(Some("/public/uploads/a.png"), Some("/public/uploads/a.png")).is_none());
/// assert!(reclaim_candidate(Some("https://cdn.example/a.png"), None).is_none());
/// ```
#[must_use]
pub fn reclaim_candidate(old: Option<&str>, new: Option<&str>) -> Option<AvatarFileName> {
    let old = old.filter(|path| !path.is_empty())?;
    if new == Some(old) {
        return None;
    }
    match AvatarFileName::from_public_path(old) {
        Ok(name) => Some(name),
        Err(error) => {
            debug!(path = old, %error, "avatar path not eligible for reclamation");
            None
        }
    }
}

/// Best-effort deletion of avatar files that no contact references any more.
///
/// Callers on the request path use the `*_detached` methods: the deletion
/// runs on its own tokio task, carrying the caller's [`TraceId`], and the
/// caller returns without waiting for it. [`AvatarFileManager::settled`]
/// waits for every deletion started so far.
pub struct AvatarFileManager<S> {
    store: Arc<S>,
    timeout: Duration,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<S> Clone for AvatarFileManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S> AvatarFileManager<S> {
    /// Create a manager with the default [`RECLAIM_TIMEOUT`].
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            timeout: RECLAIM_TIMEOUT,
            in_flight: Arc::default(),
        }
    }

    /// Override the per-file deletion timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until every detached reclamation started so far has finished.
    pub async fn settled(&self) {
        loop {
            let pending = std::mem::take(&mut *self.lock_in_flight());
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(error) = handle.await {
                    warn!(%error, "avatar reclamation task ended abnormally");
                }
            }
        }
    }
}

impl<S> AvatarFileManager<S>
where
    S: AvatarStore,
{
    /// Delete `old` if [`reclaim_candidate`] says it is no longer referenced.
    ///
    /// Never fails: errors and timeouts are logged at `warn` and reported as
    /// [`ReclaimOutcome::Failed`].
    pub async fn reclaim(&self, old: Option<&str>, new: Option<&str>) -> ReclaimOutcome {
        match reclaim_candidate(old, new) {
            Some(name) => self.discard(&name).await,
            None => ReclaimOutcome::Skipped,
        }
    }

    /// Reclaim every path in `avatars` independently.
    ///
    /// One failure never prevents the others. Returns the number of files
    /// actually removed.
    pub async fn reclaim_all(&self, avatars: &[Option<String>]) -> usize {
        let attempts = avatars
            .iter()
            .map(|avatar| self.reclaim(avatar.as_deref(), None));
        join_all(attempts)
            .await
            .into_iter()
            .filter(|outcome| *outcome == ReclaimOutcome::Removed)
            .count()
    }

    /// Delete a specific stored file, bounded by the configured timeout.
    pub async fn discard(&self, name: &AvatarFileName) -> ReclaimOutcome {
        match tokio::time::timeout(self.timeout, self.store.remove(name)).await {
            Ok(Ok(())) => {
                debug!(file = %name, "avatar file reclaimed");
                ReclaimOutcome::Removed
            }
            Ok(Err(error)) => {
                log_failure(name, &error);
                ReclaimOutcome::Failed
            }
            Err(_) => {
                warn!(
                    file = %name,
                    timeout_ms = self.timeout.as_millis(),
                    "avatar reclamation timed out"
                );
                ReclaimOutcome::Failed
            }
        }
    }
}

impl<S> AvatarFileManager<S>
where
    S: AvatarStore + 'static,
{
    /// Start reclaiming `old` on a background task and return at once.
    ///
    /// Returns `false` when nothing qualified and no task was started.
    #[must_use]
    pub fn reclaim_detached(&self, old: Option<&str>, new: Option<&str>) -> bool {
        let Some(name) = reclaim_candidate(old, new) else {
            return false;
        };
        let manager = self.clone();
        self.spawn(async move {
            manager.discard(&name).await;
        });
        true
    }

    /// Start reclaiming every qualifying path in `avatars` on one background
    /// task and return at once. Returns the number of files queued.
    #[must_use]
    pub fn reclaim_all_detached(&self, avatars: Vec<Option<String>>) -> usize {
        let queued = avatars
            .iter()
            .filter(|avatar| reclaim_candidate(avatar.as_deref(), None).is_some())
            .count();
        if queued == 0 {
            return 0;
        }
        let manager = self.clone();
        self.spawn(async move {
            let removed = manager.reclaim_all(&avatars).await;
            debug!(queued, removed, "bulk avatar reclamation finished");
        });
        queued
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Some(trace_id) = TraceId::current() else {
            self.track(tokio::spawn(task));
            return;
        };
        self.track(tokio::spawn(TraceId::scope(trace_id, task)));
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut in_flight = self.lock_in_flight();
        in_flight.retain(|pending| !pending.is_finished());
        in_flight.push(handle);
    }
}

fn log_failure(name: &AvatarFileName, error: &AvatarStoreError) {
    warn!(file = %name, %error, "avatar reclamation failed");
}
