//! Request-scoped trace identifier for correlating logs with error envelopes.
//!
//! Each request handled by the contact book gets a `TraceId` held in
//! task-local storage, so domain errors and log lines can pick it up without
//! threading it through every service call.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`TraceId::scope`] when spawning new tasks or moving work onto blocking
//! threads to ensure the active trace identifier propagates correctly.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    /// Task-local storage for the current trace identifier.
    pub(crate) static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use contactbook::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(pub(crate) Uuid);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a trace identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the current trace identifier if one is in scope.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Execute the provided future with the supplied trace identifier in scope.
    ///
    /// # Examples
    /// ```
    /// use contactbook::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let observed = TraceId::scope(trace_id, async move { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn generate_produces_uuid() {
        let trace_id = TraceId::generate();
        let parsed = Uuid::parse_str(&trace_id.to_string()).expect("valid UUID");
        assert_eq!(parsed.to_string(), trace_id.to_string());
    }

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn from_str_round_trips() {
        let uuid = Uuid::nil();
        let trace_id: TraceId = uuid.to_string().parse().expect("parse uuid");
        assert_eq!(trace_id.to_string(), uuid.to_string());
    }

    #[test]
    fn from_uuid_round_trips() {
        let uuid = Uuid::new_v4();
        let trace_id = TraceId::from_uuid(uuid);
        assert_eq!(trace_id.as_uuid(), &uuid);
    }

    #[tokio::test]
    async fn blocking_work_sees_trace_id_only_when_rescoped() {
        let trace_id = TraceId::generate();
        let (unscoped, rescoped) = TraceId::scope(trace_id, async move {
            let unscoped = tokio::task::spawn_blocking(TraceId::current)
                .await
                .expect("blocking task joins");

            let captured = TraceId::current().expect("trace id in scope");
            let handle = tokio::runtime::Handle::current();
            let rescoped = tokio::task::spawn_blocking(move || {
                handle.block_on(TraceId::scope(captured, async { TraceId::current() }))
            })
            .await
            .expect("blocking task joins");
            (unscoped, rescoped)
        })
        .await;

        assert_eq!(unscoped, None);
        assert_eq!(rescoped, Some(trace_id));
    }

    #[tokio::test]
    async fn spawned_tasks_need_an_explicit_scope() {
        let trace_id = TraceId::generate();
        let (unscoped, rescoped) = TraceId::scope(trace_id, async move {
            let unscoped = tokio::spawn(async { TraceId::current() })
                .await
                .expect("task joins");
            let rescoped = tokio::spawn(TraceId::scope(trace_id, async { TraceId::current() }))
                .await
                .expect("task joins");
            (unscoped, rescoped)
        })
        .await;

        assert_eq!(unscoped, None);
        assert_eq!(rescoped, Some(trace_id));
    }

    #[tokio::test]
    async fn from_uuid_preserves_current_scope() {
        let uuid = Uuid::new_v4();
        let trace_id = TraceId::from_uuid(uuid);
        let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
        assert_eq!(observed, Some(trace_id));
    }
}
