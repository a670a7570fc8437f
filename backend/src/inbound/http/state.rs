//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ContactsCommand, ContactsQuery, FixtureContactsCommand, FixtureContactsQuery,
};

/// Default ceiling for avatar uploads: 5 MiB.
pub const DEFAULT_MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub contacts: Arc<dyn ContactsCommand>,
    pub contacts_query: Arc<dyn ContactsQuery>,
    /// Largest accepted avatar body in bytes.
    pub max_avatar_bytes: usize,
}

impl HttpState {
    /// Construct state from separate command and query ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use contactbook::domain::ports::{FixtureContactsCommand, FixtureContactsQuery};
    /// use contactbook::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureContactsCommand),
    ///     Arc::new(FixtureContactsQuery),
    /// );
    /// assert_eq!(state.max_avatar_bytes, 5 * 1024 * 1024);
    /// ```
    pub fn new(contacts: Arc<dyn ContactsCommand>, contacts_query: Arc<dyn ContactsQuery>) -> Self {
        Self {
            contacts,
            contacts_query,
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
        }
    }

    /// Construct state from one service implementing both ports.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ContactsCommand + ContactsQuery + 'static,
    {
        let contacts: Arc<dyn ContactsCommand> = service.clone();
        let contacts_query: Arc<dyn ContactsQuery> = service;
        Self::new(contacts, contacts_query)
    }

    /// Override the avatar upload ceiling.
    #[must_use]
    pub fn with_max_avatar_bytes(mut self, limit: usize) -> Self {
        self.max_avatar_bytes = limit;
        self
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureContactsCommand),
            Arc::new(FixtureContactsQuery),
        )
    }
}
