//! Port for contact persistence.
//!
//! The [`ContactRepository`] trait is the storage contract behind the contact
//! service. Adapters must make each method atomic: `list` counts and pages
//! the same snapshot, and `update` reads the prior row and writes the new one
//! under a row lock so concurrent updates cannot interleave.

use async_trait::async_trait;

use crate::domain::{Contact, ContactChanges, ContactId, FavoriteFilter, NewContact};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "contact repository query failed: {message}",
    }
}

/// Storage-level list request: the filter already resolved to a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactListQuery {
    /// Case-insensitive substring the name must contain, matched literally.
    pub name: Option<String>,
    pub favorite: FavoriteFilter,
    pub offset: u64,
    pub limit: u32,
}

/// Rows in the requested window plus the count across all windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub total: u64,
}

/// State of a contact on either side of a committed update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactUpdate {
    pub previous: Contact,
    pub current: Contact,
}

/// Port for contact storage and retrieval.
///
/// Absence is reported as `Ok(None)`, never as an error. Listing orders by
/// ascending identifier so pages are stable between requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Store a new contact and return it with its assigned identifier.
    async fn insert(&self, contact: &NewContact) -> Result<Contact, ContactRepositoryError>;

    /// Fetch one window of contacts matching `query`, with the total count.
    async fn list(&self, query: &ContactListQuery) -> Result<ContactPage, ContactRepositoryError>;

    /// Fetch a contact by identifier.
    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Apply `changes` to the contact, returning its prior and persisted state.
    ///
    /// An empty change set still resolves the contact so callers can tell
    /// "nothing to do" apart from "not found".
    async fn update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
    ) -> Result<Option<ContactUpdate>, ContactRepositoryError>;

    /// Delete a contact, returning the row as it was.
    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Delete every contact, returning the avatar path of each deleted row.
    async fn delete_all(&self) -> Result<Vec<Option<String>>, ContactRepositoryError>;
}

/// Fixture implementation for tests that do not exercise storage.
///
/// Lookups find nothing and inserts echo the contact back with id 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn insert(&self, contact: &NewContact) -> Result<Contact, ContactRepositoryError> {
        let id = ContactId::new(1).map_err(|err| ContactRepositoryError::query(err.to_string()))?;
        Ok(Contact {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            favorite: contact.favorite,
            avatar: contact.avatar.clone(),
        })
    }

    async fn list(&self, _query: &ContactListQuery) -> Result<ContactPage, ContactRepositoryError> {
        Ok(ContactPage::default())
    }

    async fn find_by_id(&self, _id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        _id: ContactId,
        _changes: &ContactChanges,
    ) -> Result<Option<ContactUpdate>, ContactRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn delete_all(&self) -> Result<Vec<Option<String>>, ContactRepositoryError> {
        Ok(Vec::new())
    }
}
