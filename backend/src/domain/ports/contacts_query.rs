//! Driving port for contact reads.

use async_trait::async_trait;

use crate::domain::{AvatarFileName, Contact, ContactFilter, ContactId, ContactList, Error};
use pagination::Paginator;

/// Domain use-case port for reading contacts and their avatar files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsQuery: Send + Sync {
    /// List contacts matching `filter`, one page at a time.
    async fn list(&self, filter: ContactFilter) -> Result<ContactList, Error>;

    /// Fetch a contact by identifier.
    async fn get(&self, id: ContactId) -> Result<Option<Contact>, Error>;

    /// Read a stored avatar image.
    async fn avatar(&self, name: &AvatarFileName) -> Result<Vec<u8>, Error>;
}

/// Fixture query over an empty contact book.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactsQuery;

#[async_trait]
impl ContactsQuery for FixtureContactsQuery {
    async fn list(&self, filter: ContactFilter) -> Result<ContactList, Error> {
        let ContactFilter { paginator, .. } = filter;
        Ok(empty_list(paginator))
    }

    async fn get(&self, _id: ContactId) -> Result<Option<Contact>, Error> {
        Ok(None)
    }

    async fn avatar(&self, _name: &AvatarFileName) -> Result<Vec<u8>, Error> {
        Err(Error::not_found("Resource not found"))
    }
}

fn empty_list(paginator: Paginator) -> ContactList {
    ContactList {
        contacts: Vec::new(),
        metadata: paginator.metadata(0),
    }
}
