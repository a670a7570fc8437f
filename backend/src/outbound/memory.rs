//! In-process contact storage.
//!
//! Used when no database URL is configured and by the HTTP test harness.
//! Contents live for the lifetime of the process. A single mutex guards the
//! whole map, which makes every port method atomic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    ContactListQuery, ContactPage, ContactRepository, ContactRepositoryError, ContactUpdate,
};
use crate::domain::{Contact, ContactChanges, ContactId, FavoriteFilter, NewContact};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    contacts: BTreeMap<ContactId, Contact>,
}

/// `ContactRepository` backed by an ordered in-memory map.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    state: Mutex<State>,
}

impl InMemoryContactRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation completes before the guard drops.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches(contact: &Contact, needle: Option<&str>, favorite: FavoriteFilter) -> bool {
    if favorite == FavoriteFilter::OnlyFavorites && !contact.favorite {
        return false;
    }
    needle.is_none_or(|needle| {
        contact
            .name
            .as_ref()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    })
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn insert(&self, contact: &NewContact) -> Result<Contact, ContactRepositoryError> {
        let mut state = self.lock();
        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| ContactRepositoryError::query("contact id sequence exhausted"))?;
        let id = ContactId::new(next)
            .map_err(|err| ContactRepositoryError::query(err.to_string()))?;
        state.last_id = next;

        let stored = Contact {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            favorite: contact.favorite,
            avatar: contact.avatar.clone(),
        };
        state.contacts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self, query: &ContactListQuery) -> Result<ContactPage, ContactRepositoryError> {
        let state = self.lock();
        let needle = query.name.as_deref();
        let matching: Vec<&Contact> = state
            .contacts
            .values()
            .filter(|contact| matches(contact, needle, query.favorite))
            .collect();

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let contacts = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();
        Ok(ContactPage { contacts, total })
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self.lock().contacts.get(&id).cloned())
    }

    async fn update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
    ) -> Result<Option<ContactUpdate>, ContactRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.contacts.get_mut(&id) else {
            return Ok(None);
        };
        let previous = stored.clone();
        changes.apply_to(stored);
        Ok(Some(ContactUpdate {
            previous,
            current: stored.clone(),
        }))
    }

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self.lock().contacts.remove(&id))
    }

    async fn delete_all(&self) -> Result<Vec<Option<String>>, ContactRepositoryError> {
        let removed = std::mem::take(&mut self.lock().contacts);
        Ok(removed.into_values().map(|contact| contact.avatar).collect())
    }
}
