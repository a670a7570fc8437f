//! Contact domain service.
//!
//! Implements the contact driving ports over a [`ContactRepository`] and an
//! [`AvatarStore`]. Every mutation commits in the repository first. Avatar
//! files the committed state no longer references are then reclaimed on a
//! background task, so neither a slow nor a failed reclamation changes the
//! response the caller gets. Uploads that end up referenced by nothing are
//! discarded before the call returns.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AvatarStore, AvatarStoreError, ContactListQuery, ContactRepository, ContactRepositoryError,
    ContactUpdate, ContactsCommand, ContactsQuery,
};
use crate::domain::{
    AvatarChange, AvatarFileManager, AvatarFileName, Contact, ContactChanges, ContactFilter,
    ContactId, ContactList, Error, ImageKind, NewContact,
};

/// Contact service implementing the driving ports.
pub struct ContactService<R, S> {
    repo: Arc<R>,
    avatars: AvatarFileManager<S>,
}

impl<R, S> Clone for ContactService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            avatars: self.avatars.clone(),
        }
    }
}

impl<R, S> ContactService<R, S> {
    /// Create a new service over the given repository and avatar store.
    pub fn new(repo: Arc<R>, store: Arc<S>) -> Self {
        Self {
            repo,
            avatars: AvatarFileManager::new(store),
        }
    }

    /// Wait for every avatar reclamation started by this service so far.
    pub async fn settled(&self) {
        self.avatars.settled().await;
    }
}

impl<R, S> ContactService<R, S>
where
    R: ContactRepository,
    S: AvatarStore + 'static,
{
    fn map_repository_error(error: ContactRepositoryError) -> Error {
        let mapped = match &error {
            ContactRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("contact repository unavailable: {message}"))
            }
            ContactRepositoryError::Query { message } => {
                Error::internal(format!("contact repository error: {message}"))
            }
        };
        mapped.with_cause(error)
    }

    fn map_store_error(error: AvatarStoreError) -> Error {
        let mapped = match &error {
            AvatarStoreError::NotFound { .. } => Error::not_found("Resource not found"),
            AvatarStoreError::Io { message } => {
                Error::internal(format!("avatar store error: {message}"))
            }
        };
        mapped.with_cause(error)
    }

    async fn apply_update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
    ) -> Result<Option<Contact>, Error> {
        let Some(ContactUpdate { previous, current }) = self
            .repo
            .update(id, changes)
            .await
            .map_err(Self::map_repository_error)?
        else {
            return Ok(None);
        };

        if self
            .avatars
            .reclaim_detached(previous.avatar.as_deref(), current.avatar.as_deref())
        {
            debug!(contact_id = %id, "replaced avatar queued for reclamation");
        }
        Ok(Some(current))
    }

    async fn store_upload(&self, bytes: Vec<u8>, kind: ImageKind) -> Result<AvatarFileName, Error> {
        self.avatars
            .store()
            .store(bytes, kind)
            .await
            .map_err(Self::map_store_error)
    }
}

#[async_trait]
impl<R, S> ContactsCommand for ContactService<R, S>
where
    R: ContactRepository,
    S: AvatarStore + 'static,
{
    async fn create(&self, contact: NewContact) -> Result<Contact, Error> {
        let created = self
            .repo
            .insert(&contact)
            .await
            .map_err(Self::map_repository_error)?;
        debug!(contact_id = %created.id, "contact created");
        Ok(created)
    }

    async fn create_with_avatar(
        &self,
        mut contact: NewContact,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Contact, Error> {
        let name = self.store_upload(bytes, kind).await?;
        contact.avatar = Some(name.public_path());

        let result = self.create(contact).await;
        if result.is_err() {
            self.avatars.discard(&name).await;
        }
        result
    }

    async fn update(
        &self,
        id: ContactId,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, Error> {
        self.apply_update(id, &changes).await
    }

    async fn update_with_avatar(
        &self,
        id: ContactId,
        mut changes: ContactChanges,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Option<Contact>, Error> {
        let name = self.store_upload(bytes, kind).await?;
        changes.avatar = AvatarChange::Replace(name.public_path());

        let result = self.apply_update(id, &changes).await;
        if !matches!(result, Ok(Some(_))) {
            // Nothing references the upload.
            self.avatars.discard(&name).await;
        }
        result
    }

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, Error> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;

        let queued = deleted.as_ref().is_some_and(|contact| {
            self.avatars
                .reclaim_detached(contact.avatar.as_deref(), None)
        });
        if queued {
            debug!(contact_id = %id, "avatar of deleted contact queued for reclamation");
        }
        Ok(deleted)
    }

    async fn delete_all(&self) -> Result<u64, Error> {
        let avatars = self
            .repo
            .delete_all()
            .await
            .map_err(Self::map_repository_error)?;

        let deleted = avatars.len();
        let queued = self.avatars.reclaim_all_detached(avatars);
        debug!(deleted, queued, "all contacts deleted");
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }

    async fn set_avatar(
        &self,
        id: ContactId,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Option<Contact>, Error> {
        self.update_with_avatar(id, ContactChanges::default(), bytes, kind)
            .await
    }

    async fn clear_avatar(&self, id: ContactId) -> Result<Option<Contact>, Error> {
        let changes = ContactChanges {
            avatar: AvatarChange::Clear,
            ..ContactChanges::default()
        };
        self.apply_update(id, &changes).await
    }
}

#[async_trait]
impl<R, S> ContactsQuery for ContactService<R, S>
where
    R: ContactRepository,
    S: AvatarStore + 'static,
{
    async fn list(&self, filter: ContactFilter) -> Result<ContactList, Error> {
        let ContactFilter {
            name,
            favorite,
            paginator,
        } = filter;
        let query = ContactListQuery {
            name,
            favorite,
            offset: paginator.offset(),
            limit: paginator.limit(),
        };

        let page = self
            .repo
            .list(&query)
            .await
            .map_err(Self::map_repository_error)?;

        Ok(ContactList {
            contacts: page.contacts,
            metadata: paginator.metadata(page.total),
        })
    }

    async fn get(&self, id: ContactId) -> Result<Option<Contact>, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn avatar(&self, name: &AvatarFileName) -> Result<Vec<u8>, Error> {
        self.avatars
            .store()
            .read(name)
            .await
            .map_err(Self::map_store_error)
    }
}

#[cfg(test)]
#[path = "contact_service_tests.rs"]
mod tests;
