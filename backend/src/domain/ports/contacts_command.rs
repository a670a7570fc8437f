//! Driving port for contact mutations.
//!
//! Inbound adapters use this port to create, change and remove contacts
//! without depending on storage or filesystem adapters. `Ok(None)` means the
//! contact does not exist; adapters decide how to report that.

use async_trait::async_trait;

use crate::domain::{
    AvatarFileName, Contact, ContactChanges, ContactId, Error, ImageKind, NewContact,
};

/// Domain use-case port for contact mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    /// Store a new contact.
    async fn create(&self, contact: NewContact) -> Result<Contact, Error>;

    /// Store an uploaded image and create a contact pointing at it. The file
    /// is discarded again when the contact cannot be created.
    async fn create_with_avatar(
        &self,
        contact: NewContact,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Contact, Error>;

    /// Apply a partial update, reclaiming a replaced or cleared avatar.
    async fn update(&self, id: ContactId, changes: ContactChanges)
    -> Result<Option<Contact>, Error>;

    /// Store an uploaded image and apply `changes` with the image as the new
    /// avatar. The file is discarded again unless the contact was updated.
    async fn update_with_avatar(
        &self,
        id: ContactId,
        changes: ContactChanges,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Option<Contact>, Error>;

    /// Delete a contact and reclaim its avatar.
    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, Error>;

    /// Delete every contact and reclaim their avatars. Returns the number of
    /// contacts removed.
    async fn delete_all(&self) -> Result<u64, Error>;

    /// Store an uploaded image and make it the contact's avatar.
    async fn set_avatar(
        &self,
        id: ContactId,
        bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Option<Contact>, Error>;

    /// Remove the contact's avatar.
    async fn clear_avatar(&self, id: ContactId) -> Result<Option<Contact>, Error>;
}

/// Fixture command that finds no contacts to change.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactsCommand;

#[async_trait]
impl ContactsCommand for FixtureContactsCommand {
    async fn create(&self, contact: NewContact) -> Result<Contact, Error> {
        let id = ContactId::new(1).map_err(|err| Error::internal(err.to_string()))?;
        Ok(Contact {
            id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
            favorite: contact.favorite,
            avatar: contact.avatar,
        })
    }

    async fn create_with_avatar(
        &self,
        contact: NewContact,
        _bytes: Vec<u8>,
        kind: ImageKind,
    ) -> Result<Contact, Error> {
        let avatar = AvatarFileName::generate(kind).public_path();
        self.create(NewContact {
            avatar: Some(avatar),
            ..contact
        })
        .await
    }

    async fn update(
        &self,
        _id: ContactId,
        _changes: ContactChanges,
    ) -> Result<Option<Contact>, Error> {
        Ok(None)
    }

    async fn update_with_avatar(
        &self,
        _id: ContactId,
        _changes: ContactChanges,
        _bytes: Vec<u8>,
        _kind: ImageKind,
    ) -> Result<Option<Contact>, Error> {
        Ok(None)
    }

    async fn delete(&self, _id: ContactId) -> Result<Option<Contact>, Error> {
        Ok(None)
    }

    async fn delete_all(&self) -> Result<u64, Error> {
        Ok(0)
    }

    async fn set_avatar(
        &self,
        _id: ContactId,
        _bytes: Vec<u8>,
        _kind: ImageKind,
    ) -> Result<Option<Contact>, Error> {
        Ok(None)
    }

    async fn clear_avatar(&self, _id: ContactId) -> Result<Option<Contact>, Error> {
        Ok(None)
    }
}
