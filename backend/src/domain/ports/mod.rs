//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`ContactsCommand`], [`ContactsQuery`]) are called by
//! inbound adapters; driven ports ([`ContactRepository`], [`AvatarStore`])
//! are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod avatar_store;
mod contact_repository;
mod contacts_command;
mod contacts_query;

#[cfg(test)]
pub use avatar_store::MockAvatarStore;
pub use avatar_store::{AvatarStore, AvatarStoreError, FixtureAvatarStore};
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{
    ContactListQuery, ContactPage, ContactRepository, ContactRepositoryError, ContactUpdate,
    FixtureContactRepository,
};
#[cfg(test)]
pub use contacts_command::MockContactsCommand;
pub use contacts_command::{ContactsCommand, FixtureContactsCommand};
#[cfg(test)]
pub use contacts_query::MockContactsQuery;
pub use contacts_query::{ContactsQuery, FixtureContactsQuery};
