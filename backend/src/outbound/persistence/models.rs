//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use crate::domain::{AvatarChange, ContactChanges, NewContact};

use super::schema::contacts;

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub favorite: bool,
    pub avatar: Option<String>,
}

/// Insertable struct for creating contact records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub favorite: bool,
    pub avatar: Option<&'a str>,
}

impl<'a> From<&'a NewContact> for NewContactRow<'a> {
    fn from(value: &'a NewContact) -> Self {
        Self {
            name: value.name.as_ref(),
            email: value.email.as_deref(),
            phone: value.phone.as_deref(),
            address: value.address.as_deref(),
            favorite: value.favorite,
            avatar: value.avatar.as_deref(),
        }
    }
}

/// Changeset for partial updates. `None` leaves the column untouched; for
/// `avatar`, `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts)]
pub(crate) struct ContactChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub favorite: Option<bool>,
    pub avatar: Option<Option<&'a str>>,
}

impl<'a> From<&'a ContactChanges> for ContactChangeset<'a> {
    fn from(value: &'a ContactChanges) -> Self {
        Self {
            name: value.name.as_ref().map(AsRef::as_ref),
            email: value.email.as_deref(),
            phone: value.phone.as_deref(),
            address: value.address.as_deref(),
            favorite: value.favorite,
            avatar: match &value.avatar {
                AvatarChange::Keep => None,
                AvatarChange::Replace(path) => Some(Some(path.as_str())),
                AvatarChange::Clear => Some(None),
            },
        }
    }
}
