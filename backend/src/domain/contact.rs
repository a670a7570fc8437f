//! Contact records and the value types used to create, filter and change them.
//!
//! Purpose: give handlers and repositories one vocabulary for contacts so
//! validation happens once, at construction. Storage assigns identifiers;
//! everything else is supplied by clients and normalised here.

use std::fmt;

use pagination::{PaginationMetadata, Paginator};
use serde::{Deserialize, Serialize};

/// Message returned when a contact name is missing or blank.
pub const NAME_REQUIRED_MESSAGE: &str = "Name should be a non-empty string";

/// Validation errors raised by contact value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// The name was empty once trimmed.
    #[error("Name should be a non-empty string")]
    EmptyName,
    /// Identifiers are positive integers.
    #[error("contact id must be a positive integer")]
    InvalidId,
}

/// Storage-assigned contact identifier.
///
/// # Examples
/// ```
/// use contactbook::domain::ContactId;
///
/// let id: ContactId = "42".parse().expect("numeric id");
/// assert_eq!(id.as_i64(), 42);
/// assert!("0".parse::<ContactId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Wrap a raw identifier, rejecting zero and negative values.
    pub fn new(raw: i64) -> Result<Self, ContactValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ContactValidationError::InvalidId)
        }
    }

    /// Raw identifier as stored.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContactId {
    type Err = ContactValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ContactValidationError::InvalidId)?;
        Self::new(raw)
    }
}

/// Contact display name; never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactName(String);

impl ContactName {
    /// Validate and trim a candidate name.
    ///
    /// # Examples
    /// ```
    /// use contactbook::domain::ContactName;
    ///
    /// let name = ContactName::new("  Ada Lovelace ").expect("valid name");
    /// assert_eq!(name.as_ref(), "Ada Lovelace");
    /// assert!(ContactName::new("   ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, ContactValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContactName {
    type Error = ContactValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContactName> for String {
    fn from(value: ContactName) -> Self {
        value.0
    }
}

/// Treat blank optional text as absent.
///
/// Contact fields never store empty strings; a blank value in a request means
/// "not supplied".
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// A persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: ContactName,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub favorite: bool,
    /// Public path of the avatar image, e.g. `/public/uploads/<file>`.
    pub avatar: Option<String>,
}

/// Field values for a contact that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: ContactName,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub favorite: bool,
    pub avatar: Option<String>,
}

impl NewContact {
    /// Start a contact with only a name; other fields take their defaults.
    #[must_use]
    pub fn named(name: ContactName) -> Self {
        Self {
            name,
            email: None,
            phone: None,
            address: None,
            favorite: false,
            avatar: None,
        }
    }
}

/// What an update does to the stored avatar path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AvatarChange {
    /// Leave the avatar as it is.
    #[default]
    Keep,
    /// Point the contact at a newly stored image.
    Replace(String),
    /// Remove the avatar.
    Clear,
}

/// Partial update to a contact. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub name: Option<ContactName>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub favorite: Option<bool>,
    pub avatar: AvatarChange,
}

impl ContactChanges {
    /// Whether applying these changes would leave a contact untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.favorite.is_none()
            && self.avatar == AvatarChange::Keep
    }

    /// Apply these changes to an in-memory contact.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        if let Some(email) = &self.email {
            contact.email = Some(email.clone());
        }
        if let Some(phone) = &self.phone {
            contact.phone = Some(phone.clone());
        }
        if let Some(address) = &self.address {
            contact.address = Some(address.clone());
        }
        if let Some(favorite) = self.favorite {
            contact.favorite = favorite;
        }
        match &self.avatar {
            AvatarChange::Keep => {}
            AvatarChange::Replace(path) => contact.avatar = Some(path.clone()),
            AvatarChange::Clear => contact.avatar = None,
        }
    }
}

/// Favourite restriction applied to list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FavoriteFilter {
    /// Favourites and non-favourites alike.
    #[default]
    Any,
    /// Only contacts marked as favourite.
    OnlyFavorites,
}

impl FavoriteFilter {
    /// Interpret the raw `favorite` query value.
    ///
    /// Absent, `"0"` and `"false"` (case-insensitive) leave the list
    /// unrestricted. Any other value, `"no"` included, restricts it to
    /// favourites.
    ///
    /// # Examples
    /// ```
    /// use contactbook::domain::FavoriteFilter;
    ///
    /// assert_eq!(FavoriteFilter::from_query(None), FavoriteFilter::Any);
    /// assert_eq!(FavoriteFilter::from_query(Some("FALSE")), FavoriteFilter::Any);
    /// assert_eq!(FavoriteFilter::from_query(Some("1")), FavoriteFilter::OnlyFavorites);
    /// ```
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => Self::Any,
            Some(value) if value == "0" || value.eq_ignore_ascii_case("false") => Self::Any,
            Some(_) => Self::OnlyFavorites,
        }
    }
}

/// Criteria for listing contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    /// Case-insensitive substring the name must contain.
    pub name: Option<String>,
    pub favorite: FavoriteFilter,
    pub paginator: Paginator,
}

impl ContactFilter {
    /// Build a filter from raw query-string values.
    #[must_use]
    pub fn from_query(
        name: Option<String>,
        favorite: Option<&str>,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Self {
        Self {
            name: non_blank(name),
            favorite: FavoriteFilter::from_query(favorite),
            paginator: Paginator::from_query(page, limit),
        }
    }
}

/// One page of contacts plus its pagination descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactList {
    pub contacts: Vec<Contact>,
    pub metadata: PaginationMetadata,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn contact() -> Contact {
        Contact {
            id: ContactId(1),
            name: ContactName("Anna".to_owned()),
            email: Some("anna@example.com".to_owned()),
            phone: None,
            address: None,
            favorite: true,
            avatar: Some("/public/uploads/a.png".to_owned()),
        }
    }

    #[rstest]
    #[case("1", Some(1))]
    #[case(" 17 ", Some(17))]
    #[case("0", None)]
    #[case("-4", None)]
    #[case("abc", None)]
    fn contact_id_parses_positive_integers(#[case] raw: &str, #[case] expected: Option<i64>) {
        let parsed = raw.parse::<ContactId>().ok().map(ContactId::as_i64);
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn contact_name_rejects_blank(#[case] raw: &str) {
        assert_eq!(ContactName::new(raw), Err(ContactValidationError::EmptyName));
    }

    #[rstest]
    fn contact_name_deserialisation_validates() {
        let result: Result<ContactName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[rstest]
    #[case(None, FavoriteFilter::Any)]
    #[case(Some("0"), FavoriteFilter::Any)]
    #[case(Some("false"), FavoriteFilter::Any)]
    #[case(Some(" False "), FavoriteFilter::Any)]
    #[case(Some("true"), FavoriteFilter::OnlyFavorites)]
    #[case(Some("1"), FavoriteFilter::OnlyFavorites)]
    #[case(Some("no"), FavoriteFilter::OnlyFavorites)]
    #[case(Some(""), FavoriteFilter::OnlyFavorites)]
    fn favorite_filter_follows_query_semantics(
        #[case] raw: Option<&str>,
        #[case] expected: FavoriteFilter,
    ) {
        assert_eq!(FavoriteFilter::from_query(raw), expected);
    }

    #[rstest]
    fn filter_from_query_drops_blank_name() {
        let filter = ContactFilter::from_query(Some("  ".to_owned()), None, None, None);
        assert!(filter.name.is_none());
        assert_eq!(filter.paginator, Paginator::default());
    }

    #[rstest]
    fn default_changes_are_empty() {
        assert!(ContactChanges::default().is_empty());
        let changes = ContactChanges {
            avatar: AvatarChange::Clear,
            ..ContactChanges::default()
        };
        assert!(!changes.is_empty());
    }

    #[rstest]
    fn explicit_false_favorite_is_a_change() {
        let changes = ContactChanges {
            favorite: Some(false),
            ..ContactChanges::default()
        };
        assert!(!changes.is_empty());

        let mut target = contact();
        changes.apply_to(&mut target);
        assert!(!target.favorite);
    }

    #[rstest]
    fn apply_to_keeps_omitted_fields() {
        let mut target = contact();
        let changes = ContactChanges {
            phone: Some("555-0100".to_owned()),
            ..ContactChanges::default()
        };
        changes.apply_to(&mut target);

        assert_eq!(target.phone.as_deref(), Some("555-0100"));
        assert_eq!(target.email.as_deref(), Some("anna@example.com"));
        assert_eq!(target.avatar.as_deref(), Some("/public/uploads/a.png"));
    }

    #[rstest]
    fn apply_to_clears_avatar() {
        let mut target = contact();
        ContactChanges {
            avatar: AvatarChange::Clear,
            ..ContactChanges::default()
        }
        .apply_to(&mut target);
        assert!(target.avatar.is_none());
    }

    #[rstest]
    fn non_blank_discards_whitespace() {
        assert_eq!(non_blank(Some(" ".to_owned())), None);
        assert_eq!(non_blank(Some("x".to_owned())), Some("x".to_owned()));
    }
}
