//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.
//!
//! Listing counts and pages inside one repeatable-read transaction so the
//! total and the window come from the same snapshot. Updates lock the row
//! with `SELECT ... FOR UPDATE` before writing, so the prior state handed back
//! for avatar reclamation is exactly the state that was replaced.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{
    ContactListQuery, ContactPage, ContactRepository, ContactRepositoryError, ContactUpdate,
};
use crate::domain::{Contact, ContactChanges, ContactId, ContactName, FavoriteFilter, NewContact};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ContactChangeset, ContactRow, NewContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::contacts;

/// Diesel-backed implementation of the `ContactRepository` port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactRepositoryError {
    map_basic_pool_error(error, ContactRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    map_basic_diesel_error(
        error,
        ContactRepositoryError::query,
        ContactRepositoryError::connection,
    )
}

/// Convert a database row into a domain contact.
fn row_to_contact(row: ContactRow) -> Result<Contact, ContactRepositoryError> {
    let id = ContactId::new(row.id)
        .map_err(|err| ContactRepositoryError::query(format!("stored contact id: {err}")))?;
    let name = ContactName::new(row.name)
        .map_err(|err| ContactRepositoryError::query(format!("stored contact {id}: {err}")))?;
    Ok(Contact {
        id,
        name,
        email: row.email,
        phone: row.phone,
        address: row.address,
        favorite: row.favorite,
        avatar: row.avatar,
    })
}

/// Escape LIKE metacharacters so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Base query shared by the count and the page of a listing.
fn filtered(query: &ContactListQuery) -> contacts::BoxedQuery<'static, Pg> {
    let mut statement = contacts::table.into_boxed();
    if let Some(name) = query.name.as_deref() {
        statement = statement.filter(contacts::name.ilike(like_pattern(name)));
    }
    if query.favorite == FavoriteFilter::OnlyFavorites {
        statement = statement.filter(contacts::favorite.eq(true));
    }
    statement
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn insert(&self, contact: &NewContact) -> Result<Contact, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: ContactRow = diesel::insert_into(contacts::table)
            .values(NewContactRow::from(contact))
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_contact(row)
    }

    async fn list(&self, query: &ContactListQuery) -> Result<ContactPage, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        let limit = i64::from(query.limit);

        let (total, rows) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let total: i64 = filtered(query).count().get_result(conn).await?;
                    let rows: Vec<ContactRow> = filtered(query)
                        .select(ContactRow::as_select())
                        .order_by(contacts::id.asc())
                        .offset(offset)
                        .limit(limit)
                        .load(conn)
                        .await?;
                    Ok((total, rows))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let contacts = rows
            .into_iter()
            .map(row_to_contact)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ContactPage {
            contacts,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ContactRow> = contacts::table
            .find(id.as_i64())
            .select(ContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }

    async fn update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
    ) -> Result<Option<ContactUpdate>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = conn
            .transaction(|conn| {
                async move {
                    let previous: Option<ContactRow> = contacts::table
                        .find(id.as_i64())
                        .select(ContactRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(previous) = previous else {
                        return Ok(None);
                    };
                    if changes.is_empty() {
                        return Ok(Some((previous.clone(), previous)));
                    }

                    let current: ContactRow = diesel::update(contacts::table.find(id.as_i64()))
                        .set(ContactChangeset::from(changes))
                        .returning(ContactRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(Some((previous, current)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        rows.map(|(previous, current)| {
            Ok(ContactUpdate {
                previous: row_to_contact(previous)?,
                current: row_to_contact(current)?,
            })
        })
        .transpose()
    }

    async fn delete(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ContactRow> = diesel::delete(contacts::table.find(id.as_i64()))
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }

    async fn delete_all(&self) -> Result<Vec<Option<String>>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(contacts::table)
            .returning(contacts::avatar)
            .get_results(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Pure helpers only; the adapter itself is covered by the embedded
    //! PostgreSQL suite under `tests/`.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ann", "%ann%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_pattern_escapes_metacharacters(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(needle), expected);
    }

    #[rstest]
    fn row_to_contact_rejects_blank_names() {
        let row = ContactRow {
            id: 1,
            name: "  ".into(),
            email: None,
            phone: None,
            address: None,
            favorite: false,
            avatar: None,
        };
        let err = row_to_contact(row).expect_err("blank name must be rejected");
        assert!(matches!(err, ContactRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_to_contact_keeps_optional_fields() {
        let row = ContactRow {
            id: 7,
            name: "Ada".into(),
            email: Some("ada@example.com".into()),
            phone: None,
            address: Some("London".into()),
            favorite: true,
            avatar: Some("/public/uploads/a.png".into()),
        };
        let contact = row_to_contact(row).expect("valid row");
        assert_eq!(contact.id.as_i64(), 7);
        assert_eq!(contact.name.as_ref(), "Ada");
        assert!(contact.favorite);
        assert_eq!(contact.avatar.as_deref(), Some("/public/uploads/a.png"));
    }
}
