//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the table, regenerate with `diesel print-schema` or edit
//! by hand.

diesel::table! {
    /// Contact book entries.
    ///
    /// `id` is assigned by a `BIGSERIAL` sequence. `avatar` holds the public
    /// path of the contact's image, or NULL.
    contacts (id) {
        id -> Int8,
        /// Display name; a CHECK constraint rejects blank values.
        name -> Text,
        email -> Nullable<Text>,
        phone -> Nullable<Text>,
        address -> Nullable<Text>,
        favorite -> Bool,
        avatar -> Nullable<Text>,
    }
}
