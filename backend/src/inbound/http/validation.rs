//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `invalid_request` errors whose details name the field,
//! the offending value where useful, and a stable machine-readable code.

use serde_json::{Value, json};

use crate::domain::{ContactId, ContactName, Error, NAME_REQUIRED_MESSAGE};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidId,
    InvalidName,
    InvalidFavorite,
    EmptyUpdate,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidName => "invalid_name",
            Self::InvalidFavorite => "invalid_favorite",
            Self::EmptyUpdate => "empty_update",
        }
    }
}

/// Message returned when an update carries nothing to change.
pub const EMPTY_UPDATE_MESSAGE: &str = "Data to update can not be empty";

fn field_error(field: &str, message: &str, code: ValidationCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Parse a path segment into a [`ContactId`].
pub(crate) fn parse_contact_id(raw: &str) -> Result<ContactId, Error> {
    raw.parse::<ContactId>().map_err(|_| {
        Error::invalid_request("contact id must be a positive integer").with_details(json!({
            "field": "id",
            "value": raw,
            "code": ValidationCode::InvalidId.as_str(),
        }))
    })
}

/// Validate a required `name` member: present, a string, not blank.
pub(crate) fn require_name(value: Option<&Value>) -> Result<ContactName, Error> {
    match value {
        Some(Value::String(name)) => ContactName::new(name.as_str())
            .map_err(|_| field_error("name", NAME_REQUIRED_MESSAGE, ValidationCode::InvalidName)),
        _ => Err(field_error(
            "name",
            NAME_REQUIRED_MESSAGE,
            ValidationCode::InvalidName,
        )),
    }
}

/// Validate an optional `name` member for updates.
///
/// Absent, null and blank strings mean "leave unchanged"; any other
/// non-string value is rejected.
pub(crate) fn optional_name(value: Option<&Value>) -> Result<Option<ContactName>, Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) if name.trim().is_empty() => Ok(None),
        Some(other) => require_name(Some(other)).map(Some),
    }
}

/// Interpret a textual `favorite` form value.
///
/// Blank means "not supplied".
pub(crate) fn parse_favorite(raw: &str) -> Result<Option<bool>, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "on" => Ok(Some(true)),
        "false" | "0" | "off" => Ok(Some(false)),
        _ => Err(Error::invalid_request("favorite must be true or false").with_details(json!({
            "field": "favorite",
            "value": raw,
            "code": ValidationCode::InvalidFavorite.as_str(),
        }))),
    }
}

/// Error for an update request that changes nothing.
pub(crate) fn empty_update_error() -> Error {
    Error::invalid_request(EMPTY_UPDATE_MESSAGE).with_details(json!({
        "code": ValidationCode::EmptyUpdate.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("abc")]
    #[case("1.5")]
    fn rejects_invalid_ids(#[case] raw: &str) {
        let err = parse_contact_id(raw).expect_err("invalid id");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "id", "value": raw, "code": "invalid_id"}))
        );
    }

    #[rstest]
    fn accepts_positive_ids() {
        assert_eq!(parse_contact_id("12").map(ContactId::as_i64).ok(), Some(12));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(json!(null)))]
    #[case(Some(json!("   ")))]
    #[case(Some(json!(42)))]
    #[case(Some(json!(["Ann"])))]
    fn required_name_must_be_a_non_empty_string(#[case] value: Option<Value>) {
        let err = require_name(value.as_ref()).expect_err("invalid name");

        assert_eq!(err.message(), NAME_REQUIRED_MESSAGE);
    }

    #[rstest]
    fn required_name_is_trimmed() {
        let name = require_name(Some(&json!("  Ann  "))).expect("valid name");
        assert_eq!(name.as_ref(), "Ann");
    }

    #[rstest]
    #[case(None, Ok(None))]
    #[case(Some(json!(null)), Ok(None))]
    #[case(Some(json!("")), Ok(None))]
    #[case(Some(json!("Bob")), Ok(Some("Bob".to_owned())))]
    #[case(Some(json!(false)), Err(()))]
    fn optional_name_ignores_blank_values(
        #[case] value: Option<Value>,
        #[case] expected: Result<Option<String>, ()>,
    ) {
        let parsed = optional_name(value.as_ref())
            .map(|name| name.map(String::from))
            .map_err(|_| ());
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("true", Some(true))]
    #[case(" ON ", Some(true))]
    #[case("1", Some(true))]
    #[case("False", Some(false))]
    #[case("0", Some(false))]
    #[case("  ", None)]
    fn favorite_form_values_parse(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_favorite(raw).expect("valid flag"), expected);
    }

    #[rstest]
    fn unknown_favorite_values_are_rejected() {
        let err = parse_favorite("maybe").expect_err("invalid flag");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "favorite", "value": "maybe", "code": "invalid_favorite"}))
        );
    }
}
