//! Domain primitives, services and ports.
//!
//! Purpose: Define the contact book's entities and use-cases independently of
//! HTTP, SQL or the filesystem. Inbound adapters call the driving ports,
//! outbound adapters implement the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure description.
//! - Contact, NewContact, ContactChanges, ContactFilter: contact records and
//!   the values used to create, change and query them.
//! - AvatarFileName, AvatarFileManager: avatar naming and reclamation.
//! - ContactService: implementation of the contact use-cases.
//! - TraceId: request-scoped correlation identifier.

pub mod avatar;
pub mod contact;
pub mod contact_service;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::avatar::{
    AvatarFileManager, AvatarFileName, AvatarPathError, ImageKind, PUBLIC_UPLOAD_PREFIX,
    RECLAIM_TIMEOUT, ReclaimOutcome, reclaim_candidate,
};
pub use self::contact::{
    AvatarChange, Contact, ContactChanges, ContactFilter, ContactId, ContactList, ContactName,
    ContactValidationError, FavoriteFilter, NAME_REQUIRED_MESSAGE, NewContact, non_blank,
};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
