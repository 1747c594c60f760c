//! Tracklink Core
//!
//! Issue model with change tracking, the wire representation exchanged with
//! the issue tracker, and the conversions between the two.

pub mod changes;
pub mod convert;
pub mod error;
pub mod fields;
pub mod models;
pub mod remote;
pub mod storage;

pub use changes::{UpdateFieldDirective, UpdatePayload};
pub use error::{Error, Result};
pub use fields::{FieldDescriptor, FieldKind, FieldValue, ISSUE_FIELDS};
pub use models::{CustomField, Issue, NamedValue};
pub use remote::RemoteIssue;
