//! Wire types exchanged with the issue tracker

pub mod dates;
pub mod description;
pub mod field;
pub mod issue;
pub mod resources;

pub use field::{RemoteField, RemoteFieldSchema};
pub use issue::{RemoteCustomFieldValue, RemoteIssue, RestIssue, RestIssueFields, RestRef};
pub use resources::{
    RemoteComponent, RemoteIssueLinkType, RemoteIssueType, RemotePriority, RemoteProject,
    RemoteResolution, RemoteStatus, RemoteUser,
};
