pub mod config;
pub mod custom_field;
pub mod issue;
pub mod named;
pub mod resources;

pub use config::ClientConfig;
pub use custom_field::{is_custom_field_id, CustomField, CustomFieldFetchOptions};
pub use issue::{CustomFieldValue, Issue, IssueFields};
pub use named::NamedValue;
pub use resources::{
    IssueLink, IssueLinkType, IssuePriority, IssueResolution, IssueStatus, IssueType, JiraUser,
    Project, ProjectComponent,
};
