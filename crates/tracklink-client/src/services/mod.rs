pub mod fields;
pub mod issue_types;
pub mod issues;
pub mod links;
pub mod priorities;
pub mod projects;
pub mod resolutions;
pub mod statuses;

#[cfg(test)]
pub(crate) mod mock;

pub use fields::FieldService;
pub use issue_types::IssueTypeService;
pub use issues::IssueService;
pub use links::LinkService;
pub use priorities::PriorityService;
pub use projects::ProjectService;
pub use resolutions::ResolutionService;
pub use statuses::StatusService;
