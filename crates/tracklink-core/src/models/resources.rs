//! Projects, users and the named lookup resources

use crate::models::Issue;
use crate::remote::{
    RemoteComponent, RemoteIssueLinkType, RemoteIssueType, RemotePriority, RemoteProject,
    RemoteResolution, RemoteStatus, RemoteUser,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user account. Users compare equal when their identifiers match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraUser {
    pub account_id: Option<String>,
    pub key: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub time_zone: Option<String>,
}

impl JiraUser {
    /// Identifier used when referring to the user in requests
    pub fn identifier(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .or(self.username.as_deref())
            .or(self.key.as_deref())
    }
}

impl PartialEq for JiraUser {
    fn eq(&self, other: &Self) -> bool {
        self.identifier().is_some() && self.identifier() == other.identifier()
    }
}

impl fmt::Display for JiraUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier().unwrap_or_default())
    }
}

impl From<RemoteUser> for JiraUser {
    fn from(user: RemoteUser) -> Self {
        Self {
            account_id: user.account_id,
            key: user.key,
            username: user.username,
            display_name: user.display_name,
            email: user.email_address,
            is_active: user.active,
            time_zone: user.time_zone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    pub lead: Option<JiraUser>,
    pub url: Option<String>,
}

impl From<RemoteProject> for Project {
    fn from(project: RemoteProject) -> Self {
        Self {
            id: project.id,
            key: project.key,
            name: project.name,
            lead: project.lead.map(JiraUser::from),
            url: project.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectComponent {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<RemoteComponent> for ProjectComponent {
    fn from(component: RemoteComponent) -> Self {
        Self {
            id: component.id,
            name: component.name,
            description: component.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_sub_task: bool,
}

impl From<RemoteIssueType> for IssueType {
    fn from(issue_type: RemoteIssueType) -> Self {
        Self {
            id: issue_type.id,
            name: issue_type.name,
            description: issue_type.description,
            is_sub_task: issue_type.subtask,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl From<RemoteStatus> for IssueStatus {
    fn from(status: RemoteStatus) -> Self {
        Self {
            id: status.id,
            name: status.name,
            description: status.description,
            category: status.status_category.and_then(|c| c.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePriority {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl From<RemotePriority> for IssuePriority {
    fn from(priority: RemotePriority) -> Self {
        Self {
            id: priority.id,
            name: priority.name,
            description: priority.description,
            color: priority.status_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResolution {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<RemoteResolution> for IssueResolution {
    fn from(resolution: RemoteResolution) -> Self {
        Self {
            id: resolution.id,
            name: resolution.name,
            description: resolution.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLinkType {
    pub id: String,
    pub name: String,
    pub inward: Option<String>,
    pub outward: Option<String>,
}

impl From<RemoteIssueLinkType> for IssueLinkType {
    fn from(link_type: RemoteIssueLinkType) -> Self {
        Self {
            id: link_type.id,
            name: link_type.name,
            inward: link_type.inward,
            outward: link_type.outward,
        }
    }
}

/// A typed link between two issues
#[derive(Debug, Clone)]
pub struct IssueLink {
    pub link_type: IssueLinkType,
    pub outward_issue: Issue,
    pub inward_issue: Issue,
}
