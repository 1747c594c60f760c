//! Field descriptors for the tracked issue fields
//!
//! Each descriptor names a field on the wire, says how the field is compared
//! and how a changed value is encoded into an update directive. The table is
//! ordered; change detection walks it front to back.

use chrono::NaiveDateTime;

use crate::models::{IssueFields, NamedValue};

/// Date format required by the issue update endpoint, e.g. `10/Oct/11`
pub const UPDATE_DATE_FORMAT: &str = "%d/%b/%y";

/// Comparison strategy of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Ordinal string equality
    Plain,
    /// Equality on the identifier of a [`NamedValue`]
    Identity,
    /// Exact date/time equality
    Date,
}

/// How the REST API expects a reference-like field to be wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Name,
    Key,
    Id,
}

impl Reference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reference::Name => "name",
            Reference::Key => "key",
            Reference::Id => "id",
        }
    }
}

/// Borrowed view of one field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Named(Option<&'a NamedValue>),
    Date(Option<NaiveDateTime>),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Plain,
            FieldValue::Named(_) => FieldKind::Identity,
            FieldValue::Date(_) => FieldKind::Date,
        }
    }

    /// Whether this value counts as a change relative to `origin`.
    ///
    /// Absent on both sides is unchanged, absent on exactly one side is a
    /// change. Values of different kinds always differ.
    pub fn differs_from(&self, origin: &FieldValue<'_>) -> bool {
        match (self, origin) {
            (FieldValue::Text(live), FieldValue::Text(origin)) => live != origin,
            (FieldValue::Named(live), FieldValue::Named(origin)) => match (live, origin) {
                (None, None) => false,
                (Some(live), Some(origin)) => live.value != origin.value,
                _ => true,
            },
            (FieldValue::Date(live), FieldValue::Date(origin)) => live != origin,
            _ => true,
        }
    }

    /// Encode into update directive values. A cleared field encodes to no
    /// values at all.
    pub fn encode(&self) -> Vec<String> {
        match self {
            FieldValue::Text(Some(text)) => vec![(*text).to_string()],
            FieldValue::Named(Some(named)) => vec![named.value.clone()],
            FieldValue::Date(Some(date)) => vec![date.format(UPDATE_DATE_FORMAT).to_string()],
            _ => Vec::new(),
        }
    }
}

/// Metadata for one trackable issue field
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name in the wire issue record and in update directives
    pub name: &'static str,
    /// Key used in REST request bodies
    pub rest_name: &'static str,
    pub kind: FieldKind,
    pub reference: Option<Reference>,
    /// Stamped by the server, never sent in a create body
    pub read_only: bool,
    get: fn(&IssueFields) -> FieldValue<'_>,
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("rest_name", &self.rest_name)
            .field("kind", &self.kind)
            .field("reference", &self.reference)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    pub fn value<'a>(&self, fields: &'a IssueFields) -> FieldValue<'a> {
        (self.get)(fields)
    }
}

/// Tracked issue fields in declaration order
pub static ISSUE_FIELDS: [FieldDescriptor; 14] = [
    FieldDescriptor {
        name: "created",
        rest_name: "created",
        kind: FieldKind::Date,
        reference: None,
        read_only: true,
        get: |f| FieldValue::Date(f.created),
    },
    FieldDescriptor {
        name: "updated",
        rest_name: "updated",
        kind: FieldKind::Date,
        reference: None,
        read_only: true,
        get: |f| FieldValue::Date(f.updated),
    },
    FieldDescriptor {
        name: "duedate",
        rest_name: "duedate",
        kind: FieldKind::Date,
        reference: None,
        read_only: false,
        get: |f| FieldValue::Date(f.due_date),
    },
    FieldDescriptor {
        name: "priority",
        rest_name: "priority",
        kind: FieldKind::Identity,
        reference: Some(Reference::Name),
        read_only: false,
        get: |f| FieldValue::Named(f.priority.as_ref()),
    },
    FieldDescriptor {
        name: "resolution",
        rest_name: "resolution",
        kind: FieldKind::Identity,
        reference: Some(Reference::Name),
        read_only: false,
        get: |f| FieldValue::Named(f.resolution.as_ref()),
    },
    FieldDescriptor {
        name: "key",
        rest_name: "key",
        kind: FieldKind::Identity,
        reference: None,
        read_only: true,
        get: |f| FieldValue::Named(f.key.as_ref()),
    },
    FieldDescriptor {
        name: "summary",
        rest_name: "summary",
        kind: FieldKind::Plain,
        reference: None,
        read_only: false,
        get: |f| FieldValue::Text(f.summary.as_deref()),
    },
    FieldDescriptor {
        name: "description",
        rest_name: "description",
        kind: FieldKind::Plain,
        reference: None,
        read_only: false,
        get: |f| FieldValue::Text(f.description.as_deref()),
    },
    FieldDescriptor {
        name: "assignee",
        rest_name: "assignee",
        kind: FieldKind::Plain,
        reference: Some(Reference::Name),
        read_only: false,
        get: |f| FieldValue::Text(f.assignee.as_deref()),
    },
    FieldDescriptor {
        name: "environment",
        rest_name: "environment",
        kind: FieldKind::Plain,
        reference: None,
        read_only: false,
        get: |f| FieldValue::Text(f.environment.as_deref()),
    },
    FieldDescriptor {
        name: "project",
        rest_name: "project",
        kind: FieldKind::Plain,
        reference: Some(Reference::Key),
        read_only: false,
        get: |f| FieldValue::Text(f.project.as_deref()),
    },
    FieldDescriptor {
        name: "reporter",
        rest_name: "reporter",
        kind: FieldKind::Plain,
        reference: Some(Reference::Name),
        read_only: false,
        get: |f| FieldValue::Text(f.reporter.as_deref()),
    },
    FieldDescriptor {
        name: "status",
        rest_name: "status",
        kind: FieldKind::Identity,
        reference: Some(Reference::Name),
        read_only: false,
        get: |f| FieldValue::Named(f.status.as_ref()),
    },
    FieldDescriptor {
        name: "type",
        rest_name: "issuetype",
        kind: FieldKind::Identity,
        reference: Some(Reference::Id),
        read_only: false,
        get: |f| FieldValue::Named(f.issue_type.as_ref()),
    },
];

/// Look up a tracked field by its wire name
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    ISSUE_FIELDS.iter().find(|d| d.name == name)
}
