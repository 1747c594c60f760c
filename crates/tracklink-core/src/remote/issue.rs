//! Wire representation of an issue

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{dates, description};

/// Flat issue record exchanged with the server. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteIssue {
    #[serde(default, with = "dates::timestamp", skip_serializing_if = "Option::is_none")]
    pub created: Option<NaiveDateTime>,
    #[serde(default, with = "dates::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDateTime>,
    #[serde(default, with = "dates::date", skip_serializing_if = "Option::is_none")]
    pub duedate: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    #[serde(rename = "customFieldValues", default, skip_serializing_if = "Vec::is_empty")]
    pub custom_field_values: Vec<RemoteCustomFieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCustomFieldValue {
    #[serde(rename = "customfieldId")]
    pub customfield_id: String,
    pub values: Vec<String>,
}

/// Issue as returned by the REST issue endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RestIssue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: RestIssueFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestIssueFields {
    #[serde(default, with = "dates::timestamp")]
    pub created: Option<NaiveDateTime>,
    #[serde(default, with = "dates::timestamp")]
    pub updated: Option<NaiveDateTime>,
    #[serde(default, with = "dates::date")]
    pub duedate: Option<NaiveDateTime>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "description::deserialize")]
    pub description: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub priority: Option<RestRef>,
    #[serde(default)]
    pub resolution: Option<RestRef>,
    #[serde(default)]
    pub status: Option<RestRef>,
    #[serde(default)]
    pub issuetype: Option<RestRef>,
    #[serde(default)]
    pub project: Option<RestRef>,
    #[serde(default)]
    pub assignee: Option<RestRef>,
    #[serde(default)]
    pub reporter: Option<RestRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nested reference object (`{"id": .., "key": .., "name": ..}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

impl RestRef {
    fn user(self) -> Option<String> {
        self.name.or(self.account_id)
    }
}

impl From<RestIssue> for RemoteIssue {
    fn from(issue: RestIssue) -> Self {
        let fields = issue.fields;

        let custom_field_values = fields
            .extra
            .iter()
            .filter(|(name, _)| name.starts_with("customfield_"))
            .filter_map(|(name, value)| {
                let values = custom_field_strings(value);
                if values.is_empty() {
                    None
                } else {
                    Some(RemoteCustomFieldValue {
                        customfield_id: name.clone(),
                        values,
                    })
                }
            })
            .collect();

        Self {
            created: fields.created,
            updated: fields.updated,
            duedate: fields.duedate,
            priority: fields.priority.and_then(|r| r.name),
            resolution: fields.resolution.and_then(|r| r.name),
            key: issue.key,
            summary: fields.summary,
            description: fields.description,
            assignee: fields.assignee.and_then(RestRef::user),
            environment: fields.environment,
            project: fields.project.and_then(|r| r.key),
            reporter: fields.reporter.and_then(RestRef::user),
            status: fields.status.and_then(|r| r.name),
            issue_type: fields.issuetype.and_then(|r| r.id),
            custom_field_values,
        }
    }
}

/// String projection of a custom field value as sent by the server
fn custom_field_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Array(items) => items.iter().flat_map(custom_field_strings).collect(),
        Value::Object(obj) => ["value", "name", "key", "id"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(|s| vec![s.to_string()])
            .unwrap_or_default(),
    }
}
