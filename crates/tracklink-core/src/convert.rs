//! Conversions between the wire record and the issue model

use serde_json::{Map, Value};

use crate::changes::{custom_value, rest_value};
use crate::fields::{FieldValue, ISSUE_FIELDS};
use crate::models::{CustomFieldValue, Issue, IssueFields, NamedValue};
use crate::remote::{RemoteCustomFieldValue, RemoteIssue};

const CREATE_DATE_FORMAT: &str = "%Y-%m-%d";

impl From<RemoteIssue> for Issue {
    fn from(remote: RemoteIssue) -> Self {
        let fields = IssueFields {
            created: remote.created,
            updated: remote.updated,
            due_date: remote.duedate,
            priority: remote.priority.map(NamedValue::new),
            resolution: remote.resolution.map(NamedValue::new),
            key: remote.key.map(NamedValue::new),
            summary: remote.summary,
            description: remote.description,
            assignee: remote.assignee,
            environment: remote.environment,
            project: remote.project,
            reporter: remote.reporter,
            status: remote.status.map(NamedValue::new),
            issue_type: remote.issue_type.map(NamedValue::new),
        };

        let custom_fields = remote
            .custom_field_values
            .into_iter()
            .map(|c| CustomFieldValue {
                id: c.customfield_id,
                values: c.values,
            })
            .collect();

        Issue::from_origin(fields, custom_fields)
    }
}

impl Issue {
    /// Full wire view of the live values. Unset fields stay absent.
    pub fn to_remote(&self) -> RemoteIssue {
        let fields = self.fields();
        let named = |v: &Option<NamedValue>| v.as_ref().map(|n| n.value.clone());

        RemoteIssue {
            created: fields.created,
            updated: fields.updated,
            duedate: fields.due_date,
            priority: named(&fields.priority),
            resolution: named(&fields.resolution),
            key: named(&fields.key),
            summary: fields.summary.clone(),
            description: fields.description.clone(),
            assignee: fields.assignee.clone(),
            environment: fields.environment.clone(),
            project: fields.project.clone(),
            reporter: fields.reporter.clone(),
            status: named(&fields.status),
            issue_type: named(&fields.issue_type),
            custom_field_values: self
                .custom_fields()
                .iter()
                .map(|c| RemoteCustomFieldValue {
                    customfield_id: c.id.clone(),
                    values: c.values.clone(),
                })
                .collect(),
        }
    }

    /// REST body for creating this issue: every settable field with a value,
    /// followed by queued custom fields
    pub fn to_create_body(&self) -> Value {
        let mut body_fields = Map::new();

        for descriptor in ISSUE_FIELDS.iter().filter(|d| !d.read_only) {
            let value = match descriptor.value(self.fields()) {
                FieldValue::Text(Some(text)) => text.to_string(),
                FieldValue::Named(Some(named)) => named.value.clone(),
                FieldValue::Date(Some(date)) => date.format(CREATE_DATE_FORMAT).to_string(),
                _ => continue,
            };
            body_fields.insert(
                descriptor.rest_name.to_string(),
                rest_value(descriptor.reference, Some(&value)),
            );
        }

        for directive in self.custom_field_overrides() {
            body_fields.insert(directive.field.clone(), custom_value(&directive.values));
        }

        let mut body = Map::new();
        body.insert("fields".to_string(), Value::Object(body_fields));
        Value::Object(body)
    }
}
