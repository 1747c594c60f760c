//! Change detection and update payloads

use serde_json::{Map, Value};

use crate::fields::{self, Reference, ISSUE_FIELDS};
use crate::models::IssueFields;

/// One field and the values to send for it in an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFieldDirective {
    pub field: String,
    pub values: Vec<String>,
}

impl UpdateFieldDirective {
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Compare live values against the snapshot, in field declaration order
pub fn detect(live: &IssueFields, origin: &IssueFields) -> Vec<UpdateFieldDirective> {
    ISSUE_FIELDS
        .iter()
        .filter_map(|descriptor| {
            let current = descriptor.value(live);
            if current.differs_from(&descriptor.value(origin)) {
                Some(UpdateFieldDirective::new(descriptor.name, current.encode()))
            } else {
                None
            }
        })
        .collect()
}

/// REST request body for an issue edit, built from directives.
///
/// Dates keep the `dd/MMM/yy` encoding of their directive here, as the edit
/// endpoint requires. Create bodies use `YYYY-MM-DD` instead (see
/// [`Issue::to_create_body`](crate::Issue::to_create_body)).
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePayload {
    fields: Map<String, Value>,
}

impl UpdatePayload {
    pub fn from_directives(directives: &[UpdateFieldDirective]) -> Self {
        let mut fields = Map::new();
        for directive in directives {
            let (key, value) = match fields::descriptor(&directive.field) {
                Some(descriptor) => (
                    descriptor.rest_name.to_string(),
                    rest_value(descriptor.reference, directive.values.first().map(String::as_str)),
                ),
                None => (directive.field.clone(), custom_value(&directive.values)),
            };
            fields.insert(key, value);
        }
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn into_body(self) -> Value {
        let mut body = Map::new();
        body.insert("fields".to_string(), Value::Object(self.fields));
        Value::Object(body)
    }
}

/// Shape one tracked field value for a REST body
pub(crate) fn rest_value(reference: Option<Reference>, value: Option<&str>) -> Value {
    match (value, reference) {
        (None, _) => Value::Null,
        (Some(v), Some(reference)) => {
            let mut wrapped = Map::new();
            wrapped.insert(reference.as_str().to_string(), Value::String(v.to_string()));
            Value::Object(wrapped)
        }
        (Some(v), None) => Value::String(v.to_string()),
    }
}

pub(crate) fn custom_value(values: &[String]) -> Value {
    match values {
        [] => Value::Null,
        [single] => Value::String(single.clone()),
        many => Value::Array(many.iter().cloned().map(Value::String).collect()),
    }
}
