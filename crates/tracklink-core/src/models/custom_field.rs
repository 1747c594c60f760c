//! Custom field definitions

use crate::remote::RemoteField;
use crate::{Error, Result};
use serde_json::Value;

const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// A custom field as defined on the server
#[derive(Debug, Clone, PartialEq)]
pub struct CustomField {
    pub id: String,
    pub name: String,
    remote: RemoteField,
}

impl CustomField {
    pub fn new(remote: RemoteField) -> Self {
        let custom_id = remote.schema.as_ref().and_then(|s| s.custom_id.clone());
        let id = match (remote.id.clone(), custom_id) {
            (Some(id), _) if !id.is_empty() => id,
            (_, Some(custom_id)) if !custom_id.is_empty() => {
                format!("{}{}", CUSTOM_FIELD_PREFIX, custom_id)
            }
            (id, _) => id.unwrap_or_default(),
        };
        let name = remote.name.clone().unwrap_or_default();

        Self { id, name, remote }
    }

    pub fn remote(&self) -> &RemoteField {
        &self.remote
    }

    pub fn custom_type(&self) -> Option<&str> {
        self.remote.schema.as_ref().and_then(|s| s.custom.as_deref())
    }

    pub fn custom_identifier(&self) -> Option<&str> {
        self.remote
            .schema
            .as_ref()
            .and_then(|s| s.custom_id.as_deref())
    }

    pub fn field_type(&self) -> Option<&str> {
        self.remote
            .schema
            .as_ref()
            .and_then(|s| s.field_type.as_deref())
    }

    pub fn items_type(&self) -> Option<&str> {
        self.remote.schema.as_ref().and_then(|s| s.items.as_deref())
    }

    pub fn is_required(&self) -> bool {
        self.remote.is_required
    }

    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.remote.allowed_values.as_deref()
    }

    /// Check values destined for this field against its definition
    pub fn validate<S: AsRef<str>>(&self, values: &[S]) -> Result<()> {
        if self.is_required() && values.iter().all(|v| v.as_ref().trim().is_empty()) {
            return Err(Error::Validation(format!(
                "Custom field '{}' ({}) is required",
                self.name, self.id
            )));
        }

        if let Some(allowed) = self.allowed_values() {
            if !allowed.is_empty() {
                for value in values {
                    let value = value.as_ref();
                    if !allowed.iter().any(|a| allowed_value_matches(a, value)) {
                        return Err(Error::Validation(format!(
                            "Value '{}' is not allowed for custom field '{}' ({})",
                            value, self.name, self.id
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl From<RemoteField> for CustomField {
    fn from(remote: RemoteField) -> Self {
        Self::new(remote)
    }
}

/// Whether a field id names a custom field
pub fn is_custom_field_id(id: &str) -> bool {
    id.len() > CUSTOM_FIELD_PREFIX.len()
        && id
            .get(..CUSTOM_FIELD_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CUSTOM_FIELD_PREFIX))
}

fn allowed_value_matches(allowed: &Value, value: &str) -> bool {
    match allowed {
        Value::String(s) => s == value,
        Value::Object(obj) => ["value", "name", "id"]
            .iter()
            .any(|k| obj.get(*k).and_then(Value::as_str) == Some(value)),
        _ => false,
    }
}

/// Filters for listing custom fields through the create metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFieldFetchOptions {
    pub project_keys: Vec<String>,
    pub issue_type_ids: Vec<String>,
    pub issue_type_names: Vec<String>,
}

impl CustomFieldFetchOptions {
    pub fn for_project(project_key: impl Into<String>) -> Self {
        Self {
            project_keys: vec![project_key.into()],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.project_keys.is_empty()
            && self.issue_type_ids.is_empty()
            && self.issue_type_names.is_empty()
    }
}
