//! Custom field listings and create metadata

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracklink_core::models::{is_custom_field_id, CustomField, CustomFieldFetchOptions};
use tracklink_core::remote::RemoteField;

use crate::transport::{execute_as, from_value, Method, Transport};
use crate::{Error, Result};

const CREATEMETA: &str = "rest/api/2/issue/createmeta?expand=projects.issuetypes.fields";

pub struct FieldService {
    transport: Arc<dyn Transport>,
}

impl FieldService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// All custom fields defined on the server
    pub async fn get_custom_fields(&self) -> Result<Vec<CustomField>> {
        let fields: Vec<RemoteField> =
            execute_as(self.transport.as_ref(), Method::GET, "rest/api/2/field", None).await?;
        Ok(fields
            .into_iter()
            .filter(|f| f.is_custom_field)
            .map(CustomField::new)
            .collect())
    }

    /// Custom fields available for the projects and issue types in `options`.
    /// Falls back to the global listing when no filter is given.
    pub async fn get_custom_fields_with(
        &self,
        options: &CustomFieldFetchOptions,
    ) -> Result<Vec<CustomField>> {
        if options.is_empty() {
            return self.get_custom_fields().await;
        }

        let mut resource = CREATEMETA.to_string();
        if !options.project_keys.is_empty() {
            resource.push_str(&format!("&projectKeys={}", options.project_keys.join(",")));
        }
        if !options.issue_type_ids.is_empty() {
            resource.push_str(&format!("&issuetypeIds={}", options.issue_type_ids.join(",")));
        }
        if !options.issue_type_names.is_empty() {
            resource.push_str(&format!(
                "&issuetypeNames={}",
                options.issue_type_names.join(",")
            ));
        }

        let project_label = options.project_keys.first().cloned().unwrap_or_default();
        let mut project = self.first_project(&resource, &project_label).await?;

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for issue_type in issue_types(&mut project) {
            for field in fields_of(issue_type, &resource)?
                .into_iter()
                .filter(|f| f.id.as_deref().is_some_and(is_custom_field_id))
                .map(CustomField::new)
            {
                if seen.insert(field.id.clone()) {
                    result.push(field);
                }
            }
        }

        Ok(result)
    }

    pub async fn get_custom_fields_for_project(&self, project_key: &str) -> Result<Vec<CustomField>> {
        self.get_custom_fields_with(&CustomFieldFetchOptions::for_project(project_key))
            .await
    }

    /// Create-screen field definitions of a project, keyed by issue type id
    pub async fn get_create_fields_schema(
        &self,
        project_key: &str,
        issue_type_id: Option<&str>,
    ) -> Result<HashMap<String, Vec<RemoteField>>> {
        if project_key.trim().is_empty() {
            return Err(Error::InvalidRequest("Project key is empty".to_string()));
        }

        let mut resource = format!("{}&projectKeys={}", CREATEMETA, project_key);
        if let Some(id) = issue_type_id.filter(|id| !id.is_empty()) {
            resource.push_str(&format!("&issuetypeIds={}", id));
        }

        let mut project = self.first_project(&resource, project_key).await?;

        let mut result = HashMap::new();
        for issue_type in issue_types(&mut project) {
            let id = match issue_type.get("id").and_then(Value::as_str) {
                Some(id) => id.to_string(),
                None => continue,
            };
            result.insert(id, fields_of(issue_type, &resource)?);
        }

        Ok(result)
    }

    async fn first_project(&self, resource: &str, project_key: &str) -> Result<Value> {
        let mut meta = self.transport.execute(Method::GET, resource, None).await?;

        match meta.get_mut("projects").and_then(Value::as_array_mut) {
            Some(projects) if !projects.is_empty() => Ok(projects.swap_remove(0)),
            _ => Err(Error::NotFound(format!(
                "Project with key '{}' was not found on the server",
                project_key
            ))),
        }
    }
}

fn issue_types(project: &mut Value) -> Vec<Value> {
    match project.get_mut("issuetypes").map(Value::take) {
        Some(Value::Array(types)) => types,
        _ => Vec::new(),
    }
}

/// Field definitions of one create-metadata issue type, with ids taken from
/// the property names when the definitions omit them
fn fields_of(issue_type: Value, resource: &str) -> Result<Vec<RemoteField>> {
    let fields = match issue_type {
        Value::Object(mut issue_type) => match issue_type.remove("fields") {
            Some(Value::Object(fields)) => fields,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    fields
        .into_iter()
        .map(|(name, definition)| {
            let mut field: RemoteField = from_value(definition, resource)?;
            if field.id.is_none() {
                field.id = Some(name);
            }
            Ok(field)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockTransport;
    use serde_json::json;

    fn createmeta() -> Value {
        json!({"projects": [{
            "key": "TST",
            "issuetypes": [
                {"id": "1", "name": "Bug", "fields": {
                    "summary": {"required": true, "name": "Summary", "schema": {"type": "string"}},
                    "customfield_10010": {"required": false, "name": "Team",
                        "schema": {"type": "option", "customId": 10010}},
                    "customfield_10020": {"required": true, "name": "Severity",
                        "schema": {"type": "option", "customId": 10020},
                        "allowedValues": [{"id": "1", "value": "S1"}]}
                }},
                {"id": "3", "name": "Task", "fields": {
                    "customfield_10010": {"required": false, "name": "Team",
                        "schema": {"type": "option", "customId": 10010}}
                }}
            ]
        }]})
    }

    #[tokio::test]
    async fn test_get_custom_fields() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/field",
            json!([
                {"id": "summary", "name": "Summary", "custom": false},
                {"id": "customfield_10010", "name": "Team", "custom": true,
                 "schema": {"type": "option", "customId": 10010}}
            ]),
        ));
        let service = FieldService::new(transport);

        let fields = service.get_custom_fields().await.unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "customfield_10010");
        assert_eq!(fields[0].name, "Team");
    }

    #[tokio::test]
    async fn test_empty_options_use_global_listing() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/field",
            json!([]),
        ));
        let service = FieldService::new(transport.clone());

        let fields = service
            .get_custom_fields_with(&CustomFieldFetchOptions::default())
            .await
            .unwrap();
        assert!(fields.is_empty());
        assert_eq!(transport.requests()[0].resource, "rest/api/2/field");
    }

    #[tokio::test]
    async fn test_custom_fields_for_project_are_deduplicated() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            &format!("{}&projectKeys=TST", CREATEMETA),
            createmeta(),
        ));
        let service = FieldService::new(transport);

        let fields = service.get_custom_fields_for_project("TST").await.unwrap();
        let ids: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(fields.len(), 2);
        assert!(ids.contains("customfield_10010"));
        assert!(ids.contains("customfield_10020"));

        let severity = fields.iter().find(|f| f.id == "customfield_10020").unwrap();
        assert!(severity.is_required());
        assert!(severity.validate(&["S1"]).is_ok());
    }

    #[tokio::test]
    async fn test_custom_fields_with_issue_type_filter() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            &format!("{}&projectKeys=TST&issuetypeNames=Bug", CREATEMETA),
            createmeta(),
        ));
        let service = FieldService::new(transport);

        let options = CustomFieldFetchOptions {
            project_keys: vec!["TST".to_string()],
            issue_type_names: vec!["Bug".to_string()],
            ..Default::default()
        };
        assert_eq!(service.get_custom_fields_with(&options).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_project() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            &format!("{}&projectKeys=NOPE", CREATEMETA),
            json!({"projects": []}),
        ));
        let service = FieldService::new(transport);

        let result = service.get_custom_fields_for_project("NOPE").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_fields_schema() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            &format!("{}&projectKeys=TST&issuetypeIds=1", CREATEMETA),
            createmeta(),
        ));
        let service = FieldService::new(transport);

        let schema = service
            .get_create_fields_schema("TST", Some("1"))
            .await
            .unwrap();

        assert_eq!(schema.len(), 2);
        let bug = &schema["1"];
        assert_eq!(bug.len(), 3);
        assert!(bug
            .iter()
            .any(|f| f.id.as_deref() == Some("summary") && f.is_required));
    }

    #[tokio::test]
    async fn test_create_fields_schema_requires_project() {
        let service = FieldService::new(Arc::new(MockTransport::new()));
        let result = service.get_create_fields_schema(" ", None).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }
}
