//! Projects and their issue types and components

use std::sync::Arc;

use serde_json::Value;
use tracklink_core::models::{IssueType, Project, ProjectComponent};
use tracklink_core::remote::{RemoteComponent, RemoteIssueType, RemoteProject};

use crate::transport::{execute_as, from_value, Method, Transport};
use crate::Result;

pub struct ProjectService {
    transport: Arc<dyn Transport>,
}

impl ProjectService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let projects: Vec<RemoteProject> = execute_as(
            self.transport.as_ref(),
            Method::GET,
            "rest/api/2/project?expand=lead,url",
            None,
        )
        .await?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    pub async fn get_project(&self, project_key: &str) -> Result<Project> {
        let resource = format!("rest/api/2/project/{}?expand=lead,url", project_key);
        let project: RemoteProject =
            execute_as(self.transport.as_ref(), Method::GET, &resource, None).await?;
        Ok(Project::from(project))
    }

    pub async fn get_issue_types_and_components(
        &self,
        project_key: &str,
    ) -> Result<(Vec<IssueType>, Vec<ProjectComponent>)> {
        let resource = format!("rest/api/2/project/{}", project_key);
        let mut project = self
            .transport
            .execute(Method::GET, &resource, None)
            .await?;

        let issue_types: Vec<RemoteIssueType> =
            from_value(take_array(&mut project, "issueTypes"), &resource)?;
        let components: Vec<RemoteComponent> =
            from_value(take_array(&mut project, "components"), &resource)?;

        Ok((
            issue_types.into_iter().map(IssueType::from).collect(),
            components.into_iter().map(ProjectComponent::from).collect(),
        ))
    }
}

/// Remove an array member from a JSON object, empty when missing
pub(crate) fn take_array(value: &mut Value, name: &str) -> Value {
    match value.get_mut(name).map(Value::take) {
        Some(array @ Value::Array(_)) => array,
        _ => Value::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_projects() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/project?expand=lead,url",
            json!([
                {"id": "10000", "key": "TST", "name": "Test", "lead": {"name": "ann"}},
                {"id": "10001", "key": "OPS", "name": "Operations", "url": "https://ops.example.com"}
            ]),
        ));
        let service = ProjectService::new(transport);

        let projects = service.get_projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].key, "TST");
        assert_eq!(
            projects[0].lead.as_ref().and_then(|l| l.username.as_deref()),
            Some("ann")
        );
        assert_eq!(projects[1].url.as_deref(), Some("https://ops.example.com"));
    }

    #[tokio::test]
    async fn test_get_project() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/project/TST?expand=lead,url",
            json!({"id": "10000", "key": "TST", "name": "Test"}),
        ));
        let service = ProjectService::new(transport);

        let project = service.get_project("TST").await.unwrap();
        assert_eq!(project.name, "Test");
    }

    #[tokio::test]
    async fn test_get_issue_types_and_components() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/project/TST",
            json!({
                "id": "10000",
                "key": "TST",
                "issueTypes": [
                    {"id": "1", "name": "Bug", "subtask": false},
                    {"id": "5", "name": "Sub-task", "subtask": true}
                ],
                "components": [{"id": "7", "name": "Backend"}]
            }),
        ));
        let service = ProjectService::new(transport);

        let (issue_types, components) = service.get_issue_types_and_components("TST").await.unwrap();
        assert_eq!(issue_types.len(), 2);
        assert!(issue_types[1].is_sub_task);
        assert_eq!(components[0].name, "Backend");
    }

    #[tokio::test]
    async fn test_project_without_components() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/project/TST",
            json!({"id": "10000", "key": "TST", "issueTypes": []}),
        ));
        let service = ProjectService::new(transport);

        let (issue_types, components) = service.get_issue_types_and_components("TST").await.unwrap();
        assert!(issue_types.is_empty());
        assert!(components.is_empty());
    }
}
