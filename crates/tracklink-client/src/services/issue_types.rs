use std::sync::Arc;

use tracklink_core::models::IssueType;
use tracklink_core::remote::RemoteIssueType;

use crate::services::projects::take_array;
use crate::transport::{execute_as, from_value, Method, Transport};
use crate::Result;

pub struct IssueTypeService {
    transport: Arc<dyn Transport>,
}

impl IssueTypeService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_issue_types(&self) -> Result<Vec<IssueType>> {
        let issue_types: Vec<RemoteIssueType> = execute_as(
            self.transport.as_ref(),
            Method::GET,
            "rest/api/2/issuetype",
            None,
        )
        .await?;
        Ok(issue_types.into_iter().map(IssueType::from).collect())
    }

    pub async fn get_issue_types_for_project(&self, project_key: &str) -> Result<Vec<IssueType>> {
        let resource = format!("rest/api/2/project/{}", project_key);
        let mut project = self
            .transport
            .execute(Method::GET, &resource, None)
            .await?;

        let issue_types: Vec<RemoteIssueType> =
            from_value(take_array(&mut project, "issueTypes"), &resource)?;
        Ok(issue_types.into_iter().map(IssueType::from).collect())
    }
}
