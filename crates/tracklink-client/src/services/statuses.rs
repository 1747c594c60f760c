use std::sync::Arc;

use tracklink_core::models::IssueStatus;
use tracklink_core::remote::RemoteStatus;

use crate::transport::{execute_as, Method, Transport};
use crate::Result;

pub struct StatusService {
    transport: Arc<dyn Transport>,
}

impl StatusService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_statuses(&self) -> Result<Vec<IssueStatus>> {
        let statuses: Vec<RemoteStatus> =
            execute_as(self.transport.as_ref(), Method::GET, "rest/api/2/status", None).await?;
        Ok(statuses.into_iter().map(IssueStatus::from).collect())
    }

    pub async fn get_status(&self, id_or_name: &str) -> Result<IssueStatus> {
        let resource = format!("rest/api/2/status/{}", id_or_name);
        let status: RemoteStatus =
            execute_as(self.transport.as_ref(), Method::GET, &resource, None).await?;
        Ok(IssueStatus::from(status))
    }
}
