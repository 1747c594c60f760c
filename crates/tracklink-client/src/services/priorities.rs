use std::sync::Arc;

use tracklink_core::models::IssuePriority;
use tracklink_core::remote::RemotePriority;

use crate::transport::{execute_as, Method, Transport};
use crate::Result;

pub struct PriorityService {
    transport: Arc<dyn Transport>,
}

impl PriorityService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_priorities(&self) -> Result<Vec<IssuePriority>> {
        let priorities: Vec<RemotePriority> =
            execute_as(self.transport.as_ref(), Method::GET, "rest/api/2/priority", None).await?;
        Ok(priorities.into_iter().map(IssuePriority::from).collect())
    }
}
