use std::sync::Arc;

use tracklink_core::models::IssueResolution;
use tracklink_core::remote::RemoteResolution;

use crate::transport::{execute_as, Method, Transport};
use crate::Result;

pub struct ResolutionService {
    transport: Arc<dyn Transport>,
}

impl ResolutionService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_resolutions(&self) -> Result<Vec<IssueResolution>> {
        let resolutions: Vec<RemoteResolution> = execute_as(
            self.transport.as_ref(),
            Method::GET,
            "rest/api/2/resolution",
            None,
        )
        .await?;
        Ok(resolutions.into_iter().map(IssueResolution::from).collect())
    }
}
