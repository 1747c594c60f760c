//! Entry point grouping the resource services

use std::sync::Arc;

use tracklink_core::models::ClientConfig;

use crate::client::RestClient;
use crate::services::{
    FieldService, IssueService, IssueTypeService, LinkService, PriorityService, ProjectService,
    ResolutionService, StatusService,
};
use crate::transport::Transport;
use crate::Result;

#[derive(Clone)]
pub struct Jira {
    transport: Arc<dyn Transport>,
}

impl Jira {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Connect through the REST transport described by `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = RestClient::new(config)?;
        tracing::debug!(url = client.url(), "Created REST client");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn issues(&self) -> IssueService {
        IssueService::new(self.transport.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.transport.clone())
    }

    pub fn issue_types(&self) -> IssueTypeService {
        IssueTypeService::new(self.transport.clone())
    }

    pub fn statuses(&self) -> StatusService {
        StatusService::new(self.transport.clone())
    }

    pub fn priorities(&self) -> PriorityService {
        PriorityService::new(self.transport.clone())
    }

    pub fn resolutions(&self) -> ResolutionService {
        ResolutionService::new(self.transport.clone())
    }

    pub fn links(&self) -> LinkService {
        LinkService::new(self.transport.clone())
    }

    pub fn fields(&self) -> FieldService {
        FieldService::new(self.transport.clone())
    }
}
