//! Issue retrieval, creation and updates

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracklink_core::remote::{RemoteIssue, RestIssue};
use tracklink_core::{Issue, UpdatePayload};

use crate::transport::{execute_as, Method, Transport};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    issues: Vec<RestIssue>,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

pub struct IssueService {
    transport: Arc<dyn Transport>,
}

impl IssueService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        let resource = format!("rest/api/2/issue/{}", key);
        let rest: RestIssue =
            execute_as(self.transport.as_ref(), Method::GET, &resource, None).await?;
        Ok(Issue::from(RemoteIssue::from(rest)))
    }

    /// Fetch several issues by key. Keys the server does not return are
    /// absent from the map.
    pub async fn get_issues(&self, keys: &[String]) -> Result<HashMap<String, Issue>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let body = json!({
            "jql": format!("key in ({})", keys.join(",")),
            "maxResults": keys.len(),
        });
        let result: SearchResult = execute_as(
            self.transport.as_ref(),
            Method::POST,
            "rest/api/2/search",
            Some(body),
        )
        .await?;

        Ok(result
            .issues
            .into_iter()
            .map(|rest| Issue::from(RemoteIssue::from(rest)))
            .filter_map(|issue| {
                let key = issue.key()?.value.clone();
                Some((key, issue))
            })
            .collect())
    }

    /// Create an issue and return its key
    pub async fn create_issue(&self, issue: &Issue) -> Result<String> {
        let created: CreatedIssue = execute_as(
            self.transport.as_ref(),
            Method::POST,
            "rest/api/2/issue",
            Some(issue.to_create_body()),
        )
        .await?;

        tracing::info!(key = %created.key, "Created issue");
        Ok(created.key)
    }

    /// Send the fields changed on `issue`. Returns `false` without contacting
    /// the server when nothing changed.
    pub async fn update_issue(&self, issue: &Issue) -> Result<bool> {
        let key = issue
            .key()
            .ok_or_else(|| Error::InvalidRequest("Cannot update an issue without a key".to_string()))?;

        let directives = issue.get_updated_fields();
        if directives.is_empty() {
            tracing::debug!(key = %key, "No changes to send");
            return Ok(false);
        }

        let payload = UpdatePayload::from_directives(&directives);
        let resource = format!("rest/api/2/issue/{}", key);
        self.transport
            .execute(Method::PUT, &resource, Some(payload.into_body()))
            .await?;

        tracing::info!(key = %key, fields = directives.len(), "Updated issue");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockTransport;
    use serde_json::json;

    fn issue_json(key: &str, summary: &str) -> serde_json::Value {
        json!({
            "id": "1",
            "key": key,
            "fields": {
                "summary": summary,
                "priority": {"name": "High"},
                "duedate": "2011-01-01"
            }
        })
    }

    #[tokio::test]
    async fn test_get_issue() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/issue/TST-1",
            issue_json("TST-1", "First"),
        ));
        let service = IssueService::new(transport);

        let issue = service.get_issue("TST-1").await.unwrap();
        assert_eq!(issue.key().unwrap().value, "TST-1");
        assert_eq!(issue.summary(), Some("First"));
        assert_eq!(issue.priority().unwrap().value, "High");
        assert!(issue.get_updated_fields().is_empty());
    }

    #[tokio::test]
    async fn test_get_issue_not_found() {
        let service = IssueService::new(Arc::new(MockTransport::new()));
        let result = service.get_issue("NOPE-1").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_issues() {
        let transport = Arc::new(MockTransport::new().with(
            Method::POST,
            "rest/api/2/search",
            json!({"issues": [issue_json("TST-1", "a"), issue_json("TST-2", "b")]}),
        ));
        let service = IssueService::new(transport.clone());

        let keys = vec!["TST-1".to_string(), "TST-2".to_string(), "TST-3".to_string()];
        let issues = service.get_issues(&keys).await.unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues["TST-2"].summary(), Some("b"));

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            Some(json!({"jql": "key in (TST-1,TST-2,TST-3)", "maxResults": 3}))
        );
    }

    #[tokio::test]
    async fn test_get_issues_empty_keys() {
        let transport = Arc::new(MockTransport::new());
        let service = IssueService::new(transport.clone());

        assert!(service.get_issues(&[]).await.unwrap().is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_issue() {
        let transport = Arc::new(MockTransport::new().with(
            Method::POST,
            "rest/api/2/issue",
            json!({"id": "10000", "key": "TST-24"}),
        ));
        let service = IssueService::new(transport.clone());

        let mut issue = Issue::new();
        issue.set_project(Some("TST"));
        issue.set_issue_type(Some("1"));
        issue.set_summary(Some("Summary"));

        let key = service.create_issue(&issue).await.unwrap();
        assert_eq!(key, "TST-24");

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            Some(json!({"fields": {
                "project": {"key": "TST"},
                "issuetype": {"id": "1"},
                "summary": "Summary"
            }}))
        );
    }

    #[tokio::test]
    async fn test_update_issue_sends_only_changes() {
        let transport = Arc::new(
            MockTransport::new()
                .with(Method::GET, "rest/api/2/issue/TST-1", issue_json("TST-1", "Old"))
                .with(Method::PUT, "rest/api/2/issue/TST-1", json!({})),
        );
        let service = IssueService::new(transport.clone());

        let mut issue = service.get_issue("TST-1").await.unwrap();
        issue.set_summary(Some("New"));
        issue.set_priority(Some("High"));

        assert!(service.update_issue(&issue).await.unwrap());

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(requests[1].body, Some(json!({"fields": {"summary": "New"}})));
    }

    #[tokio::test]
    async fn test_update_issue_without_changes() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/issue/TST-1",
            issue_json("TST-1", "Same"),
        ));
        let service = IssueService::new(transport.clone());

        let issue = service.get_issue("TST-1").await.unwrap();
        assert!(!service.update_issue(&issue).await.unwrap());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_update_issue_requires_key() {
        let service = IssueService::new(Arc::new(MockTransport::new()));
        let mut issue = Issue::new();
        issue.set_summary(Some("x"));

        let result = service.update_issue(&issue).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }
}
