//! Issue links and link types

use std::sync::Arc;

use serde_json::{json, Value};
use tracklink_core::models::{IssueLink, IssueLinkType};
use tracklink_core::remote::RemoteIssueLinkType;
use tracklink_core::Issue;

use crate::services::issues::IssueService;
use crate::services::projects::take_array;
use crate::transport::{from_value, Method, Transport};
use crate::{Error, Result};

pub struct LinkService {
    transport: Arc<dyn Transport>,
    issues: IssueService,
}

impl LinkService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            issues: IssueService::new(transport.clone()),
            transport,
        }
    }

    pub async fn create_link(
        &self,
        outward_issue_key: &str,
        inward_issue_key: &str,
        link_name: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        let mut body = json!({
            "type": {"name": link_name},
            "inwardIssue": {"key": inward_issue_key},
            "outwardIssue": {"key": outward_issue_key},
        });

        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            body["comment"] = json!({"body": comment});
        }

        self.transport
            .execute(Method::POST, "rest/api/2/issueLink", Some(body))
            .await?;
        Ok(())
    }

    pub async fn get_link_types(&self) -> Result<Vec<IssueLinkType>> {
        let resource = "rest/api/2/issueLinkType";
        let mut result = self.transport.execute(Method::GET, resource, None).await?;

        let link_types: Vec<RemoteIssueLinkType> =
            from_value(take_array(&mut result, "issueLinkTypes"), resource)?;
        Ok(link_types.into_iter().map(IssueLinkType::from).collect())
    }

    pub async fn get_links_for_issue_key(&self, issue_key: &str) -> Result<Vec<IssueLink>> {
        let issue = self.issues.get_issue(issue_key).await?;
        self.get_links_for_issue(&issue, None).await
    }

    /// Links of `issue`, optionally restricted to the given link type names
    /// (compared case-insensitively). Links to issues the server no longer
    /// returns, e.g. archived ones, are skipped.
    pub async fn get_links_for_issue(
        &self,
        issue: &Issue,
        link_type_names: Option<&[String]>,
    ) -> Result<Vec<IssueLink>> {
        let key = issue
            .key()
            .ok_or_else(|| Error::InvalidRequest("Issue has no key".to_string()))?
            .value
            .clone();

        let resource = format!("rest/api/2/issue/{}?fields=issuelinks,created", key);
        let result = self.transport.execute(Method::GET, &resource, None).await?;

        let links = result
            .get("fields")
            .and_then(|f| f.get("issuelinks"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Error::MalformedResponse(
                    "There is no 'issuelinks' field on the issue data, make sure issue linking is turned on".to_string(),
                )
            })?;

        let filtered: Vec<&Value> = links
            .iter()
            .filter(|link| link.is_object())
            .filter(|link| match link_type_names {
                Some(names) => {
                    let type_name = link["type"]["name"].as_str().unwrap_or_default();
                    names.iter().any(|n| n.eq_ignore_ascii_case(type_name))
                }
                None => true,
            })
            .collect();

        let keys_to_fetch: Vec<String> = filtered
            .iter()
            .filter_map(|link| linked_keys(link).other())
            .collect();

        let mut issues = self.issues.get_issues(&keys_to_fetch).await?;
        issues.entry(key.clone()).or_insert_with(|| issue.clone());

        let mut result = Vec::with_capacity(filtered.len());
        for link in &filtered {
            let keys = linked_keys(link);
            let outward = match keys.outward {
                Some(ref k) => issues.get(k),
                None => Some(issue),
            };
            let inward = match keys.inward {
                Some(ref k) => issues.get(k),
                None => Some(issue),
            };
            let (Some(outward), Some(inward)) = (outward, inward) else {
                continue;
            };

            let link_type: RemoteIssueLinkType = match serde_json::from_value(link["type"].clone()) {
                Ok(link_type) => link_type,
                Err(_) => continue,
            };

            result.push(IssueLink {
                link_type: IssueLinkType::from(link_type),
                outward_issue: outward.clone(),
                inward_issue: inward.clone(),
            });
        }

        if result.len() < filtered.len() {
            tracing::warn!(
                issue = %key,
                missing = filtered.len() - result.len(),
                "Skipped links to issues that could not be fetched, probably archived"
            );
        }

        Ok(result)
    }
}

struct LinkedKeys {
    outward: Option<String>,
    inward: Option<String>,
}

impl LinkedKeys {
    fn other(self) -> Option<String> {
        self.outward.or(self.inward).filter(|k| !k.is_empty())
    }
}

fn linked_keys(link: &Value) -> LinkedKeys {
    let key = |side: &str| {
        link.get(side)
            .and_then(|i| i.get("key"))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    LinkedKeys {
        outward: key("outwardIssue"),
        inward: key("inwardIssue"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockTransport;
    use serde_json::json;

    fn search_body(keys: &[&str]) -> Value {
        json!({"jql": format!("key in ({})", keys.join(",")), "maxResults": keys.len()})
    }

    fn links_transport() -> MockTransport {
        MockTransport::new()
            .with(
                Method::GET,
                "rest/api/2/issue/TST-1",
                json!({"key": "TST-1", "fields": {"summary": "Root"}}),
            )
            .with(
                Method::GET,
                "rest/api/2/issue/TST-1?fields=issuelinks,created",
                json!({"fields": {"issuelinks": [
                    {
                        "id": "100",
                        "type": {"id": "10000", "name": "Blocks", "inward": "is blocked by", "outward": "blocks"},
                        "outwardIssue": {"key": "TST-2"}
                    },
                    {
                        "id": "101",
                        "type": {"id": "10001", "name": "Relates", "inward": "relates to", "outward": "relates to"},
                        "inwardIssue": {"key": "TST-3"}
                    },
                    {
                        "id": "102",
                        "type": {"id": "10001", "name": "Relates"},
                        "inwardIssue": {"key": "OLD-9"}
                    }
                ]}}),
            )
            .with(
                Method::POST,
                "rest/api/2/search",
                json!({"issues": [
                    {"key": "TST-2", "fields": {"summary": "Blocked"}},
                    {"key": "TST-3", "fields": {"summary": "Related"}}
                ]}),
            )
    }

    #[tokio::test]
    async fn test_create_link() {
        let transport = Arc::new(
            MockTransport::new().with(Method::POST, "rest/api/2/issueLink", json!({})),
        );
        let service = LinkService::new(transport.clone());

        service
            .create_link("TST-1", "TST-2", "Blocks", Some("see logs"))
            .await
            .unwrap();
        service.create_link("TST-1", "TST-3", "Relates", Some("")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            Some(json!({
                "type": {"name": "Blocks"},
                "inwardIssue": {"key": "TST-2"},
                "outwardIssue": {"key": "TST-1"},
                "comment": {"body": "see logs"}
            }))
        );
        assert!(requests[1].body.as_ref().unwrap().get("comment").is_none());
    }

    #[tokio::test]
    async fn test_get_link_types() {
        let transport = Arc::new(MockTransport::new().with(
            Method::GET,
            "rest/api/2/issueLinkType",
            json!({"issueLinkTypes": [
                {"id": "10000", "name": "Blocks", "inward": "is blocked by", "outward": "blocks"}
            ]}),
        ));
        let service = LinkService::new(transport);

        let types = service.get_link_types().await.unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].outward.as_deref(), Some("blocks"));
    }

    #[tokio::test]
    async fn test_get_links_for_issue() {
        let transport = Arc::new(links_transport());
        let service = LinkService::new(transport.clone());

        let links = service.get_links_for_issue_key("TST-1").await.unwrap();
        assert_eq!(links.len(), 2);

        assert_eq!(links[0].link_type.name, "Blocks");
        assert_eq!(links[0].outward_issue.key().unwrap().value, "TST-2");
        assert_eq!(links[0].inward_issue.key().unwrap().value, "TST-1");

        assert_eq!(links[1].inward_issue.summary(), Some("Related"));
        assert_eq!(links[1].outward_issue.key().unwrap().value, "TST-1");

        let search = transport
            .requests()
            .into_iter()
            .find(|r| r.method == Method::POST)
            .unwrap();
        assert_eq!(search.body, Some(search_body(&["TST-2", "TST-3", "OLD-9"])));
    }

    #[tokio::test]
    async fn test_get_links_filtered_by_type() {
        let transport = Arc::new(links_transport());
        let service = LinkService::new(transport);

        let issue = service.issues.get_issue("TST-1").await.unwrap();
        let names = vec!["blocks".to_string()];
        let links = service.get_links_for_issue(&issue, Some(names.as_slice())).await.unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link_type.id, "10000");
    }

    #[tokio::test]
    async fn test_links_disabled() {
        let transport = Arc::new(
            MockTransport::new()
                .with(
                    Method::GET,
                    "rest/api/2/issue/TST-1",
                    json!({"key": "TST-1", "fields": {}}),
                )
                .with(
                    Method::GET,
                    "rest/api/2/issue/TST-1?fields=issuelinks,created",
                    json!({"fields": {}}),
                ),
        );
        let service = LinkService::new(transport);

        let result = service.get_links_for_issue_key("TST-1").await;
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }
}
