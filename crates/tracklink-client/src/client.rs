//! REST transport over reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use tracklink_core::models::ClientConfig;

use crate::auth::JiraAuth;
use crate::transport::{Method, Transport};
use crate::{Error, Result};

/// Transport talking to the server's REST API
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    auth: Option<JiraAuth>,
    enable_request_trace: bool,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let auth = match (&config.username, &config.api_token) {
            (Some(user), Some(token)) => Some(JiraAuth::new(user.clone(), token.clone())),
            _ => None,
        };

        Ok(Self {
            http,
            base_url: config.base_url(),
            auth,
            enable_request_trace: config.enable_request_trace,
        })
    }

    /// Server root URL, always ending with `/`
    pub fn url(&self) -> &str {
        &self.base_url
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}{}", self.base_url, resource.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn execute(&self, method: Method, resource: &str, body: Option<Value>) -> Result<Value> {
        if method == Method::GET && body.is_some() {
            return Err(Error::InvalidRequest(format!(
                "GET requests are not allowed to have a request body. Resource: {}",
                resource
            )));
        }

        tracing::debug!(method = %method, resource, "Sending request");
        if self.enable_request_trace {
            if let Some(ref body) = body {
                tracing::trace!(
                    method = %method,
                    "Request data: {}",
                    serde_json::to_string_pretty(body).unwrap_or_default()
                );
            }
        }

        let mut request = self
            .http
            .request(method.clone(), self.resource_url(resource))
            .header(ACCEPT, "application/json");

        if let Some(ref auth) = self.auth {
            request = request.header(AUTHORIZATION, auth.to_basic_auth());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let content = response.text().await?;

        if self.enable_request_trace {
            tracing::trace!(method = %method, resource, "Response: {}", content.trim());
        }

        let result = parse_response(status, retry_after, &content);
        if let Err(ref e) = result {
            tracing::warn!(method = %method, resource, "Request failed: {}", e);
        }
        result
    }
}

/// Categorize a response by status and body
pub(crate) fn parse_response(
    status: StatusCode,
    retry_after: Option<u64>,
    content: &str,
) -> Result<Value> {
    let content = content.trim();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Auth(format!("Response Content: {}", content)));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(format!("Response Content: {}", content)));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited {
            retry_after,
            message: match retry_after {
                Some(secs) => format!("retry after {} seconds", secs),
                None => "no retry hint".to_string(),
            },
        });
    }

    if status.as_u16() >= 400 {
        return Err(Error::Api {
            status: status.as_u16(),
            message: format!("Response Content: {}", content),
        });
    }

    if content.is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    if !content.starts_with('{') && !content.starts_with('[') {
        return Err(Error::MalformedResponse(format!(
            "Response was not recognized as JSON. Content: {}",
            content
        )));
    }

    let parsed: Value = serde_json::from_str(content).map_err(|e| {
        Error::MalformedResponse(format!(
            "Failed to parse response as JSON ({}). Content: {}",
            e, content
        ))
    })?;

    if let Some(messages) = parsed.get("errorMessages") {
        return Err(Error::Api {
            status: status.as_u16(),
            message: format!("Response reported error(s): {}", messages),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(url: &str) -> ClientConfig {
        ClientConfig {
            username: Some("ann".to_string()),
            api_token: Some("token".to_string()),
            ..ClientConfig::new(url)
        }
    }

    #[test]
    fn test_parse_success() {
        let value = parse_response(StatusCode::OK, None, r#" {"id": "1"} "#).unwrap();
        assert_eq!(value, json!({"id": "1"}));
    }

    #[test]
    fn test_parse_empty_body() {
        let value = parse_response(StatusCode::NO_CONTENT, None, "  ").unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_parse_status_categories() {
        assert!(matches!(
            parse_response(StatusCode::UNAUTHORIZED, None, ""),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            parse_response(StatusCode::FORBIDDEN, None, ""),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            parse_response(StatusCode::NOT_FOUND, None, "{}"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            parse_response(StatusCode::TOO_MANY_REQUESTS, Some(12), ""),
            Err(Error::RateLimited {
                retry_after: Some(12),
                ..
            })
        ));
        assert!(matches!(
            parse_response(StatusCode::BAD_REQUEST, None, "{}"),
            Err(Error::Api { status: 400, .. })
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_response(StatusCode::OK, None, "<html></html>"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(StatusCode::OK, None, "{\"broken\": "),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_error_messages_in_success_body() {
        let result = parse_response(
            StatusCode::OK,
            None,
            r#"{"errorMessages": ["Field 'x' cannot be set"]}"#,
        );
        assert!(matches!(result, Err(Error::Api { status: 200, .. })));
    }

    #[test]
    fn test_new_validates_config() {
        assert!(RestClient::new(&ClientConfig::new("not-a-url")).is_err());

        let client = RestClient::new(&config("https://jira.example.com")).unwrap();
        assert_eq!(client.url(), "https://jira.example.com/");
        assert_eq!(
            client.resource_url("/rest/api/2/field"),
            "https://jira.example.com/rest/api/2/field"
        );
    }

    #[tokio::test]
    async fn test_get_with_body_rejected() {
        let client = RestClient::new(&config("https://jira.example.com")).unwrap();
        let result = client
            .execute(Method::GET, "rest/api/2/field", Some(json!({})))
            .await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_execute_against_server() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("GET", "/rest/api/2/priority")
            .match_header("authorization", "Basic YW5uOnRva2Vu")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "1", "name": "Highest"}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = RestClient::new(&config(&server.url())).unwrap();
        let value = client
            .execute(Method::GET, "rest/api/2/priority", None)
            .await
            .unwrap();

        assert_eq!(value, json!([{"id": "1", "name": "Highest"}]));
        _m.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_sends_json_body() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("PUT", "/rest/api/2/issue/TST-1")
            .match_body(mockito::Matcher::Json(json!({"fields": {"summary": "x"}})))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let client = RestClient::new(&config(&server.url())).unwrap();
        let value = client
            .execute(
                Method::PUT,
                "rest/api/2/issue/TST-1",
                Some(json!({"fields": {"summary": "x"}})),
            )
            .await
            .unwrap();

        assert_eq!(value, json!({}));
        _m.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_rate_limited() {
        let mut server = mockito::Server::new_async().await;

        let _m = server
            .mock("GET", "/rest/api/2/status")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let client = RestClient::new(&config(&server.url())).unwrap();
        let err = client
            .execute(Method::GET, "rest/api/2/status", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RateLimited { retry_after: Some(7), .. }));
        assert!(err.is_retryable());
    }
}
