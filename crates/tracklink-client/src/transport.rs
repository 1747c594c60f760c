//! The request capability the services are built on

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

pub use reqwest::Method;

/// Executes one request against a resource path relative to the server root.
///
/// Implementations return the parsed JSON body on success, or a categorized
/// [`Error`] on failure. An empty body parses to an empty object.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, method: Method, resource: &str, body: Option<Value>) -> Result<Value>;
}

/// Execute a request and deserialize the response body
pub async fn execute_as<T: DeserializeOwned>(
    transport: &dyn Transport,
    method: Method,
    resource: &str,
    body: Option<Value>,
) -> Result<T> {
    let value = transport.execute(method, resource, body).await?;
    from_value(value, resource)
}

pub(crate) fn from_value<T: DeserializeOwned>(value: Value, resource: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::MalformedResponse(format!("Unexpected response shape from {}: {}", resource, e))
    })
}
