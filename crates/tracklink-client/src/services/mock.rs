//! In-memory transport for service tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{Method, Transport};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub resource: String,
    pub body: Option<Value>,
}

/// Serves canned responses keyed by method and resource; anything else is
/// answered with `NotFound`
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<(Method, String), Value>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, method: Method, resource: &str, response: Value) -> Self {
        self.responses.insert((method, resource.to_string()), response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, method: Method, resource: &str, body: Option<Value>) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            resource: resource.to_string(),
            body,
        });

        self.responses
            .get(&(method, resource.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound(resource.to_string()))
    }
}
