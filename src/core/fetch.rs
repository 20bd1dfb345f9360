//! Read-only JSON fetch abstraction

use super::error::{FetchError, Resource};
use async_trait::async_trait;
use serde_json::Value;

/// A named backend endpoint: which resource it serves and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub resource: Resource,
    /// A path relative to the client's base URL, or an absolute URL.
    pub location: String,
}

impl Endpoint {
    pub fn new(resource: Resource, location: impl Into<String>) -> Self {
        Self {
            resource,
            location: location.into(),
        }
    }
}

#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Issues one GET and returns the parsed JSON body.
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        params: &[(String, String)],
    ) -> Result<Value, FetchError>;

    /// Like `fetch`, but an empty array or object body is an `EmptyResult`.
    async fn fetch_records(
        &self,
        endpoint: &Endpoint,
        params: &[(String, String)],
    ) -> Result<Value, FetchError> {
        let value = self.fetch(endpoint, params).await?;
        let empty = match &value {
            Value::Array(rows) => rows.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            Value::Null => true,
            _ => false,
        };
        if empty {
            return Err(FetchError::EmptyResult {
                resource: endpoint.resource,
            });
        }
        Ok(value)
    }
}
