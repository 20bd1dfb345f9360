use crate::core::{Endpoint, FetchClient, FetchError};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// `FetchClient` backed by reqwest, with a bounded per-request timeout.
pub struct HttpFetchClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpFetchClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("finpanel/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn resolve(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }

    fn network_error(&self, err: reqwest::Error, url: &str) -> FetchError {
        if err.is_timeout() {
            FetchError::Network(format!(
                "Request to {url} timed out after {}s",
                self.timeout.as_secs_f32()
            ))
        } else {
            FetchError::Network(format!("Request to {url} failed: {err}"))
        }
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    #[instrument(
        name = "PanelFetch",
        skip(self, params),
        fields(resource = %endpoint.resource)
    )]
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        params: &[(String, String)],
    ) -> Result<Value, FetchError> {
        let location = self.resolve(&endpoint.location);
        let url = Url::parse_with_params(&location, params)
            .map_err(|e| FetchError::Network(format!("Invalid URL {location}: {e}")))?;
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.network_error(e, &location))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Backend returned an error status");
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.network_error(e, &location))?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse backend response"
                );
                Err(FetchError::Parse(e.to_string()))
            }
        }
    }
}
