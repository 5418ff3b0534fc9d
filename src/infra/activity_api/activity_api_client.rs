use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;

use crate::core::addon::{ActivityRequest, ActivityTransport, ApiResponse, TransportError};

/// HTTP client for the activity event API. Statuses are passed back untouched;
/// deciding what counts as success is the core's job.
pub struct ActivityApiClient {
    client: Client,
}

impl ActivityApiClient {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent("OpenBadgesAddon/1.0")
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    fn headers(request: &ActivityRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", request.api_token))
                .map_err(|e| TransportError::Request(e.to_string()))?,
        );
        headers.insert(
            "ApiKey",
            HeaderValue::from_str(&request.api_key)
                .map_err(|e| TransportError::Request(e.to_string()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl ActivityTransport for ActivityApiClient {
    async fn post(&self, request: &ActivityRequest) -> Result<ApiResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .headers(Self::headers(request)?)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        tracing::debug!(status, url = %request.url, "Activity API responded");
        Ok(ApiResponse { status, body })
    }
}
