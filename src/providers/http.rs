use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::{PreparedRequest, Transport};
use crate::errors::{ConfigurationError, ProviderError};

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests
    client: Client,
}

impl HttpTransport {
    /// Create a transport; `None` means requests never time out
    pub fn new(timeout: Option<Duration>) -> Result<Self, ConfigurationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

fn map_send_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(error.to_string())
    } else if error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(format!("{} - {}", status.as_u16(), body))
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: &PreparedRequest) -> Result<Value, ProviderError> {
        debug!("POST {} (model {})", request.url, request.body.model);

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("API error ({}): {}", status, error_text);
            return Err(map_status_error(status, error_text));
        }

        let text = response.text().await.map_err(map_send_error)?;
        serde_json::from_str(&text).map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}
