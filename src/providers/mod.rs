/*!
 * Provider implementations for different translation services.
 *
 * This module maps a provider name to the request shape its API expects:
 * - `zhipu`: Zhipu BigModel, system prompt merged into the user message
 * - `aliyun`, `volcano`, `custom`: OpenAI-compatible chat completions
 *
 * Requests are sent through a [`Transport`], so the same adapter can be driven
 * by a real HTTP client or by the mock used in tests.
 */

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationProvider, TranslationSettings};
use crate::errors::{ConfigurationError, ProviderError};

pub mod http;
pub mod mock;
pub mod openai_compat;
pub mod zhipu;

pub use self::http::HttpTransport;
pub use self::openai_compat::{ChatCompletionRequest, ChatMessage, OpenAICompatible, ThinkingConfig};
pub use self::zhipu::Zhipu;

/// A fully-formed HTTP request, ready to be posted
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Endpoint URL
    pub url: String,
    /// Header map
    pub headers: BTreeMap<String, String>,
    /// JSON payload
    pub body: ChatCompletionRequest,
}

/// Request and response shape of one provider
///
/// Adding a provider means adding an implementation and a
/// [`TranslationProvider`] variant; call sites never branch on the name.
pub trait ProviderSpec: Send + Sync + Debug {
    /// Lowercase provider identifier
    fn name(&self) -> &str;

    /// Chat-completions endpoint
    fn endpoint(&self) -> &str;

    /// Headers for the given key
    fn headers(&self, api_key: &str) -> BTreeMap<String, String> {
        bearer_headers(api_key)
    }

    /// Payload for one text
    fn body(&self, model_name: &str, system_prompt: &str, text: &str) -> ChatCompletionRequest;

    /// Pull the translated text out of a successful response
    fn extract_text(&self, response: &Value) -> Result<String, ProviderError> {
        openai_compat::extract_content(response)
    }
}

/// Sends prepared requests and returns the parsed JSON body
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// POST the request; non-2xx responses and network failures are errors
    async fn post_json(&self, request: &PreparedRequest) -> Result<Value, ProviderError>;
}

/// Bearer auth and JSON content type, shared by every built-in provider
pub fn bearer_headers(api_key: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

/// Resolve a provider to its strategy
pub fn resolve(
    provider: TranslationProvider,
    custom_api_url: Option<&str>,
) -> Result<Arc<dyn ProviderSpec>, ConfigurationError> {
    let spec: Arc<dyn ProviderSpec> = match provider {
        TranslationProvider::Zhipu => Arc::new(Zhipu::new()),
        TranslationProvider::Aliyun => Arc::new(OpenAICompatible::aliyun()),
        TranslationProvider::Volcano => Arc::new(OpenAICompatible::volcano()),
        TranslationProvider::Custom => {
            let url = custom_api_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .ok_or(ConfigurationError::MissingCustomUrl)?;
            Arc::new(OpenAICompatible::custom(url))
        }
    };
    Ok(spec)
}

/// Binds a provider strategy to the key, model and prompt of one run
#[derive(Debug, Clone)]
pub struct ProviderAdapter {
    spec: Arc<dyn ProviderSpec>,
    api_key: String,
    model_name: String,
    system_prompt: String,
}

impl ProviderAdapter {
    /// Validate the settings and pick the provider strategy
    pub fn new(settings: &TranslationSettings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let spec = resolve(settings.provider_kind()?, settings.custom_url())?;

        Ok(Self {
            spec,
            api_key: settings.api_key.clone(),
            model_name: settings.model_name.clone(),
            system_prompt: settings.system_prompt.clone(),
        })
    }

    /// Provider identifier
    pub fn provider_name(&self) -> &str {
        self.spec.name()
    }

    /// Model sent with every request
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Build the request for `text`
    pub fn build_request(&self, text: &str) -> PreparedRequest {
        PreparedRequest {
            url: self.spec.endpoint().to_string(),
            headers: self.spec.headers(&self.api_key),
            body: self.spec.body(&self.model_name, &self.system_prompt, text),
        }
    }

    /// Extract the translated text from a response of this provider
    pub fn extract_text(&self, response: &Value) -> Result<String, ProviderError> {
        self.spec.extract_text(response)
    }
}
