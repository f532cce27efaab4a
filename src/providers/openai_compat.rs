use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProviderSpec;
use crate::errors::ProviderError;

const ALIYUN_ENDPOINT: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";
const VOLCANO_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3/chat/completions";

/// Upper bound on generated tokens for every provider
pub const MAX_TOKENS: u32 = 10240;

/// Chat message format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Vendor switch for reasoning models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingConfig {
    /// "enabled" or "disabled"
    #[serde(rename = "type")]
    pub mode: String,
}

impl ThinkingConfig {
    pub fn disabled() -> Self {
        Self {
            mode: "disabled".to_string(),
        }
    }
}

/// Chat-completions request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,

    /// Temperature for generation
    pub temperature: f64,

    /// Top probability mass to consider (nucleus sampling)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Always false, responses are read in one piece
    pub stream: bool,

    /// Reasoning switch, only sent when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
}

impl ChatCompletionRequest {
    /// Create a new request with the defaults shared by all providers
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: 0.7,
            top_p: None,
            max_tokens: MAX_TOKENS,
            stream: false,
            thinking: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the top_p (nucleus sampling)
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the reasoning switch
    pub fn thinking(mut self, thinking: ThinkingConfig) -> Self {
        self.thinking = Some(thinking);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Read `choices[0].message.content`
pub fn extract_content(response: &Value) -> Result<String, ProviderError> {
    let parsed = ChatCompletionResponse::deserialize(response)
        .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::UnexpectedResponse("response contains no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| ProviderError::UnexpectedResponse("first choice has no message content".to_string()))
}

/// OpenAI-compatible provider: separate system message, temperature 0.7
#[derive(Debug, Clone)]
pub struct OpenAICompatible {
    name: String,
    endpoint: String,
}

impl OpenAICompatible {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn aliyun() -> Self {
        Self::new("aliyun", ALIYUN_ENDPOINT)
    }

    pub fn volcano() -> Self {
        Self::new("volcano", VOLCANO_ENDPOINT)
    }

    pub fn custom(endpoint: impl Into<String>) -> Self {
        Self::new("custom", endpoint)
    }
}

impl ProviderSpec for OpenAICompatible {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn body(&self, model_name: &str, system_prompt: &str, text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::new(model_name)
            .add_message(ChatMessage::system(system_prompt))
            .add_message(ChatMessage::user(text))
    }
}
