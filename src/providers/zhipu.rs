use super::openai_compat::{ChatCompletionRequest, ChatMessage, ThinkingConfig};
use super::ProviderSpec;

const ZHIPU_ENDPOINT: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";

/// Models whose name contains this marker get thinking disabled
pub const THINKING_MODEL_MARKER: &str = "4.5";

/// Zhipu BigModel (GLM) chat completions
///
/// The system prompt goes into the single user message, followed by a blank
/// line and the text.
#[derive(Debug, Clone, Default)]
pub struct Zhipu;

impl Zhipu {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderSpec for Zhipu {
    fn name(&self) -> &str {
        "zhipu"
    }

    fn endpoint(&self) -> &str {
        ZHIPU_ENDPOINT
    }

    fn body(&self, model_name: &str, system_prompt: &str, text: &str) -> ChatCompletionRequest {
        let request = ChatCompletionRequest::new(model_name)
            .add_message(ChatMessage::user(format!("{}\n\n{}", system_prompt, text)))
            .temperature(0.95)
            .top_p(0.7);

        if model_name.contains(THINKING_MODEL_MARKER) {
            request.thinking(ThinkingConfig::disabled())
        } else {
            request
        }
    }
}
