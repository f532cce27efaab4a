/*!
 * Tests for provider request and response shapes
 */

use serde_json::{Value, json};
use std::sync::Arc;

use ipynb_translator::app_config::TranslationSettings;
use ipynb_translator::errors::{ProviderError, TranslationError};
use ipynb_translator::providers::mock::MockTransport;
use ipynb_translator::translation::TranslationService;

use crate::common;

fn zhipu_settings(model: &str) -> TranslationSettings {
    TranslationSettings {
        api_key: "test-key".to_string(),
        model_name: model.to_string(),
        system_prompt: "Translate to Chinese:".to_string(),
        ..TranslationSettings::default()
    }
}

async fn sent_body(settings: &TranslationSettings, text: &str) -> (String, Value) {
    let mock = MockTransport::working();
    let service = TranslationService::with_transport(settings, Arc::new(mock.clone())).unwrap();
    service.translate_text(text).await.unwrap();

    let request = mock.requests().remove(0);
    (request.url, serde_json::to_value(&request.body).unwrap())
}

/// Zhipu merges the prompt and uses its own sampling parameters
#[tokio::test]
async fn test_zhipu_request_withFlashModel_shouldMergePromptWithoutThinking() {
    let (url, body) = sent_body(&zhipu_settings("glm-4-flash"), "Hello").await;

    assert_eq!(url, "https://open.bigmodel.cn/api/paas/v4/chat/completions");
    assert_eq!(
        body,
        json!({
            "model": "glm-4-flash",
            "messages": [{"role": "user", "content": "Translate to Chinese:\n\nHello"}],
            "temperature": 0.95,
            "top_p": 0.7,
            "max_tokens": 10240,
            "stream": false
        })
    );
}

/// Models carrying the 4.5 marker get reasoning switched off
#[tokio::test]
async fn test_zhipu_request_withGlm45Model_shouldDisableThinking() {
    let (_, body) = sent_body(&zhipu_settings("glm-4.5-air"), "Hello").await;
    assert_eq!(body["thinking"], json!({"type": "disabled"}));
}

/// OpenAI-compatible providers keep the system prompt separate
#[tokio::test]
async fn test_openai_compatible_request_withEachProvider_shouldSendSystemMessage() {
    let cases = [
        ("aliyun", None, "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions"),
        ("volcano", None, "https://ark.cn-beijing.volces.com/api/v3/chat/completions"),
        (
            "custom",
            Some("https://llm.example.com/v1/chat/completions"),
            "https://llm.example.com/v1/chat/completions",
        ),
    ];

    for (provider, custom_url, expected_url) in cases {
        let settings = TranslationSettings {
            provider: provider.to_string(),
            custom_api_url: custom_url.map(str::to_string),
            system_prompt: "Translate to Chinese:".to_string(),
            ..common::aliyun_settings()
        };

        let (url, body) = sent_body(&settings, "Hello").await;

        assert_eq!(url, expected_url);
        assert_eq!(
            body,
            json!({
                "model": "qwen-turbo",
                "messages": [
                    {"role": "system", "content": "Translate to Chinese:"},
                    {"role": "user", "content": "Hello"}
                ],
                "temperature": 0.7,
                "max_tokens": 10240,
                "stream": false
            }),
            "unexpected body for {}",
            provider
        );
    }
}

/// A response without content is an error, not an empty translation
#[tokio::test]
async fn test_translate_text_withEmptyChoices_shouldFailWithUnexpectedResponse() {
    let service =
        TranslationService::with_transport(&common::aliyun_settings(), Arc::new(MockTransport::empty())).unwrap();

    let err = service.translate_text("Hello").await.unwrap_err();
    assert!(matches!(
        err,
        TranslationError::Provider(ProviderError::UnexpectedResponse(_))
    ));
}

/// The connection check sends the fixed sample text
#[tokio::test]
async fn test_connection_withWorkingProvider_shouldTranslateSample() {
    let mock = MockTransport::working();
    let service = TranslationService::with_transport(&common::aliyun_settings(), Arc::new(mock.clone())).unwrap();

    let translated = service.test_connection().await.unwrap();

    assert_eq!(translated, "[TRANSLATED] Hello, world!");
    assert_eq!(mock.request_count(), 1);
}

/// The service can be driven from synchronous code
#[test]
fn test_translate_text_withBlockingCaller_shouldSucceed() {
    let mock = MockTransport::working();
    let service = TranslationService::with_transport(&common::aliyun_settings(), Arc::new(mock.clone())).unwrap();

    let translated = tokio_test::block_on(service.translate_text("Bonjour"));

    assert_eq!(translated.unwrap(), "[TRANSLATED] Bonjour");
    assert_eq!(mock.requests()[0].headers["Authorization"], "Bearer test-key");
}
