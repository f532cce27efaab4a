/*!
 * Tests for application configuration functionality
 */

use ipynb_translator::app_config::{Config, LogLevel, TranslationProvider};
use ipynb_translator::errors::ConfigurationError;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, "zhipu");
    assert_eq!(config.translation.provider_kind(), Ok(TranslationProvider::Zhipu));
    assert_eq!(config.translation.model_name, "glm-4-flash");
    assert!(config.translation.system_prompt.starts_with("请将以下Markdown文本翻译成中文"));
    assert!(config.translation.api_key.is_empty());
    assert!(config.translation.custom_api_url.is_none());
    assert!(config.translation.timeout_secs.is_none());

    assert_eq!(config.batch.concurrency, 3);
    assert!(config.batch.skip_code_blocks);
    assert!(config.batch.skip_math_formulas);

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Partial files fall back to defaults field by field
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(
        r#"{"translation": {"provider": "volcano", "api_key": "k"}, "batch": {"concurrency": 5}}"#,
    )
    .unwrap();

    assert_eq!(config.translation.provider_kind(), Ok(TranslationProvider::Volcano));
    assert_eq!(config.translation.model_name, "glm-4-flash");
    assert_eq!(config.batch.concurrency, 5);
    assert!(config.batch.skip_code_blocks);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::test_config(3);
    assert!(config.validate().is_ok());

    config.translation.api_key = "   ".to_string();
    assert_eq!(config.validate(), Err(ConfigurationError::MissingApiKey));
    config.translation.api_key = "k".to_string();

    config.translation.provider = "openai".to_string();
    assert_eq!(
        config.validate(),
        Err(ConfigurationError::UnsupportedProvider("openai".to_string()))
    );

    config.translation.provider = "custom".to_string();
    assert_eq!(config.validate(), Err(ConfigurationError::MissingCustomUrl));

    config.translation.custom_api_url = Some("  ".to_string());
    assert_eq!(config.validate(), Err(ConfigurationError::MissingCustomUrl));

    config.translation.custom_api_url = Some("ftp://example.com/chat".to_string());
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::InvalidCustomUrl { .. })
    ));

    config.translation.custom_api_url = Some("not a url".to_string());
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::InvalidCustomUrl { .. })
    ));

    config.translation.custom_api_url = Some("http://localhost:8000/v1/chat/completions".to_string());
    assert!(config.validate().is_ok());

    config.batch.concurrency = 0;
    assert_eq!(config.validate(), Err(ConfigurationError::InvalidConcurrency));
}

/// Provider names parse case-insensitively
#[test]
fn test_provider_from_str_withMixedCase_shouldParse() {
    assert_eq!(" Aliyun ".parse::<TranslationProvider>(), Ok(TranslationProvider::Aliyun));
    assert_eq!("CUSTOM".parse::<TranslationProvider>(), Ok(TranslationProvider::Custom));
    assert!("deepl".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Volcano.to_lowercase_string(), "volcano");
}

/// A missing file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.batch.concurrency, 3);

    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.translation.model_name, config.translation.model_name);
}

/// A malformed file is an error, not silently replaced
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_or_create(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
