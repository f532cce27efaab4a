use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

use crate::errors::ConfigurationError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Provider and prompt settings
    #[serde(default)]
    pub translation: TranslationSettings,

    /// Settings for translating a whole notebook
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Zhipu BigModel (GLM)
    #[default]
    Zhipu,
    // @provider: Aliyun DashScope, OpenAI-compatible mode
    Aliyun,
    // @provider: Volcano Engine Ark
    Volcano,
    // @provider: any OpenAI-compatible endpoint given by URL
    Custom,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Zhipu => "Zhipu",
            Self::Aliyun => "Aliyun",
            Self::Volcano => "Volcano",
            Self::Custom => "Custom",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Zhipu => "zhipu".to_string(),
            Self::Aliyun => "aliyun".to_string(),
            Self::Volcano => "volcano".to_string(),
            Self::Custom => "custom".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zhipu" => Ok(Self::Zhipu),
            "aliyun" => Ok(Self::Aliyun),
            "volcano" => Ok(Self::Volcano),
            "custom" => Ok(Self::Custom),
            _ => Err(ConfigurationError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// Everything needed to send one translation request except the text itself
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationSettings {
    /// Provider name; kept as a string so unknown names surface as a
    /// configuration error instead of a parse failure
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key, sent as a bearer token
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name (e.g., "glm-4-flash", "qwen-turbo")
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Instruction sent with every cell
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Endpoint for the `custom` provider
    #[serde(default)]
    pub custom_api_url: Option<String>,

    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model_name: default_model_name(),
            system_prompt: default_system_prompt(),
            custom_api_url: None,
            timeout_secs: None,
        }
    }
}

impl TranslationSettings {
    /// Parse the configured provider name
    pub fn provider_kind(&self) -> Result<TranslationProvider, ConfigurationError> {
        self.provider.parse()
    }

    /// Custom URL with blank values treated as absent
    pub fn custom_url(&self) -> Option<&str> {
        self.custom_api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Check the settings the way every request will need them
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingApiKey);
        }

        if self.provider_kind()? == TranslationProvider::Custom {
            let url = self.custom_url().ok_or(ConfigurationError::MissingCustomUrl)?;
            validate_endpoint(url)?;
        }

        Ok(())
    }
}

/// Settings for batch translation of all Markdown cells
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Maximum number of simultaneous requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Skip cells made only of fenced code
    #[serde(default = "default_true")]
    pub skip_code_blocks: bool,

    /// Skip cells made only of math
    #[serde(default = "default_true")]
    pub skip_math_formulas: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            skip_code_blocks: true,
            skip_math_formulas: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_provider() -> String {
    "zhipu".to_string()
}

fn default_model_name() -> String {
    "glm-4-flash".to_string()
}

fn default_system_prompt() -> String {
    "请将以下Markdown文本翻译成中文，只返回翻译后的内容，不要包含任何额外说明或Markdown语法外的字符：".to_string()
}

fn default_concurrency() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn validate_endpoint(url: &str) -> Result<(), ConfigurationError> {
    let parsed = Url::parse(url).map_err(|e| ConfigurationError::InvalidCustomUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigurationError::InvalidCustomUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.translation.validate()?;

        if self.batch.concurrency == 0 {
            return Err(ConfigurationError::InvalidConcurrency);
        }

        Ok(())
    }

    /// Load the configuration at `path`, writing a default one first if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
