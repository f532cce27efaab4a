/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which turns one
 * text into one translated text using the configured provider.
 */

use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationSettings;
use crate::errors::{ConfigurationError, TranslationError};
use crate::providers::{HttpTransport, ProviderAdapter, Transport};

/// Text sent by the connection check
pub const CONNECTION_TEST_TEXT: &str = "Hello, world!";

/// Translation service that sends one request per text
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Provider strategy bound to key, model and prompt
    adapter: ProviderAdapter,

    /// Where requests go
    transport: Arc<dyn Transport>,
}

impl TranslationService {
    /// Create a service over HTTP, honoring the configured timeout
    pub fn new(settings: &TranslationSettings) -> Result<Self, ConfigurationError> {
        let timeout = settings.timeout_secs.map(Duration::from_secs);
        Self::with_transport(settings, Arc::new(HttpTransport::new(timeout)?))
    }

    /// Create a service with an explicit transport
    pub fn with_transport(
        settings: &TranslationSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            adapter: ProviderAdapter::new(settings)?,
            transport,
        })
    }

    /// Provider identifier, e.g. "zhipu"
    pub fn provider_name(&self) -> &str {
        self.adapter.provider_name()
    }

    /// Model used for requests
    pub fn model_name(&self) -> &str {
        self.adapter.model_name()
    }

    /// Translate one text with a single request
    pub async fn translate_text(&self, text: &str) -> Result<String, TranslationError> {
        let request = self.adapter.build_request(text);
        let start_time = Instant::now();

        let response = self.transport.post_json(&request).await?;
        let translated = self.adapter.extract_text(&response)?;

        debug!(
            "Translated {} chars into {} chars via {} in {:?}",
            text.chars().count(),
            translated.chars().count(),
            self.provider_name(),
            start_time.elapsed()
        );

        Ok(translated)
    }

    /// Send a short sample text and return the translation
    pub async fn test_connection(&self) -> Result<String, TranslationError> {
        self.translate_text(CONNECTION_TEST_TEXT).await
    }
}
