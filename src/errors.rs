/*!
 * Error types for the ipynb-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors detected while validating settings, before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No API key configured
    #[error("API key is not configured")]
    MissingApiKey,

    /// The `custom` provider was selected without an endpoint
    #[error("Custom API URL is required for the custom provider")]
    MissingCustomUrl,

    /// The custom endpoint is not an absolute http(s) URL
    #[error("Invalid custom API URL '{url}': {reason}")]
    InvalidCustomUrl {
        /// The offending URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Provider name not known to the adapter
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Concurrency below one
    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,

    /// The HTTP client could not be built, e.g. no TLS backend
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors that can occur when talking to a provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The response parsed as JSON but lacks `choices[0].message.content`
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Errors that can occur during translation of one text
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Settings were rejected before any request
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The user asked to stop before this item was sent
    #[error("Cancelled by user")]
    Cancelled,
}

impl TranslationError {
    /// Whether this error is the cooperative cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors raised by notebook documents
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The file is not a valid nbformat 4 document
    #[error("Failed to parse notebook: {0}")]
    Parse(String),

    /// Reading or writing the notebook failed
    #[error("Notebook I/O error: {0}")]
    Io(String),

    /// Insert position past the end of the cell list
    #[error("Cell index {index} out of bounds (notebook has {len} cells)")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of cells
        len: usize,
    },
}

/// Errors from a single-cell translation command
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the notebook document
    #[error("Notebook error: {0}")]
    Notebook(#[from] NotebookError),
}

// Utility functions for error conversion
impl From<std::io::Error> for NotebookError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for NotebookError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
