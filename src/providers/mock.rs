/*!
 * Mock transport for testing.
 *
 * This module provides a transport that never touches the network:
 * - `MockTransport::working()` - Always succeeds with `[TRANSLATED] <text>`
 * - `MockTransport::intermittent(n)` - Every nth request fails
 * - `MockTransport::failing()` - Always fails with an error
 *
 * Individual texts can be made to fail or to respond slowly, and the transport
 * records every request plus the peak number of requests in flight.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{PreparedRequest, Transport};
use crate::errors::ProviderError;

/// Behavior mode for the mock transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Fails every Nth request (1-based)
    Intermittent { fail_every: usize },
    /// Always fails with an API error
    Failing,
    /// Succeeds with a body that has no choices
    Empty,
}

/// Mock transport for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockTransport {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<PreparedRequest>>>,
    /// Texts containing any of these fragments time out
    timeouts_for: Vec<String>,
    /// Simulated latency per text
    delay_for: Option<fn(&str) -> u64>,
}

impl MockTransport {
    /// Create a new mock transport with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            timeouts_for: Vec::new(),
            delay_for: None,
        }
    }

    /// Create a working mock transport that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock transport
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock transport that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers with an empty `choices` array
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Make requests whose text contains `fragment` time out
    pub fn with_timeout_for(mut self, fragment: impl Into<String>) -> Self {
        self.timeouts_for.push(fragment.into());
        self
    }

    /// Delay each response by `delay(text)` milliseconds
    pub fn with_delay(mut self, delay: fn(&str) -> u64) -> Self {
        self.delay_for = Some(delay);
        self
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in arrival order
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().clone()
    }

    /// Text of the last message, which carries the cell content
    fn request_text(request: &PreparedRequest) -> String {
        request
            .body
            .messages
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default()
    }

    /// Response body in the OpenAI-compatible shape
    pub fn completion(content: &str) -> Value {
        json!({
            "id": "mock-completion",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }
            ]
        })
    }

    async fn respond(&self, count: usize, text: &str) -> Result<Value, ProviderError> {
        if let Some(delay) = self.delay_for {
            tokio::time::sleep(Duration::from_millis(delay(text))).await;
        }

        if self.timeouts_for.iter().any(|fragment| text.contains(fragment.as_str())) {
            return Err(ProviderError::Timeout("mock request timed out".to_string()));
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::completion(&format!("[TRANSLATED] {}", text))),
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == 0 => {
                Err(ProviderError::ApiError {
                    status_code: 500,
                    message: format!("mock failure on request {}", count),
                })
            }
            MockBehavior::Intermittent { .. } => Ok(Self::completion(&format!("[TRANSLATED] {}", text))),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 503,
                message: "mock provider unavailable".to_string(),
            }),
            MockBehavior::Empty => Ok(json!({"choices": []})),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: &PreparedRequest) -> Result<Value, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().push(request.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let text = Self::request_text(request);
        let result = self.respond(count, &text).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
