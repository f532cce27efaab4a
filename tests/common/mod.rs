/*!
 * Common test utilities for the ipynb-translator test suite
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use ipynb_translator::app_config::{Config, TranslationSettings};
use ipynb_translator::notebook::Notebook;
use ipynb_translator::ui::{HostUi, ProgressScope};

/// Initialise logging once for the whole test binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes `notebook` to `dir/filename` and returns the path
pub fn write_notebook(dir: &Path, filename: &str, notebook: &Notebook) -> Result<PathBuf> {
    let path = dir.join(filename);
    notebook.save(&path)?;
    Ok(path)
}

/// Settings for the OpenAI-compatible Aliyun provider with a test key
pub fn aliyun_settings() -> TranslationSettings {
    TranslationSettings {
        provider: "aliyun".to_string(),
        api_key: "test-key".to_string(),
        model_name: "qwen-turbo".to_string(),
        ..TranslationSettings::default()
    }
}

/// Valid configuration with the given concurrency
pub fn test_config(concurrency: usize) -> Config {
    let mut config = Config::default();
    config.translation = aliyun_settings();
    config.batch.concurrency = concurrency;
    config
}

/// Severity of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// HostUi that records everything and answers confirmations from a script
pub struct RecordingUi {
    answer: Option<String>,
    cancel_after: Option<usize>,
    messages: Mutex<Vec<(Severity, String)>>,
    confirmations: Mutex<Vec<String>>,
    scopes: Mutex<Vec<(String, bool)>>,
    reports: Arc<Mutex<Vec<(f64, String)>>>,
}

impl RecordingUi {
    /// UI that answers every confirmation with `answer`
    pub fn answering(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            cancel_after: None,
            messages: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            scopes: Mutex::new(Vec::new()),
            reports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// UI that confirms with "Yes"
    pub fn confirming() -> Self {
        Self::answering(Some("Yes"))
    }

    /// Request cancellation once `reports` progress reports were made
    pub fn cancel_after(mut self, reports: usize) -> Self {
        self.cancel_after = Some(reports);
        self
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.lock().clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().clone()
    }

    pub fn scopes(&self) -> Vec<(String, bool)> {
        self.scopes.lock().clone()
    }

    pub fn reports(&self) -> Vec<(f64, String)> {
        self.reports.lock().clone()
    }

    /// True when a message with this severity and text was shown
    pub fn saw(&self, severity: Severity, text: &str) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|(s, message)| *s == severity && message == text)
    }

    fn record(&self, severity: Severity, message: &str) {
        self.messages.lock().push((severity, message.to_string()));
    }
}

impl HostUi for RecordingUi {
    fn notify(&self, message: &str) {
        self.record(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.record(Severity::Error, message);
    }

    fn confirm(&self, message: &str, _options: &[&str]) -> Option<String> {
        self.confirmations.lock().push(message.to_string());
        self.answer.clone()
    }

    fn begin_progress(&self, title: &str, cancellable: bool) -> Box<dyn ProgressScope> {
        self.scopes.lock().push((title.to_string(), cancellable));
        Box::new(RecordingProgress {
            reports: Arc::clone(&self.reports),
            cancel_after: if cancellable { self.cancel_after } else { None },
        })
    }
}

struct RecordingProgress {
    reports: Arc<Mutex<Vec<(f64, String)>>>,
    cancel_after: Option<usize>,
}

impl ProgressScope for RecordingProgress {
    fn report(&self, increment_percent: f64, message: &str) {
        self.reports.lock().push((increment_percent, message.to_string()));
    }

    fn is_cancellation_requested(&self) -> bool {
        self.cancel_after
            .is_some_and(|limit| self.reports.lock().len() >= limit)
    }

    fn finish(&self) {}
}
