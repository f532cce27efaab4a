/*!
 * Host UI collaborator.
 *
 * The translation pipeline talks to the user only through [`HostUi`]:
 * notifications, a yes/no confirmation, and a progress scope that can carry a
 * cancellation request. [`ConsoleUi`] is the terminal implementation used by
 * the `ipynbt` binary.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// User-facing side of a command
pub trait HostUi {
    /// Informational message
    fn notify(&self, message: &str);

    /// Something went partly wrong
    fn warn(&self, message: &str);

    /// The operation failed
    fn error(&self, message: &str);

    /// Ask the user to pick one of `options`; `None` when dismissed
    fn confirm(&self, message: &str, options: &[&str]) -> Option<String>;

    /// Open a progress scope for a long-running operation
    fn begin_progress(&self, title: &str, cancellable: bool) -> Box<dyn ProgressScope>;
}

/// Progress reporting for one operation
pub trait ProgressScope: Send + Sync {
    /// Advance by `increment_percent` (0-100 scale) and show `message`
    fn report(&self, increment_percent: f64, message: &str);

    /// Whether the user asked to stop
    fn is_cancellation_requested(&self) -> bool;

    /// Close the scope
    fn finish(&self);
}

/// Shared flag set when the user asks to stop, e.g. on Ctrl-C
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Turn interrupts into a cancellation request.
///
/// The first interrupt sets `cancellation` so the batch stops sending new
/// requests. Returns `true` when a second interrupt arrives and the caller
/// should exit, `false` when the interrupt source fails.
pub async fn cancel_on_interrupt<F, Fut>(mut interrupted: F, cancellation: CancellationFlag) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = interrupted().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        return false;
    }
    warn!("Cancellation requested, waiting for requests in flight. Press Ctrl-C again to quit.");
    cancellation.cancel();

    match interrupted().await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            false
        }
    }
}

/// Terminal UI: messages go through the logger, prompts through stdin
#[derive(Debug, Clone)]
pub struct ConsoleUi {
    /// Answer every confirmation with its first option
    assume_yes: bool,
    cancellation: CancellationFlag,
}

impl ConsoleUi {
    pub fn new(assume_yes: bool, cancellation: CancellationFlag) -> Self {
        Self {
            assume_yes,
            cancellation,
        }
    }

    /// Match an answer typed by the user against the offered options
    pub fn match_option(answer: &str, options: &[&str]) -> Option<String> {
        let answer = answer.trim();
        if answer.is_empty() {
            return None;
        }

        let initial = |s: &str| s.chars().next().map(|c| c.to_ascii_lowercase());

        options
            .iter()
            .copied()
            .find(|option| {
                option.eq_ignore_ascii_case(answer)
                    || (answer.chars().count() == 1 && initial(option) == initial(answer))
            })
            .map(str::to_string)
    }
}

impl HostUi for ConsoleUi {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }

    fn confirm(&self, message: &str, options: &[&str]) -> Option<String> {
        if self.assume_yes {
            return options.first().map(|option| option.to_string());
        }

        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{} [{}] ", message, options.join("/"));
        let _ = stderr.flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => Self::match_option(&answer, options),
            Err(e) => {
                error!("Failed to read answer: {}", e);
                None
            }
        }
    }

    fn begin_progress(&self, title: &str, cancellable: bool) -> Box<dyn ProgressScope> {
        Box::new(ConsoleProgress::new(
            title,
            cancellable.then(|| self.cancellation.clone()),
        ))
    }
}

/// indicatif progress bar on a 0-100 scale
pub struct ConsoleProgress {
    bar: ProgressBar,
    percent: Mutex<f64>,
    cancellation: Option<CancellationFlag>,
}

impl ConsoleProgress {
    fn new(title: &str, cancellation: Option<CancellationFlag>) -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {prefix} {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {percent}% {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_prefix(title.to_string());

        Self {
            bar,
            percent: Mutex::new(0.0),
            cancellation,
        }
    }
}

impl ProgressScope for ConsoleProgress {
    fn report(&self, increment_percent: f64, message: &str) {
        let mut percent = self.percent.lock();
        *percent = (*percent + increment_percent).clamp(0.0, 100.0);
        self.bar.set_position(percent.round() as u64);
        self.bar.set_message(message.to_string());
    }

    fn is_cancellation_requested(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled)
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
