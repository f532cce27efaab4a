/*!
 * # ipynb-translator - Translate Jupyter notebook Markdown cells with AI
 *
 * A Rust library that translates the Markdown cells of `.ipynb` notebooks
 * through OpenAI-style chat-completion APIs and inserts each translation right
 * after its source cell.
 *
 * ## Features
 *
 * - Translate a single cell or every eligible Markdown cell of a notebook
 * - Providers:
 *   - Zhipu (BigModel)
 *   - Aliyun DashScope (OpenAI-compatible mode)
 *   - Volcano Engine Ark
 *   - Any custom OpenAI-compatible endpoint
 * - Skip cells made only of code blocks or math formulas
 * - Bounded request concurrency with per-cell failures
 * - Cooperative cancellation of a running batch
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `notebook`: `.ipynb` document model and the `NotebookDocument` trait
 * - `translation`: Translation services:
 *   - `translation::core`: One text in, one translation out
 *   - `translation::eligibility`: Markdown cell filter
 *   - `translation::concurrency`: Bounded-concurrency runner
 *   - `translation::batch`: Translate-all orchestrator
 * - `providers`: Provider request/response strategies and HTTP transport
 * - `ui`: Host UI collaborator and its console implementation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod notebook;
pub mod providers;
pub mod translation;
pub mod ui;

// Re-export main types for easier usage
pub use app_config::{BatchConfig, Config, TranslationProvider, TranslationSettings};
pub use app_controller::{Controller, NotebookCommand};
pub use errors::{AppError, ConfigurationError, NotebookError, ProviderError, TranslationError};
pub use notebook::{CellKind, CellSnapshot, NewCell, Notebook, NotebookDocument};
pub use translation::{BatchOutcome, BatchReport, BatchTranslator, TranslationService};
pub use ui::{CancellationFlag, ConsoleUi, HostUi, ProgressScope};
