/*!
 * Translation of notebook cells using AI providers.
 *
 * This module is split into several submodules:
 *
 * - `core`: one text in, one translated text out
 * - `eligibility`: which Markdown cells are worth translating
 * - `concurrency`: bounded-concurrency runner with per-item outcomes
 * - `batch`: the translate-all orchestrator
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOutcome, BatchPhase, BatchReport, BatchTranslator, Candidate};
pub use self::concurrency::{ItemFailure, ItemOutcome, run_with_concurrency};
pub use self::core::TranslationService;
pub use self::eligibility::is_translatable;

// Submodules
pub mod batch;
pub mod concurrency;
pub mod core;
pub mod eligibility;
