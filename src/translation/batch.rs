/*!
 * Batch translation of every Markdown cell in a notebook.
 *
 * The orchestrator walks through `Collecting → Confirming → Running →
 * Reconciling → Done`:
 * - collects eligible Markdown cells in document order,
 * - asks the user before spending API calls,
 * - translates candidates with bounded concurrency, one request each,
 * - inserts each translation right after its source cell, highest index first,
 * - reports how many cells succeeded, failed or were cancelled.
 */

use log::{debug, error, info};
use std::fmt;

use crate::app_config::BatchConfig;
use crate::errors::{NotebookError, TranslationError};
use crate::notebook::{CellKind, NewCell, NotebookDocument};
use crate::ui::{HostUi, ProgressScope};

use super::concurrency::{ItemFailure, run_with_concurrency};
use super::core::TranslationService;
use super::eligibility::is_translatable;

/// Options offered by the confirmation prompt
pub const CONFIRM_OPTIONS: [&str; 2] = ["Yes", "No"];

/// A Markdown cell selected for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position of the cell when candidates were collected
    pub cell_index: usize,
    /// Cell text
    pub text: String,
}

/// A translated candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedCell {
    pub candidate: Candidate,
    pub translated_text: String,
}

/// Phase of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Collecting,
    Confirming,
    Running,
    Reconciling,
    Done,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Collecting => "collecting",
            Self::Confirming => "confirming",
            Self::Running => "running",
            Self::Reconciling => "reconciling",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// How a batch run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No eligible cells, nothing asked or sent
    NothingToTranslate,
    /// The user did not confirm
    Declined,
    /// Every candidate was attempted
    Completed,
    /// The user stopped the run; finished translations were still inserted
    Cancelled,
}

/// Summary of a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    /// Number of eligible cells found
    pub candidates: usize,
    pub successful: usize,
    pub failed: usize,
    /// Candidates skipped because of cancellation
    pub cancelled: usize,
    /// (cell index, error message) per failed candidate
    pub failures: Vec<(usize, String)>,
}

impl BatchReport {
    fn empty(outcome: BatchOutcome, candidates: usize) -> Self {
        Self {
            outcome,
            candidates,
            successful: 0,
            failed: 0,
            cancelled: 0,
            failures: Vec::new(),
        }
    }
}

/// Results split by kind
#[derive(Debug, Default)]
struct PartitionedResults {
    successes: Vec<TranslatedCell>,
    failures: Vec<ItemFailure<Candidate, TranslationError>>,
    cancelled: usize,
}

/// Collect eligible Markdown cells in index order
pub fn collect_candidates<D: NotebookDocument + ?Sized>(document: &D, options: &BatchConfig) -> Vec<Candidate> {
    (0..document.cell_count())
        .filter_map(|index| document.cell_at(index).map(|cell| (index, cell)))
        .filter(|(_, cell)| cell.kind == CellKind::Markdown)
        .filter(|(_, cell)| is_translatable(&cell.text, options.skip_code_blocks, options.skip_math_formulas))
        .map(|(cell_index, cell)| Candidate {
            cell_index,
            text: cell.text,
        })
        .collect()
}

/// Translations that could not be inserted, with the cell they belong to
pub type InsertFailures = Vec<(usize, NotebookError)>;

/// Insert each translation directly after its source cell.
///
/// Works from the highest index down: an insert only shifts cells after it,
/// so every index still to be processed stays valid. A failed insert does not
/// stop the remaining ones. Returns the number inserted and the failures.
pub fn reconcile<D: NotebookDocument + ?Sized>(
    document: &mut D,
    mut successes: Vec<TranslatedCell>,
) -> (usize, InsertFailures) {
    successes.sort_by(|a, b| b.candidate.cell_index.cmp(&a.candidate.cell_index));

    let mut inserted = 0;
    let mut failures = Vec::new();
    for success in successes {
        let cell_index = success.candidate.cell_index;
        match document.insert_cells_at(cell_index + 1, vec![NewCell::markdown(success.translated_text)]) {
            Ok(()) => {
                inserted += 1;
                debug!("Inserted translation of cell {} at {}", cell_index, cell_index + 1);
            }
            Err(e) => failures.push((cell_index, e)),
        }
    }

    (inserted, failures)
}

/// Batch translator for all Markdown cells of a notebook
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Concurrency and filter flags
    options: BatchConfig,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService, options: BatchConfig) -> Self {
        Self { service, options }
    }

    fn enter(phase: BatchPhase) {
        debug!("Batch translation phase: {}", phase);
    }

    /// Translate every eligible Markdown cell of `document`
    pub async fn translate_all<D, U>(&self, document: &mut D, ui: &U) -> BatchReport
    where
        D: NotebookDocument + ?Sized,
        U: HostUi + ?Sized,
    {
        Self::enter(BatchPhase::Collecting);
        let candidates = collect_candidates(&*document, &self.options);

        Self::enter(BatchPhase::Confirming);
        if candidates.is_empty() {
            ui.notify("No translatable Markdown cells found in this notebook");
            Self::enter(BatchPhase::Done);
            return BatchReport::empty(BatchOutcome::NothingToTranslate, 0);
        }

        let count = candidates.len();
        let prompt = format!(
            "Found {} Markdown cells to translate. This will create {} new cells. Continue?",
            count, count
        );
        if ui.confirm(&prompt, &CONFIRM_OPTIONS).as_deref() != Some(CONFIRM_OPTIONS[0]) {
            info!("Batch translation declined");
            Self::enter(BatchPhase::Done);
            return BatchReport::empty(BatchOutcome::Declined, count);
        }

        Self::enter(BatchPhase::Running);
        let progress = ui.begin_progress("Translating all Markdown cells...", true);
        let results = self.run(&candidates, &*progress).await;
        progress.finish();

        Self::enter(BatchPhase::Reconciling);
        let partitioned = Self::partition(results);
        let mut failures: Vec<(usize, String)> = partitioned
            .failures
            .iter()
            .map(|failure| {
                error!("Failed to translate cell {}: {}", failure.item.cell_index, failure.error);
                (failure.item.cell_index, failure.error.to_string())
            })
            .collect();
        let (successful, insert_failures) = reconcile(document, partitioned.successes);
        for (cell_index, e) in insert_failures {
            error!("Failed to insert translation of cell {}: {}", cell_index, e);
            failures.push((cell_index, e.to_string()));
        }
        failures.sort_by_key(|(cell_index, _)| *cell_index);

        Self::enter(BatchPhase::Done);
        let report = BatchReport {
            outcome: if partitioned.cancelled > 0 {
                BatchOutcome::Cancelled
            } else {
                BatchOutcome::Completed
            },
            candidates: count,
            successful,
            failed: failures.len(),
            cancelled: partitioned.cancelled,
            failures,
        };
        Self::announce(&report, ui);

        report
    }

    async fn run(
        &self,
        candidates: &[Candidate],
        progress: &dyn ProgressScope,
    ) -> Vec<Result<TranslatedCell, ItemFailure<Candidate, TranslationError>>> {
        let service = &self.service;

        run_with_concurrency(
            candidates,
            self.options.concurrency,
            move |candidate| async move {
                if progress.is_cancellation_requested() {
                    return Err(TranslationError::Cancelled);
                }

                let translated_text = service.translate_text(&candidate.text).await?;
                Ok(TranslatedCell {
                    candidate: candidate.clone(),
                    translated_text,
                })
            },
            |completed, total| {
                progress.report(
                    100.0 / total as f64,
                    &format!("{}/{} cells translated", completed, total),
                );
            },
        )
        .await
    }

    fn partition(
        results: Vec<Result<TranslatedCell, ItemFailure<Candidate, TranslationError>>>,
    ) -> PartitionedResults {
        let mut partitioned = PartitionedResults::default();

        for result in results {
            match result {
                Ok(success) => partitioned.successes.push(success),
                Err(failure) if failure.error.is_cancelled() => partitioned.cancelled += 1,
                Err(failure) => partitioned.failures.push(failure),
            }
        }

        partitioned
    }

    fn announce<U: HostUi + ?Sized>(report: &BatchReport, ui: &U) {
        let message = match report.outcome {
            BatchOutcome::Cancelled if report.failed > 0 => format!(
                "Translation cancelled by user: {} translated, {} failed, {} skipped.",
                report.successful, report.failed, report.cancelled
            ),
            BatchOutcome::Cancelled => format!(
                "Translation cancelled by user: {} translated, {} skipped.",
                report.successful, report.cancelled
            ),
            _ => format!(
                "Batch translation completed! {} successful, {} failed.",
                report.successful, report.failed
            ),
        };
        if report.failed > 0 {
            ui.warn(&message);
        } else {
            ui.notify(&message);
        }
    }
}
