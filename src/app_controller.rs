use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{AppError, ConfigurationError, TranslationError};
use crate::notebook::{CellKind, NewCell, Notebook, NotebookDocument};
use crate::providers::Transport;
use crate::translation::{BatchReport, BatchTranslator, TranslationService};
use crate::ui::HostUi;

// @module: Application controller for notebook translation

/// Timeout used by the connectivity check when none is configured
pub const CHECK_TIMEOUT_SECS: u64 = 10;

/// Command to run against a notebook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotebookCommand {
    /// Translate the cell at this index
    TranslateCell(usize),
    /// Translate every eligible Markdown cell
    TranslateAll,
}

impl NotebookCommand {
    /// Whether the user can stop this command midway
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::TranslateAll)
    }
}

/// Main application controller for notebook translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Service bound to the configured provider
    service: TranslationService,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let service = TranslationService::new(&config.translation)?;
        Ok(Self { config, service })
    }

    /// Create a controller that sends requests through `transport`
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let service = TranslationService::with_transport(&config.translation, transport)?;
        Ok(Self { config, service })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate the Markdown cell at `index` and insert the result right after it.
    ///
    /// Returns `false` without sending anything when `index` does not point at
    /// a Markdown cell. Cell content is not filtered on this path.
    pub async fn translate_cell<D, U>(&self, document: &mut D, ui: &U, index: usize) -> Result<bool, AppError>
    where
        D: NotebookDocument + ?Sized,
        U: HostUi + ?Sized,
    {
        let cell = match document.cell_at(index) {
            Some(cell) if cell.kind == CellKind::Markdown => cell,
            _ => {
                ui.notify("Please select a markdown cell to translate");
                return Ok(false);
            }
        };

        let progress = ui.begin_progress("Translating...", false);
        progress.report(0.0, &format!("Using {}", self.service.provider_name()));
        let result = self.service.translate_text(&cell.text).await;
        progress.finish();

        let translated = result?;
        document.insert_cells_at(index + 1, vec![NewCell::markdown(translated)])?;

        ui.notify(&format!(
            "Translation completed using {}!",
            self.service.provider_name()
        ));
        Ok(true)
    }

    /// Translate every eligible Markdown cell of `document`
    pub async fn translate_all<D, U>(&self, document: &mut D, ui: &U) -> BatchReport
    where
        D: NotebookDocument + ?Sized,
        U: HostUi + ?Sized,
    {
        let translator = BatchTranslator::new(self.service.clone(), self.config.batch.clone());
        translator.translate_all(document, ui).await
    }

    /// Load a notebook, run `command` on it and save it when cells were added.
    ///
    /// Writes to `output` when given, otherwise back to `input`. Returns
    /// whether the notebook was written.
    pub async fn run_notebook<U>(
        &self,
        input: &Path,
        output: Option<&Path>,
        command: NotebookCommand,
        ui: &U,
    ) -> Result<bool>
    where
        U: HostUi + ?Sized,
    {
        let start_time = Instant::now();

        let mut notebook = Notebook::load(input)
            .with_context(|| format!("Failed to load notebook: {}", input.display()))?;
        let cells_before = notebook.cell_count();
        debug!("Loaded {} cells from {}", cells_before, input.display());

        match command {
            NotebookCommand::TranslateCell(index) => {
                self.translate_cell(&mut notebook, ui, index).await?;
            }
            NotebookCommand::TranslateAll => {
                self.translate_all(&mut notebook, ui).await;
            }
        }

        if notebook.cell_count() == cells_before {
            debug!("No cells added, leaving {} untouched", input.display());
            return Ok(false);
        }

        let target = output.unwrap_or(input);
        notebook
            .save(target)
            .with_context(|| format!("Failed to save notebook: {}", target.display()))?;

        info!(
            "Saved {} new cell(s) to {} in {}.",
            notebook.cell_count() - cells_before,
            target.display(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(true)
    }

    /// Send a short sample through the configured provider
    pub async fn check_provider(&self) -> Result<String, TranslationError> {
        info!(
            "Checking {} with model {}",
            self.service.provider_name(),
            self.service.model_name()
        );
        self.service.test_connection().await
    }

    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
