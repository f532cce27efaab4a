/*!
 * Notebook document model.
 *
 * [`NotebookDocument`] is the narrow view of a document the translation
 * pipeline depends on: count cells, read one cell, insert new cells.
 * [`Notebook`] implements it for Jupyter `.ipynb` files (nbformat 4), keeping
 * every field it does not interpret so a load/save round trip is lossless.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use crate::errors::NotebookError;
use crate::file_utils::FileManager;

/// Kind of a notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    Raw,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Code => write!(f, "code"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// Read-only copy of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSnapshot {
    pub kind: CellKind,
    pub text: String,
}

/// A cell to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCell {
    pub kind: CellKind,
    pub text: String,
}

impl NewCell {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            text: text.into(),
        }
    }
}

/// Host document collaborator
pub trait NotebookDocument {
    /// Number of cells
    fn cell_count(&self) -> usize;

    /// Cell at `index`, or `None` past the end
    fn cell_at(&self, index: usize) -> Option<CellSnapshot>;

    /// Insert `cells` so the first one ends up at `index`
    fn insert_cells_at(&mut self, index: usize, cells: Vec<NewCell>) -> Result<(), NotebookError>;
}

/// Cell source: nbformat allows a single string or a list of lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl CellSource {
    /// Split text into lines the way Jupyter stores them
    pub fn from_text(text: &str) -> Self {
        Self::Lines(text.split_inclusive('\n').map(str::to_string).collect())
    }

    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

/// One cell of an `.ipynb` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellKind,

    /// Present from nbformat 4.5 on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default)]
    pub source: CellSource,

    /// outputs, execution_count, attachments, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    pub fn text(&self) -> String {
        self.source.text()
    }
}

/// Jupyter notebook, nbformat 4
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    pub nbformat: u32,

    pub nbformat_minor: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            metadata: Map::new(),
            nbformat: 4,
            nbformat_minor: 5,
            extra: Map::new(),
        }
    }
}

impl Notebook {
    /// Build a notebook from (kind, text) pairs
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (CellKind, S)>,
        S: AsRef<str>,
    {
        let mut notebook = Self::default();
        let cells: Vec<Cell> = cells
            .into_iter()
            .map(|(kind, text)| notebook.new_cell(kind, text.as_ref()))
            .collect();
        notebook.cells = cells;
        notebook
    }

    /// Parse notebook JSON
    pub fn from_json(content: &str) -> Result<Self, NotebookError> {
        let notebook: Notebook = serde_json::from_str(content)?;
        if notebook.nbformat < 4 {
            return Err(NotebookError::Parse(format!(
                "nbformat {} is not supported, convert the notebook to version 4",
                notebook.nbformat
            )));
        }
        Ok(notebook)
    }

    /// Serialize the way Jupyter does: one-space indent, trailing newline
    pub fn to_json(&self) -> Result<String, NotebookError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        buffer.push(b'\n');
        String::from_utf8(buffer).map_err(|e| NotebookError::Parse(e.to_string()))
    }

    /// Load a notebook file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NotebookError> {
        let content = FileManager::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the notebook atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), NotebookError> {
        let json = self.to_json()?;
        FileManager::write_atomic(path, &json)?;
        Ok(())
    }

    /// Whether cells carry an `id` field (nbformat 4.5+)
    fn uses_cell_ids(&self) -> bool {
        self.nbformat > 4 || (self.nbformat == 4 && self.nbformat_minor >= 5)
    }

    fn new_cell(&self, kind: CellKind, text: &str) -> Cell {
        let mut extra = Map::new();
        if kind == CellKind::Code {
            extra.insert("execution_count".to_string(), Value::Null);
            extra.insert("outputs".to_string(), Value::Array(Vec::new()));
        }

        Cell {
            cell_type: kind,
            id: self
                .uses_cell_ids()
                .then(|| Uuid::new_v4().simple().to_string()[..8].to_string()),
            metadata: Map::new(),
            source: CellSource::from_text(text),
            extra,
        }
    }
}

impl NotebookDocument for Notebook {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_at(&self, index: usize) -> Option<CellSnapshot> {
        self.cells.get(index).map(|cell| CellSnapshot {
            kind: cell.cell_type,
            text: cell.text(),
        })
    }

    fn insert_cells_at(&mut self, index: usize, cells: Vec<NewCell>) -> Result<(), NotebookError> {
        if index > self.cells.len() {
            return Err(NotebookError::IndexOutOfBounds {
                index,
                len: self.cells.len(),
            });
        }

        let new_cells: Vec<Cell> = cells
            .iter()
            .map(|cell| self.new_cell(cell.kind, &cell.text))
            .collect();
        self.cells.splice(index..index, new_cells);
        Ok(())
    }
}
