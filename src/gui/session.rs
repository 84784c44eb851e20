//! Per-file sessions
//! Each uploaded file owns its table and UI selections; the widgets only
//! call into these objects.

use crate::charts::{ChartPlotter, ChartSeries};
use crate::config::SweeperConfig;
use crate::data::{numeric_columns, DataCleaner, FileLoader, LoaderError, TableFormat, UploadedFile};
use crate::export::{ExportArtifact, ExportError, TableExporter};
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

/// Non-fatal conditions reported next to a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepWarning {
    #[error("No numeric columns available for visualization.")]
    NoNumericColumns,
    #[error("Column '{column}' has no values to average; missing cells left as is.")]
    UndefinedMean { column: String },
}

/// Message shown in a file's section
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

/// State of one uploaded file.
pub struct FileSession {
    pub file_name: String,
    pub size_bytes: usize,
    table: DataFrame,
    numeric_columns: Vec<String>,
    pub selected_columns: Vec<String>,
    pub target_format: TableFormat,
    pub artifact: Option<ExportArtifact>,
    pub notices: Vec<Notice>,
}

impl FileSession {
    /// Load `file` and pre-select the first numeric columns for charting.
    pub fn open(file: UploadedFile, config: &SweeperConfig) -> Result<Self, LoaderError> {
        let table = FileLoader::load(&file.name, &file.bytes)?;
        let numeric_columns = numeric_columns(&table);
        let selected_columns = numeric_columns
            .iter()
            .take(config.default_chart_columns)
            .cloned()
            .collect();

        Ok(Self {
            size_bytes: file.size(),
            file_name: file.name,
            table,
            numeric_columns,
            selected_columns,
            target_format: TableFormat::default(),
            artifact: None,
            notices: Vec::new(),
        })
    }

    pub fn table(&self) -> &DataFrame {
        &self.table
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    /// File size in KB, rounded to two decimals.
    pub fn size_kb(&self) -> f64 {
        (self.size_bytes as f64 / 1024.0 * 100.0).round() / 100.0
    }

    /// First `rows` rows of the current table.
    pub fn preview(&self, rows: usize) -> DataFrame {
        self.table.head(Some(rows))
    }

    /// Returns the number of rows removed.
    pub fn remove_duplicates(&mut self) -> PolarsResult<usize> {
        let before = self.table.height();
        let table = DataCleaner::remove_duplicates(&self.table)?;
        let removed = before - table.height();

        self.replace_table(table);
        self.notices.push(Notice::Success(format!(
            "Duplicates Removed! ({} rows dropped)",
            removed
        )));
        Ok(removed)
    }

    /// Returns the number of cells filled.
    pub fn fill_missing(&mut self) -> PolarsResult<usize> {
        let outcome = DataCleaner::fill_missing_numeric(&self.table)?;

        self.replace_table(outcome.table);
        self.notices.push(Notice::Success(format!(
            "Missing Values have been Filled! ({} cells)",
            outcome.filled_cells
        )));
        for column in outcome.undefined_mean_columns {
            let warning = SweepWarning::UndefinedMean { column };
            warn!(file = %self.file_name, "{}", warning);
            self.notices.push(Notice::Warning(warning.to_string()));
        }
        Ok(outcome.filled_cells)
    }

    /// Add or remove a column from the chart selection.
    pub fn toggle_column(&mut self, column: &str) {
        if let Some(pos) = self.selected_columns.iter().position(|c| c == column) {
            self.selected_columns.remove(pos);
        } else if self.numeric_columns.iter().any(|c| c == column) {
            self.selected_columns.push(column.to_string());
        }
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected_columns.iter().any(|c| c == column)
    }

    pub fn chart_series(&self) -> PolarsResult<Vec<ChartSeries>> {
        ChartPlotter::series_for(&self.table, &self.selected_columns)
    }

    pub fn chart_warning(&self) -> Option<SweepWarning> {
        self.numeric_columns
            .is_empty()
            .then_some(SweepWarning::NoNumericColumns)
    }

    pub fn set_target_format(&mut self, format: TableFormat) {
        if self.target_format != format {
            self.target_format = format;
            self.artifact = None;
        }
    }

    /// Serialize the current table in the target format and keep the result.
    pub fn convert(&mut self) -> Result<&ExportArtifact, ExportError> {
        let artifact = TableExporter::export(&self.table, &self.file_name, self.target_format)?;
        Ok(self.artifact.insert(artifact))
    }

    fn replace_table(&mut self, table: DataFrame) {
        self.table = table;
        self.numeric_columns = numeric_columns(&self.table);
        let numeric = &self.numeric_columns;
        self.selected_columns.retain(|c| numeric.contains(c));
        self.artifact = None;
    }
}

/// A file that could not be opened
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

/// All open sessions, in upload order.
#[derive(Default)]
pub struct SweepBatch {
    pub sessions: Vec<FileSession>,
    pub failures: Vec<UploadFailure>,
}

impl SweepBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open every file; failures are recorded and do not stop the rest.
    pub fn ingest(&mut self, files: Vec<UploadedFile>, config: &SweeperConfig) {
        for file in files {
            let file_name = file.name.clone();
            self.failures.retain(|f| f.file_name != file_name);

            match FileSession::open(file, config) {
                Ok(session) => {
                    info!(file = %file_name, "Opened file");
                    if let Some(existing) = self
                        .sessions
                        .iter_mut()
                        .find(|s| s.file_name == file_name)
                    {
                        *existing = session;
                    } else {
                        self.sessions.push(session);
                    }
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Skipping file");
                    self.failures.push(UploadFailure {
                        file_name,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// Record a file that could not even be read from disk.
    pub fn record_failure(&mut self, file_name: String, message: String) {
        warn!(file = %file_name, error = %message, "Could not read file");
        self.failures.push(UploadFailure { file_name, message });
    }

    pub fn close(&mut self, index: usize) {
        if index < self.sessions.len() {
            let session = self.sessions.remove(index);
            info!(file = %session.file_name, "Closed file");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.failures.is_empty()
    }
}
