//! File Loader Module
//! Turns uploaded CSV / XLSX bytes into a typed DataFrame using Polars and calamine.

use super::format::{extension_of, TableFormat};
use super::schema::{apply_schema, infer_schema};
use calamine::{Data, ExcelDateTime, Reader, Xlsx, XlsxError};
use chrono::NaiveTime;
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },
    #[error("Failed to parse table: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to load spreadsheet: {0}")]
    Spreadsheet(#[from] XlsxError),
}

/// A file handed to the application, either picked or dropped.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Parses uploaded bytes into tables.
pub struct FileLoader;

impl FileLoader {
    /// Load a file, picking the parser from the extension of `name`.
    pub fn load(name: &str, bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let format =
            TableFormat::from_name(name).ok_or_else(|| LoaderError::UnsupportedFormat {
                extension: extension_of(name),
            })?;

        let raw = match format {
            TableFormat::Csv => Self::read_csv(bytes)?,
            TableFormat::Xlsx => Self::read_xlsx(bytes)?,
        };

        let schema = infer_schema(&raw)?;
        debug!(file = name, ?schema, "Inferred column schema");
        let df = apply_schema(&raw, &schema)?;

        info!(
            file = name,
            rows = df.height(),
            columns = df.width(),
            "Loaded table"
        );
        Ok(df)
    }

    /// Read CSV bytes with every column as text.
    fn read_csv(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(DataFrame::empty());
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Ok(df)
    }

    /// Read the first worksheet with every cell as text.
    ///
    /// The table is anchored at the top-left cell of the sheet's used range,
    /// so leading blank rows and columns are skipped and the first used row
    /// is the header.
    fn read_xlsx(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Ok(DataFrame::empty()),
        };

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(DataFrame::empty());
        };

        let names = Self::header_names(header);
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(row.get(i).and_then(Self::xlsx_cell_text));
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name.into(), values))
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    /// Header names with blanks filled in and repeats made unique.
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();

        header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let base = Self::xlsx_cell_text(cell)
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| format!("Unnamed: {}", i));

                let mut name = base.clone();
                let mut suffix = 0;
                while seen.contains(&name) {
                    suffix += 1;
                    name = format!("{}.{}", base, suffix);
                }
                seen.insert(name.clone());
                name
            })
            .collect()
    }

    fn xlsx_cell_text(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
            Data::DateTime(value) => Some(Self::excel_datetime_text(value)),
            other => Some(other.to_string()),
        }
    }

    /// Dates as `YYYY-MM-DD`, adding the time when it is not midnight.
    /// Times of day are `HH:MM:SS` and durations `<d> days HH:MM:SS`.
    fn excel_datetime_text(value: &ExcelDateTime) -> String {
        if value.is_duration() {
            if let Some(duration) = value.as_duration() {
                let total = duration.num_seconds();
                return format!(
                    "{} days {:02}:{:02}:{:02}",
                    total / 86_400,
                    total % 86_400 / 3_600,
                    total % 3_600 / 60,
                    total % 60
                );
            }
        } else if let Some(datetime) = value.as_datetime() {
            let pattern = if (0.0..1.0).contains(&value.as_f64()) {
                "%H:%M:%S"
            } else if datetime.time() == NaiveTime::MIN {
                "%Y-%m-%d"
            } else {
                "%Y-%m-%d %H:%M:%S"
            };
            return datetime.format(pattern).to_string();
        }
        value.as_f64().to_string()
    }
}
