//! Table file formats understood by the loader and the exporter.

use std::path::Path;

/// MIME type of an exported XLSX workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Tabular file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Comma separated text
    #[default]
    Csv,
    /// Office Open XML workbook
    Xlsx,
}

impl TableFormat {
    pub const ALL: [TableFormat; 2] = [TableFormat::Csv, TableFormat::Xlsx];

    /// Detect the format from a file name's extension (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match extension_of(name).to_ascii_lowercase().as_str() {
            ".csv" => Some(TableFormat::Csv),
            ".xlsx" => Some(TableFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            TableFormat::Csv => "text/csv",
            TableFormat::Xlsx => XLSX_MIME,
        }
    }

    /// Label shown next to the conversion radio buttons.
    pub fn label(&self) -> &'static str {
        match self {
            TableFormat::Csv => "CSV",
            TableFormat::Xlsx => "Excel",
        }
    }
}

/// Extension of `name` including the leading dot, or an empty string.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// File name with its last extension stripped.
pub fn base_name(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string())
}
