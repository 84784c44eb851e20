//! Export module - CSV / XLSX serialization and download packaging

mod xlsx;

pub use xlsx::XlsxWriter;

use crate::data::{base_name, TableFormat};
use polars::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to write workbook: {0}")]
    Archive(#[from] ::zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A ready-to-download file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes tables into downloadable artifacts.
pub struct TableExporter;

impl TableExporter {
    /// Export `df` in `format`, naming the file after `source_name`.
    pub fn export(
        df: &DataFrame,
        source_name: &str,
        format: TableFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let bytes = match format {
            TableFormat::Csv => Self::to_csv(df)?,
            TableFormat::Xlsx => XlsxWriter::write_to_bytes(df)?,
        };

        let artifact = ExportArtifact {
            file_name: format!("{}.{}", base_name(source_name), format.extension()),
            mime_type: format.mime_type(),
            bytes,
        };

        info!(
            file = %artifact.file_name,
            bytes = artifact.bytes.len(),
            "Exported table"
        );
        Ok(artifact)
    }

    /// UTF-8 CSV with a header row and no index column.
    fn to_csv(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        if df.width() == 0 {
            return Ok(buffer);
        }

        let mut df = df.clone();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(&mut df)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{column_names, DataCleaner, FileLoader};

    #[test]
    fn scenario_exports_exact_csv() {
        let df = FileLoader::load("f.csv", b"a,b\n1,2\n1,2\n,4\n").unwrap();
        let df = DataCleaner::remove_duplicates(&df).unwrap();
        let df = DataCleaner::fill_missing_numeric(&df).unwrap().table;

        let artifact = TableExporter::export(&df, "f.csv", TableFormat::Csv).unwrap();
        assert_eq!(artifact.file_name, "f.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert_eq!(String::from_utf8(artifact.bytes).unwrap(), "a,b\n1,2\n1,4\n");
    }

    #[test]
    fn csv_round_trip_keeps_shape() {
        let source = b"id,city,score\n1,\"Lyon, FR\",2.5\n2,\"say \"\"hi\"\"\",\n3,Oslo,4\n";
        let df = FileLoader::load("cities.csv", source).unwrap();

        let artifact = TableExporter::export(&df, "cities.csv", TableFormat::Csv).unwrap();
        let reloaded = FileLoader::load(&artifact.file_name, &artifact.bytes).unwrap();

        assert_eq!(column_names(&reloaded), column_names(&df));
        assert_eq!(reloaded.height(), df.height());
        assert!(reloaded.equals_missing(&df));
    }

    #[test]
    fn whitespace_cells_survive_csv_round_trip() {
        let df = FileLoader::load("w.csv", b"a,b\n\" \",2\n").unwrap();
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("a").unwrap().null_count(), 0);

        let artifact = TableExporter::export(&df, "w.csv", TableFormat::Csv).unwrap();
        let reloaded = FileLoader::load(&artifact.file_name, &artifact.bytes).unwrap();
        let a = reloaded.column("a").unwrap().as_materialized_series().str().unwrap().get(0);
        assert_eq!(a, Some(" "));
    }

    #[test]
    fn xlsx_artifact_is_named_after_source() {
        let df = df!("a" => [1i64]).unwrap();

        let artifact = TableExporter::export(&df, "monthly.report.csv", TableFormat::Xlsx).unwrap();
        assert_eq!(artifact.file_name, "monthly.report.xlsx");
        assert_eq!(
            artifact.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        // ZIP local file header
        assert!(artifact.bytes.starts_with(b"PK"));
    }

    #[test]
    fn xlsx_round_trip_keeps_values() {
        let df = FileLoader::load(
            "mixed.csv",
            b"id,label,ratio\n1,alpha,0.5\n2,,1.25\n3,<gamma>,\n",
        )
        .unwrap();

        let artifact = TableExporter::export(&df, "mixed.csv", TableFormat::Xlsx).unwrap();
        let reloaded = FileLoader::load(&artifact.file_name, &artifact.bytes).unwrap();

        assert_eq!(column_names(&reloaded), vec!["id", "label", "ratio"]);
        assert_eq!(reloaded.height(), 3);
        assert!(reloaded.equals_missing(&df));
    }

    #[test]
    fn empty_table_exports_empty_csv() {
        let artifact = TableExporter::export(&DataFrame::empty(), "empty.csv", TableFormat::Csv).unwrap();
        assert!(artifact.bytes.is_empty());
    }
}
