//! Column Schema Module
//! Explicit column-scan pass that turns a raw all-text table into a typed one.

use polars::prelude::*;

/// Cell values treated as missing, matched exactly.
pub const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Inferred kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Name and kind of a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// Whether a raw cell counts as missing.
pub fn is_missing(cell: &str) -> bool {
    NA_MARKERS.contains(&cell)
}

/// Scan a sequence of raw cells and decide the column kind.
///
/// A column with no present cells is `Float`, the kind an all-missing
/// numeric column gets.
pub fn classify<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> ColumnKind {
    let mut kind = None;
    for cell in cells.into_iter().flatten() {
        if is_missing(cell) {
            continue;
        }
        let cell = cell.trim();
        if cell.parse::<i64>().is_ok() {
            kind.get_or_insert(ColumnKind::Integer);
        } else if cell.parse::<f64>().is_ok() {
            kind = Some(ColumnKind::Float);
        } else {
            return ColumnKind::Text;
        }
    }
    kind.unwrap_or(ColumnKind::Float)
}

/// Infer a schema for every column of a raw table, in column order.
pub fn infer_schema(raw: &DataFrame) -> PolarsResult<Vec<ColumnSchema>> {
    raw.get_columns()
        .iter()
        .map(|column| {
            let kind = match column.dtype() {
                DataType::String => classify(column.as_materialized_series().str()?),
                dtype if dtype.is_integer() => ColumnKind::Integer,
                dtype if dtype.is_float() => ColumnKind::Float,
                _ => ColumnKind::Text,
            };
            Ok(ColumnSchema {
                name: column.name().to_string(),
                kind,
            })
        })
        .collect()
}

/// Build the typed table described by `schema` from a raw table.
pub fn apply_schema(raw: &DataFrame, schema: &[ColumnSchema]) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(schema.len());

    for entry in schema {
        let name: PlSmallStr = entry.name.as_str().into();
        let source = raw.column(&entry.name)?;

        // Columns that are already typed only need a cast
        if source.dtype() != &DataType::String {
            let target = match entry.kind {
                ColumnKind::Integer => DataType::Int64,
                ColumnKind::Float => DataType::Float64,
                ColumnKind::Text => DataType::String,
            };
            let series = source.as_materialized_series().cast(&target)?;
            columns.push(series.with_name(name).into());
            continue;
        }

        let cells = source.as_materialized_series().str()?;
        let column = match entry.kind {
            ColumnKind::Integer => {
                let values: Vec<Option<i64>> =
                    cells.into_iter().map(|c| parse_cell::<i64>(c)).collect();
                Column::new(name, values)
            }
            ColumnKind::Float => {
                let values: Vec<Option<f64>> =
                    cells.into_iter().map(|c| parse_cell::<f64>(c)).collect();
                Column::new(name, values)
            }
            ColumnKind::Text => {
                let values: Vec<Option<&str>> = cells
                    .into_iter()
                    .map(|c| c.filter(|v| !is_missing(v)))
                    .collect();
                Column::new(name, values)
            }
        };
        columns.push(column);
    }

    DataFrame::new(columns)
}

fn parse_cell<T: std::str::FromStr>(cell: Option<&str>) -> Option<T> {
    cell.filter(|v| !is_missing(v))
        .and_then(|v| v.trim().parse::<T>().ok())
}

/// Get list of column names.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Get list of numeric column names.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Text of a cell as it should be shown or written; nulls are `None`.
pub fn cell_text(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}
