//! Data Cleaner Module
//! Duplicate-row removal and mean imputation of missing numeric cells.

use super::schema::numeric_columns;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Result of a mean-fill pass.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub table: DataFrame,
    /// Number of cells that received a mean value
    pub filled_cells: usize,
    /// Numeric columns with no values to average, left untouched
    pub undefined_mean_columns: Vec<String>,
}

/// Exact identity of a cell when comparing rows.
///
/// Floats compare by bit pattern with `-0.0` folded into `0.0` and every NaN
/// folded into one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Missing,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Text(String),
}

impl CellKey {
    fn of(value: &AnyValue) -> Self {
        match value {
            AnyValue::Null => CellKey::Missing,
            AnyValue::Boolean(v) => CellKey::Bool(*v),
            AnyValue::Int8(v) => CellKey::Int(i64::from(*v)),
            AnyValue::Int16(v) => CellKey::Int(i64::from(*v)),
            AnyValue::Int32(v) => CellKey::Int(i64::from(*v)),
            AnyValue::Int64(v) => CellKey::Int(*v),
            AnyValue::UInt8(v) => CellKey::UInt(u64::from(*v)),
            AnyValue::UInt16(v) => CellKey::UInt(u64::from(*v)),
            AnyValue::UInt32(v) => CellKey::UInt(u64::from(*v)),
            AnyValue::UInt64(v) => CellKey::UInt(*v),
            AnyValue::Float32(v) => Self::float(f64::from(*v)),
            AnyValue::Float64(v) => Self::float(*v),
            AnyValue::String(s) => CellKey::Text(s.to_string()),
            AnyValue::StringOwned(s) => CellKey::Text(s.to_string()),
            other => CellKey::Text(format!("{:?}", other)),
        }
    }

    fn float(value: f64) -> Self {
        let value = if value.is_nan() {
            f64::NAN
        } else if value == 0.0 {
            0.0
        } else {
            value
        };
        CellKey::Float(value.to_bits())
    }
}

/// Handles data cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop rows that repeat an earlier row across all columns.
    ///
    /// The first occurrence is kept and surviving rows keep their order.
    /// Cells compare by exact value and missing cells compare equal to each
    /// other.
    pub fn remove_duplicates(df: &DataFrame) -> PolarsResult<DataFrame> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(df.clone());
        }

        let columns: Vec<&Series> = df
            .get_columns()
            .iter()
            .map(|c| c.as_materialized_series())
            .collect();

        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(df.height());
        let mut keep = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let key = columns
                .iter()
                .map(|series| series.get(row).map(|value| CellKey::of(&value)))
                .collect::<PolarsResult<Vec<_>>>()?;
            keep.push(seen.insert(key));
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let deduped = df.filter(&mask)?;

        info!(
            removed = df.height() - deduped.height(),
            remaining = deduped.height(),
            "Removed duplicate rows"
        );
        Ok(deduped)
    }

    /// Replace missing cells of every numeric column with the column mean.
    ///
    /// Integer columns whose mean is a whole number stay integer, all other
    /// filled columns become `Float64`. Text columns are not touched.
    pub fn fill_missing_numeric(df: &DataFrame) -> PolarsResult<FillOutcome> {
        let mut table = df.clone();
        let mut filled_cells = 0;
        let mut undefined_mean_columns = Vec::new();

        for name in numeric_columns(df) {
            let series = df.column(&name)?.as_materialized_series();
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }

            let Some(mean) = series.mean() else {
                debug!(column = %name, "No values to average, leaving column as is");
                undefined_mean_columns.push(name);
                continue;
            };

            let filled = if series.dtype().is_integer() && Self::is_whole(mean) {
                let values: Vec<i64> = series
                    .cast(&DataType::Int64)?
                    .i64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(mean as i64))
                    .collect();
                Series::new(series.name().clone(), values)
            } else {
                let values: Vec<f64> = series
                    .cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(mean))
                    .collect();
                Series::new(series.name().clone(), values)
            };

            table.with_column(filled)?;
            filled_cells += missing;
        }

        info!(
            filled_cells,
            undefined = undefined_mean_columns.len(),
            "Filled missing numeric values"
        );
        Ok(FillOutcome {
            table,
            filled_cells,
            undefined_mean_columns,
        })
    }

    fn is_whole(value: f64) -> bool {
        value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FileLoader;

    fn scenario() -> DataFrame {
        FileLoader::load("f.csv", b"a,b\n1,2\n1,2\n,4\n").unwrap()
    }

    fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn dedupe_then_fill_scenario() {
        let deduped = DataCleaner::remove_duplicates(&scenario()).unwrap();
        assert_eq!(ints(&deduped, "a"), vec![Some(1), None]);
        assert_eq!(ints(&deduped, "b"), vec![Some(2), Some(4)]);

        let outcome = DataCleaner::fill_missing_numeric(&deduped).unwrap();
        assert_eq!(outcome.filled_cells, 1);
        assert!(outcome.undefined_mean_columns.is_empty());
        assert_eq!(ints(&outcome.table, "a"), vec![Some(1), Some(1)]);
        assert_eq!(ints(&outcome.table, "b"), vec![Some(2), Some(4)]);
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let df = df!(
            "k" => [Some("x"), Some("y"), Some("x"), None, None],
            "v" => [Some(1i64), Some(2), Some(1), None, None]
        )
        .unwrap();

        let once = DataCleaner::remove_duplicates(&df).unwrap();
        let twice = DataCleaner::remove_duplicates(&once).unwrap();

        assert_eq!(once.height(), 3);
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn remove_duplicates_keeps_unique_rows_in_order() {
        let df = df!(
            "k" => ["b", "a", "b", "c"],
            "v" => [1i64, 1, 2, 3]
        )
        .unwrap();

        let deduped = DataCleaner::remove_duplicates(&df).unwrap();
        assert!(deduped.equals(&df));
    }

    #[test]
    fn remove_duplicates_compares_floats_exactly() {
        let df = FileLoader::load(
            "close.csv",
            b"x\n1.00000001\n1.00000002\n12345678901.5\n12345678902.5\n1.00000001\n",
        )
        .unwrap();
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);

        let deduped = DataCleaner::remove_duplicates(&df).unwrap();
        let x: Vec<Option<f64>> = deduped
            .column("x")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            x,
            vec![
                Some(1.00000001),
                Some(1.00000002),
                Some(12345678901.5),
                Some(12345678902.5)
            ]
        );
    }

    #[test]
    fn remove_duplicates_drops_only_repeated_float_rows() {
        let df = df!(
            "x" => [Some(0.1f64), Some(0.1 + 1e-15), None, Some(0.0), Some(-0.0), None, Some(0.1), Some(f64::NAN), Some(f64::NAN)],
            "y" => [Some(1i64), Some(1), None, Some(2), Some(2), Some(3), Some(1), Some(4), Some(4)]
        )
        .unwrap();

        let deduped = DataCleaner::remove_duplicates(&df).unwrap();

        // -0.0 repeats 0.0, the second null row differs in `y`,
        // the later 0.1 repeats the first and NaN repeats NaN
        let kept: Vec<Option<i64>> = deduped
            .column("y")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(kept, vec![Some(1), Some(1), None, Some(2), Some(3), Some(4)]);

        let x = deduped.column("x").unwrap().as_materialized_series().f64().unwrap();
        assert_eq!(x.get(0), Some(0.1));
        assert_eq!(x.get(1), Some(0.1 + 1e-15));
        assert_eq!(x.get(2), None);
        assert_eq!(x.get(4), None);
    }

    #[test]
    fn remove_duplicates_never_drops_first_occurrences() {
        let values: Vec<Option<f64>> = (0..200)
            .map(|i| match i % 7 {
                0 => None,
                _ => Some(1.0 + (i % 50) as f64 * 1e-9),
            })
            .collect();
        let df = df!("x" => values.clone()).unwrap();

        let deduped = DataCleaner::remove_duplicates(&df).unwrap();
        let kept: Vec<Option<f64>> = deduped
            .column("x")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();

        let mut expected: Vec<Option<f64>> = Vec::new();
        for value in values {
            if !expected.contains(&value) {
                expected.push(value);
            }
        }
        assert_eq!(kept, expected);
    }

    #[test]
    fn remove_duplicates_on_empty_table() {
        let deduped = DataCleaner::remove_duplicates(&DataFrame::empty()).unwrap();
        assert_eq!(deduped.height(), 0);
    }

    #[test]
    fn fill_uses_fractional_mean() {
        let df = df!(
            "x" => [Some(1i64), None, Some(2)],
            "name" => [Some("a"), None, Some("c")]
        )
        .unwrap();

        let outcome = DataCleaner::fill_missing_numeric(&df).unwrap();
        let x: Vec<Option<f64>> = outcome
            .table
            .column("x")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(x, vec![Some(1.0), Some(1.5), Some(2.0)]);

        // text column is untouched, null included
        let before = df.column("name").unwrap().as_materialized_series();
        let after = outcome.table.column("name").unwrap().as_materialized_series();
        assert!(after.equals_missing(before));
    }

    #[test]
    fn fill_leaves_all_missing_column_unchanged() {
        let df = FileLoader::load("gaps.csv", b"a,b\n,1\n,\n").unwrap();

        let outcome = DataCleaner::fill_missing_numeric(&df).unwrap();
        assert_eq!(outcome.undefined_mean_columns, vec!["a".to_string()]);
        assert_eq!(outcome.table.column("a").unwrap().null_count(), 2);
        assert_eq!(outcome.table.column("b").unwrap().null_count(), 0);
    }

    #[test]
    fn refilling_is_a_no_op() {
        let df = df!("x" => [Some(2.5f64), None, Some(0.5)]).unwrap();

        let first = DataCleaner::fill_missing_numeric(&df).unwrap();
        let second = DataCleaner::fill_missing_numeric(&first.table).unwrap();
        assert_eq!(second.filled_cells, 0);
        assert!(first.table.equals_missing(&second.table));
    }
}
