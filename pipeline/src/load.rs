use std::path::Path;

use ml_core::{FEATURE_NAMES, TARGET_NAME};
use polars::prelude::*;

use crate::error::{PipelineError, Result};

/// Every column the pipeline needs, predictors first.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    FEATURE_NAMES[0],
    FEATURE_NAMES[1],
    FEATURE_NAMES[2],
    TARGET_NAME,
];

const EXTRA_SEPARATOR: char = '\u{1f}';
const MISSING_CELL: &str = "\u{0}";

/// A required column after numeric coercion; `None` marks a missing or
/// non-numeric cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

/// The required columns of the input, in `REQUIRED_COLUMNS` order.
///
/// `extras` holds, per row, the raw text of every other input column joined
/// into one tag, so rows that only differ outside the required columns are
/// still told apart when dropping duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<RawColumn>,
    pub extras: Vec<String>,
}

impl RawTable {
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }
}

/// Reads a CSV file with a header row, keeping every cell as text.
///
/// # Errors
/// Returns `PipelineError::Read` if the file is missing or malformed.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Extracts the required columns as floats, turning unparseable and
/// non-finite cells (`NaN`, `inf`) into missing values.
///
/// # Errors
/// Returns `PipelineError::MissingColumns` naming every absent column.
pub fn coerce_numeric(df: &DataFrame) -> Result<RawTable> {
    let present: Vec<String> = df
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.iter().any(|p| p == *name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    let columns = REQUIRED_COLUMNS
        .iter()
        .map(|&name| -> Result<RawColumn> {
            let series = df
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let values = series
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect();
            Ok(RawColumn { name, values })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut extras = vec![String::new(); df.height()];
    for column in df.get_columns() {
        if REQUIRED_COLUMNS.contains(&column.name().as_str()) {
            continue;
        }
        let text = column.as_materialized_series().cast(&DataType::String)?;
        for (tag, cell) in extras.iter_mut().zip(text.str()?) {
            tag.push(EXTRA_SEPARATOR);
            tag.push_str(cell.unwrap_or(MISSING_CELL));
        }
    }

    Ok(RawTable { columns, extras })
}

/// Loads and coerces a dataset in one step.
///
/// # Errors
/// See [`read_csv`] and [`coerce_numeric`].
pub fn load_table(path: &Path) -> Result<RawTable> {
    let df = read_csv(path)?;
    log::info!(
        "loaded {} rows and {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    coerce_numeric(&df)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_csv(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("data.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn non_numeric_cells_become_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "size,bedrooms,age,price,city\n50,1,5,150,a\nabc,2,,180,b\n",
        );

        let table = load_table(&path).unwrap();

        assert_eq!(table.rows(), 2);
        assert_eq!(table.columns[0].name, "size");
        assert_eq!(table.columns[0].values, vec![Some(50.0), None]);
        assert_eq!(table.columns[2].values, vec![Some(5.0), None]);
        assert_eq!(table.columns[3].values, vec![Some(150.0), Some(180.0)]);
        assert_ne!(table.extras[0], table.extras[1]);
    }

    #[test]
    fn nan_and_inf_cells_become_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "size,bedrooms,age,price\nNaN,1,5,150\n60,inf,10,180\n70,3,-inf,nan\n",
        );

        let table = load_table(&path).unwrap();

        assert_eq!(table.columns[0].values, vec![None, Some(60.0), Some(70.0)]);
        assert_eq!(table.columns[1].values, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(table.columns[2].values, vec![Some(5.0), Some(10.0), None]);
        assert_eq!(table.columns[3].values, vec![Some(150.0), Some(180.0), None]);
    }

    #[test]
    fn without_extra_columns_every_tag_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "price,age,bedrooms,size\n150,5,1,50\n180,10,2,60\n");

        let table = load_table(&path).unwrap();

        assert_eq!(table.columns[0].values, vec![Some(50.0), Some(60.0)]);
        assert_eq!(table.extras, vec![String::new(), String::new()]);
    }

    #[test]
    fn reports_every_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "size,price\n50,150\n");

        match load_table(&path) {
            Err(PipelineError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["bedrooms".to_string(), "age".to_string()])
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
    }
}
