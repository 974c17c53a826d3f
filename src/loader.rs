//! CSV loader for the listings file.

use crate::dataset::Dataset;
use crate::error::{DashboardError, Result};
use crate::schema::{CategoricalColumn, NumericColumn};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Cell values read as missing, compared case-insensitively.
const MISSING_TOKENS: [&str; 5] = ["", "na", "nan", "null", "none"];

enum Target {
    Numeric(NumericColumn),
    Categorical(CategoricalColumn),
    Ignored,
}

/// Loads the dataset from a CSV file with a header row.
///
/// # Errors
/// Returns `DataUnavailable` when the file cannot be opened or parsed, or when
/// its header contains none of the schema columns.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DashboardError::unavailable(path, e.to_string()))?;
    let dataset = load_from_reader(file, path)?;
    info!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Loaded dataset from {}",
        path.display()
    );
    Ok(dataset)
}

/// Loads the dataset from any reader. `source` is only used for error messages.
pub fn load_from_reader<R: Read>(reader: R, source: impl AsRef<Path>) -> Result<Dataset> {
    let source = source.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DashboardError::unavailable(source, format!("invalid header: {e}")))?
        .clone();

    let targets: Vec<Target> = headers
        .iter()
        .map(|header| {
            if let Some(column) = NumericColumn::from_header(header) {
                Target::Numeric(column)
            } else if let Some(column) = CategoricalColumn::from_header(header) {
                Target::Categorical(column)
            } else {
                debug!("Ignoring column '{}'", header);
                Target::Ignored
            }
        })
        .collect();

    if targets.iter().all(|t| matches!(t, Target::Ignored)) {
        return Err(DashboardError::unavailable(
            source,
            "header contains no recognised columns",
        ));
    }

    let mut numeric: Vec<Vec<Option<f64>>> = vec![Vec::new(); targets.len()];
    let mut categorical: Vec<Vec<Option<String>>> = vec![Vec::new(); targets.len()];
    let mut unparsable = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            DashboardError::unavailable(source, format!("record {}: {e}", line + 1))
        })?;

        for (index, target) in targets.iter().enumerate() {
            let cell = record.get(index).unwrap_or("");
            match target {
                Target::Numeric(_) => {
                    let value = parse_numeric(cell);
                    if value.is_none() && !is_missing(cell) {
                        unparsable += 1;
                    }
                    numeric[index].push(value);
                }
                Target::Categorical(_) => {
                    let value = (!is_missing(cell)).then(|| cell.to_string());
                    categorical[index].push(value);
                }
                Target::Ignored => {}
            }
        }
    }

    if unparsable > 0 {
        warn!(
            "{} numeric cells in {} could not be parsed and were treated as missing",
            unparsable,
            source.display()
        );
    }

    let mut builder = Dataset::builder().source(source);
    for (index, target) in targets.iter().enumerate() {
        match target {
            Target::Numeric(column) => {
                builder = builder.numeric(*column, std::mem::take(&mut numeric[index]));
            }
            Target::Categorical(column) => {
                builder = builder.categorical(*column, std::mem::take(&mut categorical[index]));
            }
            Target::Ignored => {}
        }
    }
    builder.build()
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(cell))
}

fn parse_numeric(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    if cell.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
brand,price,os,battery_wh,ram_gb
Acme,1000,Windows,50,16
Acme,,Windows,60,8
Zeta,abc,NA,40,true
";

    #[test]
    fn reads_schema_columns_and_ignores_others() {
        let dataset = load_from_reader(SAMPLE.as_bytes(), "sample.csv").unwrap();

        assert_eq!(dataset.row_count(), 3);
        assert_eq!(
            dataset.numeric(NumericColumn::Price).unwrap(),
            &[Some(1000.0), None, None]
        );
        assert_eq!(
            dataset.categorical(CategoricalColumn::Os).unwrap(),
            &[Some("Windows".to_string()), Some("Windows".to_string()), None]
        );
        assert_eq!(
            dataset.numeric(NumericColumn::RamGb).unwrap()[2],
            Some(1.0)
        );
        assert!(!dataset.has_column(NumericColumn::WeightKg));
    }

    #[test]
    fn rejects_files_without_schema_columns() {
        let err = load_from_reader("foo,bar\n1,2\n".as_bytes(), "other.csv").unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.source(), Some(file.path()));
    }

    #[test]
    fn ragged_records_are_fatal() {
        let err = load_from_reader("brand,price\nAcme,1,extra\n".as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }
}
