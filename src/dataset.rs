//! Immutable in-memory listings table.

use crate::error::{DashboardError, Result};
use crate::schema::{CategoricalColumn, Column, NumericColumn};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Column-major table of computer listings.
///
/// Built once at startup and shared read-only behind an `Arc`. A column that
/// was absent from the source header is stored as `None`; accessing it returns
/// [`DashboardError::ColumnMissing`].
#[derive(Debug, Clone)]
pub struct Dataset {
    row_count: usize,
    numeric: Vec<Option<Vec<Option<f64>>>>,
    categorical: Vec<Option<Vec<Option<String>>>>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of schema columns present, including the derived score.
    pub fn column_count(&self) -> usize {
        self.present_columns().count()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn numeric(&self, column: NumericColumn) -> Result<&[Option<f64>]> {
        self.numeric[column.index()]
            .as_deref()
            .ok_or(DashboardError::ColumnMissing(column.name()))
    }

    pub fn categorical(&self, column: CategoricalColumn) -> Result<&[Option<String>]> {
        self.categorical[column.index()]
            .as_deref()
            .ok_or(DashboardError::ColumnMissing(column.name()))
    }

    pub fn has_column(&self, column: impl Into<Column>) -> bool {
        match column.into() {
            Column::Numeric(c) => self.numeric[c.index()].is_some(),
            Column::Categorical(c) => self.categorical[c.index()].is_some(),
        }
    }

    pub fn present_columns(&self) -> impl Iterator<Item = Column> + '_ {
        Column::all().filter(|column| self.has_column(*column))
    }

    pub fn missing_columns(&self) -> impl Iterator<Item = Column> + '_ {
        Column::all().filter(|column| !self.has_column(*column))
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = NumericColumn> + '_ {
        NumericColumn::ALL
            .into_iter()
            .filter(|column| self.has_column(*column))
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = CategoricalColumn> + '_ {
        CategoricalColumn::ALL
            .into_iter()
            .filter(|column| self.has_column(*column))
    }
}

/// Assembles a [`Dataset`] column by column.
///
/// Used by the CSV loader and by tests that need small hand-written tables.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    numeric: Vec<(NumericColumn, Vec<Option<f64>>)>,
    categorical: Vec<(CategoricalColumn, Vec<Option<String>>)>,
    source: Option<PathBuf>,
}

impl DatasetBuilder {
    pub fn numeric(mut self, column: NumericColumn, values: Vec<Option<f64>>) -> Self {
        self.numeric.retain(|(existing, _)| *existing != column);
        self.numeric.push((column, values));
        self
    }

    pub fn categorical<S: Into<String>>(
        mut self,
        column: CategoricalColumn,
        values: Vec<Option<S>>,
    ) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        self.categorical.retain(|(existing, _)| *existing != column);
        self.categorical.push((column, values));
        self
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Validates column lengths and derives the performance score.
    ///
    /// # Errors
    /// Returns `DataUnavailable` when columns disagree on the row count.
    pub fn build(self) -> Result<Dataset> {
        let source_label = self
            .source
            .clone()
            .unwrap_or_else(|| PathBuf::from("<memory>"));

        let mut row_count: Option<usize> = None;
        let lengths = self
            .numeric
            .iter()
            .map(|(column, values)| (column.name(), values.len()))
            .chain(
                self.categorical
                    .iter()
                    .map(|(column, values)| (column.name(), values.len())),
            );
        for (name, len) in lengths {
            match row_count {
                None => row_count = Some(len),
                Some(expected) if expected != len => {
                    return Err(DashboardError::unavailable(
                        source_label,
                        format!("column '{name}' has {len} rows, expected {expected}"),
                    ));
                }
                Some(_) => {}
            }
        }

        let mut numeric: Vec<Option<Vec<Option<f64>>>> = vec![None; NumericColumn::ALL.len()];
        for (column, values) in self.numeric {
            numeric[column.index()] = Some(values);
        }
        let mut categorical: Vec<Option<Vec<Option<String>>>> =
            vec![None; CategoricalColumn::ALL.len()];
        for (column, values) in self.categorical {
            categorical[column.index()] = Some(values);
        }

        let score_index = NumericColumn::PerformanceScore.index();
        if numeric[score_index].is_none() {
            numeric[score_index] = derive_performance_score(&numeric);
        }

        Ok(Dataset {
            row_count: row_count.unwrap_or(0),
            numeric,
            categorical,
            source: self.source,
            loaded_at: Utc::now(),
        })
    }
}

/// (cpu_tier + gpu_tier + cpu_cores/4 + vram_gb/2 + ram_gb/8) * cpu_boost_ghz
///
/// `None` for the whole column if any input column is absent, and per row if
/// any input value is missing.
fn derive_performance_score(numeric: &[Option<Vec<Option<f64>>>]) -> Option<Vec<Option<f64>>> {
    let column = |c: NumericColumn| numeric[c.index()].as_deref();
    let cpu_tier = column(NumericColumn::CpuTier)?;
    let gpu_tier = column(NumericColumn::GpuTier)?;
    let cpu_cores = column(NumericColumn::CpuCores)?;
    let vram = column(NumericColumn::VramGb)?;
    let ram = column(NumericColumn::RamGb)?;
    let boost = column(NumericColumn::CpuBoostGhz)?;

    let scores = (0..cpu_tier.len())
        .map(|row| {
            let base = cpu_tier[row]?
                + gpu_tier[row]?
                + cpu_cores[row]? / 4.0
                + vram[row]? / 2.0
                + ram[row]? / 8.0;
            Some(base * boost[row]?)
        })
        .collect();
    Some(scores)
}
