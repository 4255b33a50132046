//! Data Processor Module
//! Turns a string-typed DataFrame into validated `DataPoint`s.

use crate::data::{ColumnMapping, DataPoint};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),
    #[error("Dataset has no rows")]
    Empty,
    #[error("{}", summarize_rows(.0))]
    InvalidRows(Vec<RowError>),
}

/// Why a single cell was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    Missing,
    NotANumber,
    NotFinite,
}

/// A rejected cell, with its 1-based data row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub column: String,
    pub value: Option<String>,
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            RowErrorKind::Missing => "missing value",
            RowErrorKind::NotANumber => "not a number",
            RowErrorKind::NotFinite => "not a finite number",
        };
        write!(f, "row {}, column '{}': {}", self.row, self.column, reason)?;
        if let Some(value) = &self.value {
            write!(f, " ({:?})", value)?;
        }
        Ok(())
    }
}

fn summarize_rows(errors: &[RowError]) -> String {
    match errors.first() {
        Some(first) if errors.len() == 1 => format!("Invalid row: {}", first),
        Some(first) => format!(
            "{} invalid rows, first: {}",
            errors.len(),
            first
        ),
        None => "Invalid rows".to_string(),
    }
}

/// Extracts and validates chart rows.
pub struct DataProcessor;

impl DataProcessor {
    /// Build one `DataPoint` per row. Every invalid row is reported, not just the first.
    pub fn extract_points(
        df: &DataFrame,
        mapping: &ColumnMapping,
    ) -> Result<Vec<DataPoint>, ProcessorError> {
        let labels = Self::string_column(df, &mapping.label)?;
        let names = Self::string_column(df, &mapping.name)?;
        let xs = Self::string_column(df, &mapping.x)?;
        let ys = Self::string_column(df, &mapping.y)?;

        if df.height() == 0 {
            return Err(ProcessorError::Empty);
        }

        let mut points = Vec::with_capacity(df.height());
        let mut errors = Vec::new();

        for i in 0..df.height() {
            let row = i + 1;

            let label = match non_empty(labels[i].as_deref()) {
                Some(label) => Some(label.to_string()),
                None => {
                    errors.push(RowError {
                        row,
                        column: mapping.label.clone(),
                        value: None,
                        kind: RowErrorKind::Missing,
                    });
                    None
                }
            };
            let x = Self::parse_measure(xs[i].as_deref(), row, &mapping.x)
                .map_err(|e| errors.push(e))
                .ok();
            let y = Self::parse_measure(ys[i].as_deref(), row, &mapping.y)
                .map_err(|e| errors.push(e))
                .ok();

            if let (Some(label), Some(x), Some(y)) = (label, x, y) {
                // Name falls back to the label
                let name = non_empty(names[i].as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| label.clone());
                points.push(DataPoint { label, name, x, y });
            }
        }

        if !errors.is_empty() {
            for error in &errors {
                log::warn!("rejected {}", error);
            }
            return Err(ProcessorError::InvalidRows(errors));
        }

        Ok(points)
    }

    /// Parse one measure cell.
    pub fn parse_measure(raw: Option<&str>, row: usize, column: &str) -> Result<f64, RowError> {
        let error = |value: Option<&str>, kind| RowError {
            row,
            column: column.to_string(),
            value: value.map(str::to_string),
            kind,
        };

        let Some(text) = non_empty(raw) else {
            return Err(error(None, RowErrorKind::Missing));
        };

        let value: f64 = text
            .parse()
            .map_err(|_| error(Some(text), RowErrorKind::NotANumber))?;

        if !value.is_finite() {
            return Err(error(Some(text), RowErrorKind::NotFinite));
        }

        Ok(value)
    }

    /// Read a column as optional strings, whatever dtype it was loaded with.
    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let column = df
            .column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
        let series = column.as_materialized_series().cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
