//! CSV Data Loader Module
//! Handles CSV file loading using Polars. Every column is read as text so
//! numeric coercion happens explicitly in the processor.

use crate::data::{ColumnMapping, DataProcessor, Dataset, ProcessorError};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
    #[error("Invalid dataset: {0}")]
    Invalid(#[from] ProcessorError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Read a CSV file into a string-typed DataFrame.
    pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        // Schema inference of zero rows keeps every column as String
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(file_path.to_path_buf());

        let df = Self::read_csv(file_path)?;
        log::info!(
            "loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Validate the loaded frame into a dataset with the given column mapping.
    pub fn dataset(&self, mapping: &ColumnMapping) -> Result<Dataset, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        let points = DataProcessor::extract_points(df, mapping)?;
        Ok(Dataset {
            points,
            mapping: mapping.clone(),
            source: self.file_path.clone(),
        })
    }

    /// Load and validate in one step.
    pub fn load_dataset(file_path: &Path, mapping: &ColumnMapping) -> Result<Dataset, LoaderError> {
        let mut loader = Self::new();
        loader.load_csv(file_path)?;
        loader.dataset(mapping)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(file_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_columns_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "id,state,abbr,poverty,healthcare\n1,Alabama,AL,18.1,11.7\n2,Alaska,AK,10.9,15.9\n",
        )
        .unwrap();

        let mut loader = DataLoader::new();
        let df = loader.load_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert!(df
            .get_columns()
            .iter()
            .all(|c| c.dtype() == &DataType::String));

        assert_eq!(
            loader.get_columns(),
            vec!["id", "state", "abbr", "poverty", "healthcare"]
        );
        assert_eq!(loader.get_row_count(), 2);

        let dataset = loader.dataset(&ColumnMapping::default()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.points[1].name, "Alaska");
        assert_eq!(dataset.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn dataset_without_frame_is_an_error() {
        let loader = DataLoader::new();
        assert!(matches!(
            loader.dataset(&ColumnMapping::default()),
            Err(LoaderError::NoData)
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = DataLoader::load_dataset(&dir.path().join("absent.csv"), &ColumnMapping::default());
        assert!(matches!(result, Err(LoaderError::CsvError(_))));
    }
}
