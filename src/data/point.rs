//! Data Point Module
//! Row model for the scatter chart and the CSV column mapping.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the dataset: a state with its two measures.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Short label drawn inside the marker (e.g. "AL")
    pub label: String,
    /// Display name shown in the tooltip (e.g. "Alabama")
    pub name: String,
    /// Horizontal measure (poverty %)
    pub x: f64,
    /// Vertical measure (lacks healthcare %)
    pub y: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            x,
            y,
        }
    }
}

/// Which CSV columns feed the four fields of a `DataPoint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub label: String,
    pub name: String,
    pub x: String,
    pub y: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            label: "abbr".to_string(),
            name: "state".to_string(),
            x: "poverty".to_string(),
            y: "healthcare".to_string(),
        }
    }
}

/// Validated points plus where they came from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub points: Vec<DataPoint>,
    pub mapping: ColumnMapping,
    pub source: Option<PathBuf>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
