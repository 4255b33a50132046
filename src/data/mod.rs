//! Data module - CSV loading and row validation

mod loader;
mod point;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use point::{ColumnMapping, DataPoint, Dataset};
pub use processor::{DataProcessor, ProcessorError, RowError, RowErrorKind};
