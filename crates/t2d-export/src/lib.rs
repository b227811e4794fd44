//! T2D Export - Dataset conversion and writers
//!
//! Converts filtered entity candidates into the two dataset shapes:
//! - Flat `text`/`entity`/`label` records (CSV or JSON)
//! - Span-aligned training records (`[text, {"entities": [...]}]`)

pub mod convert;
pub mod writer;

pub use convert::{build_dataset, to_records, to_spans, Dataset};
pub use writer::{dataset_file_name, write_csv, write_dataset, write_json, write_spans_json};

use t2d_core::OutputFormat;
use thiserror::Error;

/// Errors that can occur while writing a dataset
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot write {dataset} dataset as {format}")]
    FormatMismatch {
        dataset: &'static str,
        format: OutputFormat,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl From<ExportError> for t2d_core::T2dError {
    fn from(e: ExportError) -> Self {
        t2d_core::T2dError::Export(e.to_string())
    }
}
