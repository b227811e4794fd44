//! Dataset writers
//!
//! Writers take any `io::Write`; callers decide between files, stdout or
//! in-memory buffers.

use std::io::Write;

use t2d_core::{EntityRecord, OutputFormat, SpanRecord};
use uuid::Uuid;

use crate::convert::Dataset;
use crate::{ExportError, Result};

const CSV_HEADER: [&str; 3] = ["text", "entity", "label"];

/// Write flat records as CSV with a `text,entity,label` header
pub fn write_csv<W: Write>(records: &[EntityRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write flat records as a pretty-printed JSON array
pub fn write_json<W: Write>(records: &[EntityRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write span records as a pretty-printed JSON array
pub fn write_spans_json<W: Write>(spans: &[SpanRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, spans)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a dataset in the requested format
pub fn write_dataset<W: Write>(dataset: &Dataset, format: OutputFormat, writer: W) -> Result<()> {
    tracing::debug!("Writing {} {} rows as {}", dataset.len(), dataset.kind(), format);

    match (dataset, format) {
        (Dataset::Records(records), OutputFormat::Csv) => write_csv(records, writer),
        (Dataset::Records(records), OutputFormat::Json) => write_json(records, writer),
        (Dataset::Spans(spans), OutputFormat::Spacy) => write_spans_json(spans, writer),
        (dataset, format) => Err(ExportError::FormatMismatch {
            dataset: dataset.kind(),
            format,
        }),
    }
}

/// Unique file name for a generated dataset, e.g. `dataset_<uuid>.csv`
pub fn dataset_file_name(format: OutputFormat) -> String {
    format!("dataset_{}.{}", Uuid::new_v4(), format.extension())
}
