//! Output module for collected records and run summaries
//!
//! This module handles:
//! - Writing records to CSV
//! - Printing a human-readable summary of a run

mod csv_writer;
mod summary;
mod traits;

pub use csv_writer::CsvSink;
pub use summary::{format_summary, print_summary};
pub use traits::{OutputError, OutputResult, OutputSink};

use crate::collector::CollectionReport;

/// Writes the records of a finished run to `sink`
///
/// Returns `Ok(false)` without touching the sink when the run produced no
/// records.
pub fn write_report(report: &CollectionReport, sink: &mut dyn OutputSink) -> OutputResult<bool> {
    if report.result.is_empty() {
        tracing::info!("No records collected, skipping output");
        return Ok(false);
    }

    sink.write(report.result.records())?;
    Ok(true)
}
