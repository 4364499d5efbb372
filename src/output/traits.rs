//! Output sink trait and errors

use crate::collector::EmailRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for collected records
///
/// Receives the full record list once a run has finished, in collection
/// order.
pub trait OutputSink {
    /// Writes every record
    ///
    /// # Arguments
    ///
    /// * `records` - Records in the order they were collected
    fn write(&mut self, records: &[EmailRecord]) -> OutputResult<()>;

    /// Human-readable destination, used in log and console messages
    fn destination(&self) -> String;
}
