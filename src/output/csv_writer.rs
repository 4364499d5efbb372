//! CSV output
//!
//! Writes a `URL,Email` header followed by one row per record. Quoting is
//! left to the `csv` writer so URLs containing commas or quotes stay intact.

use crate::collector::EmailRecord;
use crate::output::traits::{OutputResult, OutputSink};
use std::path::{Path, PathBuf};

/// Writes records to a CSV file, replacing any existing file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for CsvSink {
    fn write(&mut self, records: &[EmailRecord]) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        // serde writes the header from the first record; an empty slice
        // still gets one
        if records.is_empty() {
            writer.write_record(["URL", "Email"])?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "Wrote CSV output"
        );
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
