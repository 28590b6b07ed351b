use anyhow::Result;
use std::fs::File;
use std::io;
use std::path::Path;

use super::{Record, RecordReader, RecordSource};

/// CSV record source backed by the `csv` crate.
///
/// Readers are flexible: records may carry differing field counts. Blank lines
/// are skipped by the CSV grammar and never surface as records.
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
    has_headers: bool,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

impl CsvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Whether the first row is a header and excluded from the records
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

pub struct CsvReader {
    inner: csv::Reader<File>,
    buffer: csv::StringRecord,
}

impl RecordReader for CsvReader {
    fn next_record(&mut self) -> Result<Option<Record>> {
        if !self.inner.read_record(&mut self.buffer)? {
            return Ok(None);
        }
        Ok(Some(self.buffer.iter().map(str::to_string).collect()))
    }
}

impl RecordSource for CsvSource {
    type Reader = CsvReader;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        let file = File::open(path)?;
        let inner = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .from_reader(file);

        Ok(CsvReader {
            inner,
            buffer: csv::StringRecord::new(),
        })
    }
}
