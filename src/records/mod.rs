//! Pluggable record sources
//!
//! The batch processor never parses files itself. It opens each job through a
//! [`RecordSource`] and pulls records from the returned [`RecordReader`] until
//! end of data. Two sources ship with the crate:
//!
//! - [`CsvSource`]: delimited files read with the `csv` crate
//! - [`LineSource`]: one record per line, split on a delimiter
//!
//! [`AnySource`] selects between them at runtime from a [`RecordFormat`].

pub mod delimited;
pub mod lines;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

pub use delimited::CsvSource;
pub use lines::LineSource;

/// Fields of a single record
pub type Record = Vec<String>;

/// Sequential reader over the records of one opened resource
pub trait RecordReader {
    /// Read the next record.
    ///
    /// `Ok(None)` signals end of data. An `Ok(Some(record))` with no fields is a
    /// malformed record and is reported by the caller, not by the reader.
    fn next_record(&mut self) -> Result<Option<Record>>;
}

/// Opens resources by identifier. Shared by every worker of a run.
pub trait RecordSource: Send + Sync {
    type Reader: RecordReader;

    fn open(&self, path: &Path) -> io::Result<Self::Reader>;
}

/// Supported on-disk record formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Csv,
    Lines,
}

/// Record source chosen at runtime
#[derive(Debug, Clone)]
pub enum AnySource {
    Csv(CsvSource),
    Lines(LineSource),
}

impl AnySource {
    pub fn new(format: RecordFormat, delimiter: u8, has_headers: bool) -> Self {
        match format {
            RecordFormat::Csv => AnySource::Csv(
                CsvSource::new()
                    .with_delimiter(delimiter)
                    .with_headers(has_headers),
            ),
            RecordFormat::Lines => AnySource::Lines(
                LineSource::new()
                    .with_delimiter(delimiter)
                    .with_headers(has_headers),
            ),
        }
    }
}

/// Reader returned by [`AnySource`]
pub enum AnyReader {
    Csv(<CsvSource as RecordSource>::Reader),
    Lines(<LineSource as RecordSource>::Reader),
}

impl RecordReader for AnyReader {
    fn next_record(&mut self) -> Result<Option<Record>> {
        match self {
            AnyReader::Csv(reader) => reader.next_record(),
            AnyReader::Lines(reader) => reader.next_record(),
        }
    }
}

impl RecordSource for AnySource {
    type Reader = AnyReader;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        match self {
            AnySource::Csv(source) => source.open(path).map(AnyReader::Csv),
            AnySource::Lines(source) => source.open(path).map(AnyReader::Lines),
        }
    }
}
