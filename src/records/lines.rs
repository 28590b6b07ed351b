use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::{Record, RecordReader, RecordSource};

/// Line-oriented record source: one record per line, fields split on a
/// delimiter. A blank line is a record with no fields.
#[derive(Debug, Clone)]
pub struct LineSource {
    delimiter: u8,
    has_headers: bool,
}

impl Default for LineSource {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }
}

impl LineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

pub struct LineReader<R> {
    inner: R,
    delimiter: char,
    skip_header: bool,
    line: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, delimiter: u8, has_headers: bool) -> Self {
        Self {
            inner,
            delimiter: delimiter as char,
            skip_header: has_headers,
            line: String::new(),
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let read = self
            .inner
            .read_line(&mut self.line)
            .context("failed to read line")?;
        Ok(read > 0)
    }
}

impl<R: BufRead> RecordReader for LineReader<R> {
    fn next_record(&mut self) -> Result<Option<Record>> {
        if self.skip_header {
            self.skip_header = false;
            if !self.read_line()? {
                return Ok(None);
            }
        }

        if !self.read_line()? {
            return Ok(None);
        }

        let line = self.line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(line.split(self.delimiter).map(str::to_string).collect()))
    }
}

impl RecordSource for LineSource {
    type Reader = LineReader<BufReader<File>>;

    fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        let file = File::open(path)?;
        Ok(LineReader::new(
            BufReader::new(file),
            self.delimiter,
            self.has_headers,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_splits_fields_on_delimiter() {
        let mut reader = LineReader::new(Cursor::new("a|b|c\nd\n"), b'|', false);
        assert_eq!(
            reader.next_record().unwrap(),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(reader.next_record().unwrap(), Some(vec!["d".to_string()]));
        assert_eq!(reader.next_record().unwrap(), None);
    }

    #[test]
    fn test_blank_line_is_empty_record() {
        let mut reader = LineReader::new(Cursor::new("1,a\n\r\n2,b"), b',', false);
        assert!(reader.next_record().unwrap().is_some());
        assert_eq!(reader.next_record().unwrap(), Some(Vec::new()));
        assert_eq!(
            reader.next_record().unwrap(),
            Some(vec!["2".to_string(), "b".to_string()])
        );
        assert_eq!(reader.next_record().unwrap(), None);
    }

    #[test]
    fn test_header_is_skipped_once() {
        let mut reader = LineReader::new(Cursor::new("id,name\n1,a\n"), b',', true);
        assert_eq!(
            reader.next_record().unwrap(),
            Some(vec!["1".to_string(), "a".to_string()])
        );
        assert_eq!(reader.next_record().unwrap(), None);
    }

    #[test]
    fn test_empty_input_with_header_expected() {
        let mut reader = LineReader::new(Cursor::new(""), b',', true);
        assert_eq!(reader.next_record().unwrap(), None);
    }
}
