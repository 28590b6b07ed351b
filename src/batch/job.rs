use std::thread;
use std::time::{Duration, Instant};

use super::types::{Job, JobError, ProcessResult};
use crate::parallel::CancellationToken;
use crate::records::{RecordReader, RecordSource};

/// Process a single job: open it, then count records until end of data.
///
/// Cancellation is checked before every record. Failures are returned as
/// data; this never panics on bad input.
pub fn process_job<S>(
    job: &Job,
    source: &S,
    token: &CancellationToken,
    record_delay: Duration,
) -> ProcessResult
where
    S: RecordSource,
{
    let start = Instant::now();

    let mut reader = match source.open(&job.path) {
        Ok(reader) => reader,
        Err(e) => {
            return ProcessResult::failure(
                job,
                JobError::Open {
                    message: e.to_string(),
                },
                start.elapsed(),
            );
        }
    };

    let mut item_count = 0;
    loop {
        if token.is_cancelled() {
            return ProcessResult::failure(job, JobError::Cancelled, start.elapsed());
        }

        let row = item_count + 1;
        let record = match reader.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(e) => {
                return ProcessResult::failure(
                    job,
                    JobError::Read {
                        row,
                        message: format!("{e:#}"),
                    },
                    start.elapsed(),
                );
            }
        };

        if record.is_empty() {
            return ProcessResult::failure(job, JobError::MalformedRecord { row }, start.elapsed());
        }

        if !record_delay.is_zero() {
            thread::sleep(record_delay);
        }
        item_count += 1;
    }

    ProcessResult::success(job, item_count, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CsvSource, LineSource};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn process<S: RecordSource>(job: &Job, source: &S) -> ProcessResult {
        process_job(job, source, &CancellationToken::new(), Duration::ZERO)
    }

    fn write(dir: &Path, name: &str, contents: &str) -> Job {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        Job::new(path, 1)
    }

    #[test]
    fn test_counts_data_rows() {
        let temp_dir = TempDir::new().unwrap();
        let job = write(temp_dir.path(), "a.csv", "ID,Name\n1,a\n2,b\n3,c\n");

        let result = process(&job, &CsvSource::new());

        assert!(result.is_success());
        assert_eq!(result.item_count, 3);
        assert_eq!(result.name, "a.csv");
    }

    #[test]
    fn test_header_only_is_ok_with_zero_items() {
        let temp_dir = TempDir::new().unwrap();
        let job = write(temp_dir.path(), "empty.csv", "ID,Name,Email,Age,City\n");

        let result = process(&job, &CsvSource::new());

        assert!(result.is_success());
        assert_eq!(result.item_count, 0);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let temp_dir = TempDir::new().unwrap();
        let job = Job::new(temp_dir.path().join("nope.csv"), 4);

        let result = process(&job, &CsvSource::new());

        assert!(matches!(result.error(), Some(JobError::Open { .. })));
        assert_eq!(result.sequence, 4);
    }

    #[test]
    fn test_third_record_empty_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let job = write(temp_dir.path(), "gap.txt", "1,a\n2,b\n\n4,d\n");

        let result = process(&job, &LineSource::new());

        assert_eq!(result.error(), Some(&JobError::MalformedRecord { row: 3 }));
        assert_eq!(result.item_count, 0);
    }

    #[test]
    fn test_read_error_carries_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        fs::write(&path, b"id\n1\n2\n\xff\n").unwrap();
        let job = Job::new(path, 1);

        let result = process(&job, &CsvSource::new());

        assert!(matches!(result.error(), Some(JobError::Read { row: 3, .. })));
    }

    #[test]
    fn test_cancelled_token_stops_before_first_record() {
        let temp_dir = TempDir::new().unwrap();
        let job = write(temp_dir.path(), "a.csv", "ID\n1\n2\n");
        let token = CancellationToken::new();
        token.cancel();

        let result = process_job(&job, &CsvSource::new(), &token, Duration::ZERO);

        assert_eq!(result.error(), Some(&JobError::Cancelled));
    }
}
