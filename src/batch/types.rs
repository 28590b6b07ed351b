use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// One unit of work: a single input file with its dispatch sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub path: PathBuf,
    /// 1-based position of the path in the input list
    pub sequence: usize,
}

impl Job {
    pub fn new(path: impl Into<PathBuf>, sequence: usize) -> Self {
        Self {
            path: path.into(),
            sequence,
        }
    }

    /// Display name of the job (final path component)
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

/// Per-job failure. Every variant is non-fatal to the run and travels as data
/// inside a [`ProcessResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("open failed: {message}")]
    Open { message: String },

    #[error("read error at row {row}: {message}")]
    Read { row: usize, message: String },

    #[error("empty record at row {row}")]
    MalformedRecord { row: usize },

    #[error("processing cancelled")]
    Cancelled,
}

impl JobError {
    /// Short, stable name of the failure category
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Open { .. } => "open",
            JobError::Read { .. } => "read",
            JobError::MalformedRecord { .. } => "malformed_record",
            JobError::Cancelled => "cancelled",
        }
    }
}

/// Result of processing one job, built once by the worker that ran it
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub name: String,
    pub path: PathBuf,
    pub sequence: usize,
    pub item_count: usize,
    pub duration: Duration,
    pub outcome: Result<(), JobError>,
}

impl ProcessResult {
    pub fn success(job: &Job, item_count: usize, duration: Duration) -> Self {
        Self {
            name: job.name(),
            path: job.path.clone(),
            sequence: job.sequence,
            item_count,
            duration,
            outcome: Ok(()),
        }
    }

    pub fn failure(job: &Job, error: JobError, duration: Duration) -> Self {
        Self {
            name: job.name(),
            path: job.path.clone(),
            sequence: job.sequence,
            item_count: 0,
            duration,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&JobError> {
        self.outcome.as_ref().err()
    }
}

/// Snapshot of run progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn succeeded(&self) -> usize {
        self.completed - self.failed
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
