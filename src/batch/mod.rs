//! Job model, the per-job processing routine and the run summary

pub mod job;
pub mod summary;
pub mod types;

pub use job::process_job;
pub use summary::{Summary, SummaryLine};
pub use types::{Job, JobError, ProcessResult, ProgressState};
