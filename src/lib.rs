//! # filebatch - Parallel batch processing of file-based jobs
//!
//! Fans an ordered list of files out to a bounded pool of worker threads,
//! counts the records in each file through a pluggable record source, tracks
//! progress as results arrive and reduces everything into a summary.
//!
//! ## Features
//!
//! - **Bounded fan-out/fan-in**: one dispatcher, N workers, one collector
//! - **Cooperative cancellation**: a shared token observed at every blocking point
//! - **Per-job error isolation**: a bad file fails its own job, never the run
//! - **Layered configuration**: embedded defaults, project file, environment
//!
//! ## Quick Start
//!
//! ```bash
//! # Create some input
//! filebatch generate --dir ./csv_files --count 10
//!
//! # Process it
//! filebatch process ./csv_files/*.csv --delay-ms 1
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod parallel;
pub mod records;
pub mod samples;

pub use batch::{Job, JobError, ProcessResult, Summary};
pub use config::BatchConfig;
pub use parallel::{BatchProcessor, BatchRun, CancellationToken, ProcessorConfig};

/// Result type alias for filebatch operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
