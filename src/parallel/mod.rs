//! Parallel execution core
//!
//! This module owns everything about *how* a batch runs: sizing the worker
//! pool, distributing jobs, cancelling cooperatively and collecting results.
//! It knows nothing about record formats; those come in through
//! [`RecordSource`](crate::records::RecordSource).
//!
//! # Architecture
//!
//! ```text
//!  paths ──▶ Dispatcher ──▶ job queue ──▶ Worker 1..N ──▶ result queue ──▶ Collector
//!                │          (bounded)          │           (bounded)          │
//!                └──────────── CancellationToken (polled) ──────────────────┘
//!                                                                              │
//!                                                          ProgressTracker ◀───┘
//! ```
//!
//! - **Resource Discovery**: CPU count from `num_cpus::get()`, see [`sizing`]
//! - **Work Distribution**: crossbeam bounded channels and scoped threads
//! - **Cancellation**: a level-triggered [`CancellationToken`] checked before
//!   claiming a job, between records, while a send is blocked and before each
//!   result is consumed
//! - **Aggregation**: a single collector owns the result list
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use filebatch::parallel::{BatchProcessor, ProcessorConfig};
//! use filebatch::records::CsvSource;
//!
//! let files = vec!["data/a.csv", "data/b.csv"];
//! let processor = BatchProcessor::new(ProcessorConfig::for_jobs(files.len()), CsvSource::new());
//!
//! let run = processor.process_files(&files)?;
//! println!("{}", run.summary());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cancel;
mod pipeline;
pub mod processor;
pub mod progress;
pub mod sizing;

// Re-export main types for easier access
pub use cancel::{CancellationController, CancellationToken};
pub use processor::{BatchProcessor, BatchRun, DEFAULT_POLL_INTERVAL, ProcessorConfig};
pub use progress::{ProgressSink, ProgressTracker, ProgressUpdate};
pub use sizing::{optimal_workers, optimal_workers_for};
