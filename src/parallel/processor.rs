use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cancel::{CancellationController, CancellationToken};
use super::pipeline::{self, WorkerContext};
use super::progress::{ProgressSink, ProgressTracker};
use super::sizing::optimal_workers_for;
use crate::batch::summary::Summary;
use crate::batch::types::{Job, ProcessResult, ProgressState};
use crate::records::RecordSource;

/// Default interval at which blocked channel operations re-check cancellation
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Configuration for one batch processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    worker_count: usize,
    /// Simulated work per record
    record_delay: Duration,
    poll_interval: Duration,
}

impl ProcessorConfig {
    /// Fails when `worker_count` is zero
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            anyhow::bail!("Worker count must be at least 1");
        }
        Ok(Self {
            worker_count,
            record_delay: Duration::ZERO,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Size the pool for `job_count` jobs from the detected CPU count
    pub fn for_jobs(job_count: usize) -> Self {
        Self {
            worker_count: optimal_workers_for(job_count).max(1),
            record_delay: Duration::ZERO,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_record_delay(mut self, record_delay: Duration) -> Self {
        self.record_delay = record_delay;
        self
    }

    /// Fails when `poll_interval` is zero
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            anyhow::bail!("Poll interval must be greater than zero");
        }
        self.poll_interval = poll_interval;
        Ok(self)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn record_delay(&self) -> Duration {
        self.record_delay
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct BatchRun {
    /// Results in completion order
    pub results: Vec<ProcessResult>,
    pub progress: ProgressState,
    /// The run's token was cancelled before the run ended
    pub cancelled: bool,
    /// Jobs placed on the queue before dispatch ended
    pub dispatched: usize,
    /// Worker threads actually spawned
    pub workers: usize,
    pub elapsed: Duration,
}

impl BatchRun {
    fn empty() -> Self {
        Self {
            results: Vec::new(),
            progress: ProgressState::default(),
            cancelled: false,
            dispatched: 0,
            workers: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.results)
    }
}

/// Fan-out/fan-in processor for file-based jobs.
///
/// Each call to [`process_files`](Self::process_files) is one run: a dispatcher
/// thread feeds a bounded job queue, `worker_count` scoped worker threads
/// process jobs through the [`RecordSource`], and the calling thread collects
/// results. Every thread is joined before the call returns.
///
/// A processor runs one batch at a time. Running overlapping batches on the
/// same instance is unsupported: they would share a cancellation controller.
pub struct BatchProcessor<S> {
    config: ProcessorConfig,
    source: S,
    controller: Arc<CancellationController>,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl<S: RecordSource> BatchProcessor<S> {
    pub fn new(config: ProcessorConfig, source: S) -> Self {
        Self {
            config,
            source,
            controller: Arc::new(CancellationController::new()),
            sink: None,
        }
    }

    /// Receive a status line for every collected result
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Cancel the current run and start the next one from a token derived
    /// from `parent`
    pub fn with_parent_token(self, parent: &CancellationToken) -> Self {
        self.controller.rearm(Some(parent));
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Shared handle for cancelling from another thread (e.g. a signal handler)
    pub fn controller(&self) -> Arc<CancellationController> {
        self.controller.clone()
    }

    /// Stop all processing of the current run
    pub fn cancel(&self) {
        self.controller.trigger();
    }

    /// Cancel the current token and install a fresh one for the next run
    pub fn rearm(&self, parent: Option<&CancellationToken>) -> CancellationToken {
        self.controller.rearm(parent)
    }

    /// Process every path and collect results in completion order
    pub fn process_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BatchRun> {
        if paths.is_empty() {
            return Ok(BatchRun::empty());
        }

        let start = Instant::now();
        let token = self.controller.token();
        let total = paths.len();
        let workers = std::cmp::min(self.config.worker_count, total);
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();

        tracing::debug!("Starting batch of {} jobs with {} workers", total, workers);

        // Both queues hold a full batch so the dispatcher never blocks
        let (work_tx, work_rx): (Sender<Job>, Receiver<Job>) = bounded(total);
        let (result_tx, result_rx): (Sender<ProcessResult>, Receiver<ProcessResult>) =
            bounded(total);

        let tracker = match &self.sink {
            Some(sink) => ProgressTracker::with_sink(total, sink.clone()),
            None => ProgressTracker::new(total),
        };

        let (collected, dispatched) = crossbeam::thread::scope(|s| {
            for worker_id in 0..workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    source: &self.source,
                    token: token.clone(),
                    record_delay: self.config.record_delay,
                    poll_interval: self.config.poll_interval,
                };
                s.spawn(move |_| pipeline::worker_loop(ctx));
            }

            let dispatcher_token = token.clone();
            let dispatcher =
                s.spawn(move |_| pipeline::dispatch(paths, work_tx, &dispatcher_token));

            // The result queue closes once the last worker drops its sender
            drop(work_rx);
            drop(result_tx);

            let collected = pipeline::collect(
                result_rx,
                &tracker,
                &token,
                self.config.poll_interval,
                total,
            );
            let dispatched = dispatcher.join().unwrap_or(0);
            (collected, dispatched)
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during batch processing"))?;

        // A cancel that lands after every result was collected does not
        // truncate the run
        let complete = collected.results.len() == total;
        let run = BatchRun {
            progress: tracker.snapshot(),
            cancelled: !complete && (collected.stopped_early || token.is_cancelled()),
            dispatched,
            workers,
            elapsed: start.elapsed(),
            results: collected.results,
        };

        tracing::info!(
            "Batch finished in {:.2}s: {} results, {} failed{}",
            run.elapsed.as_secs_f64(),
            run.progress.completed,
            run.progress.failed,
            if run.cancelled { " (cancelled)" } else { "" }
        );

        Ok(run)
    }
}
