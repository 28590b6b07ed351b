//! Stages of a batch run: dispatcher, worker loop and collector.
//!
//! The stages only share the two crossbeam channels, the run's
//! [`CancellationToken`] and the [`ProgressTracker`]. Every blocking channel
//! operation is bounded by a poll interval so cancellation is observed even
//! when the other side has stopped.

use crossbeam::channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use std::path::PathBuf;
use std::time::Duration;

use super::cancel::CancellationToken;
use super::progress::ProgressTracker;
use crate::batch::job::process_job;
use crate::batch::types::{Job, ProcessResult};
use crate::records::RecordSource;

/// Assign sequence numbers in input order and feed the job queue.
///
/// Stops at the first cancellation check that fails. The queue closes when
/// `work_tx` is dropped on return. Returns the number of jobs dispatched.
pub(crate) fn dispatch(
    paths: Vec<PathBuf>,
    work_tx: Sender<Job>,
    token: &CancellationToken,
) -> usize {
    let total = paths.len();
    let mut sent = 0;

    for (index, path) in paths.into_iter().enumerate() {
        if token.is_cancelled() {
            tracing::debug!("Dispatch cancelled after {}/{} jobs", sent, total);
            break;
        }
        if work_tx.send(Job::new(path, index + 1)).is_err() {
            break; // Workers dropped
        }
        sent += 1;
    }

    sent
}

/// Context for worker threads to avoid too many function parameters
pub(crate) struct WorkerContext<'a, S> {
    pub worker_id: usize,
    pub work_rx: Receiver<Job>,
    pub result_tx: Sender<ProcessResult>,
    pub source: &'a S,
    pub token: CancellationToken,
    pub record_delay: Duration,
    pub poll_interval: Duration,
}

/// Drain the job queue until it closes or the run is cancelled.
/// Returns the number of results this worker delivered.
pub(crate) fn worker_loop<S: RecordSource>(ctx: WorkerContext<'_, S>) -> usize {
    let mut delivered = 0;

    while let Ok(job) = ctx.work_rx.recv() {
        if ctx.token.is_cancelled() {
            tracing::trace!("worker-{} leaving job #{} unclaimed", ctx.worker_id, job.sequence);
            break;
        }

        tracing::trace!(
            "worker-{} processing job #{} ({})",
            ctx.worker_id,
            job.sequence,
            job.path.display()
        );
        let result = process_job(&job, ctx.source, &ctx.token, ctx.record_delay);

        if !send_result(&ctx.result_tx, result, &ctx.token, ctx.poll_interval) {
            break;
        }
        delivered += 1;
    }

    tracing::debug!("worker-{} exiting after {} results", ctx.worker_id, delivered);
    delivered
}

/// Send a result, giving up if the run is cancelled while the queue is full
/// or if the collector has gone away.
fn send_result(
    result_tx: &Sender<ProcessResult>,
    mut result: ProcessResult,
    token: &CancellationToken,
    poll_interval: Duration,
) -> bool {
    loop {
        match result_tx.send_timeout(result, poll_interval) {
            Ok(()) => return true,
            Err(SendTimeoutError::Disconnected(_)) => return false,
            Err(SendTimeoutError::Timeout(pending)) => {
                if token.is_cancelled() {
                    return false;
                }
                result = pending;
            }
        }
    }
}

/// Output of the collector
pub(crate) struct Collected {
    pub results: Vec<ProcessResult>,
    /// Collection stopped early because the run was cancelled
    pub stopped_early: bool,
}

/// Single consumer of the result queue.
///
/// Owns the accumulated list, so no lock guards it. Returns when the queue
/// closes (every worker has exited) or as soon as cancellation is observed.
/// Dropping `result_rx` on return disconnects any worker still sending.
pub(crate) fn collect(
    result_rx: Receiver<ProcessResult>,
    tracker: &ProgressTracker,
    token: &CancellationToken,
    poll_interval: Duration,
    capacity: usize,
) -> Collected {
    let mut results = Vec::with_capacity(capacity);

    loop {
        if token.is_cancelled() {
            return Collected {
                results,
                stopped_early: true,
            };
        }

        match result_rx.recv_timeout(poll_interval) {
            Ok(result) => {
                if token.is_cancelled() {
                    return Collected {
                        results,
                        stopped_early: true,
                    };
                }

                if let Some(error) = result.error() {
                    tracing::warn!("{} failed: {}", result.name, error);
                }
                let name = result.name.clone();
                let success = result.is_success();
                results.push(result);
                tracker.update(&name, success);
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Collected {
        results,
        stopped_early: false,
    }
}
