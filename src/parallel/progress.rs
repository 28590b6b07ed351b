use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::batch::types::ProgressState;

/// One progress event, produced for every collected result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub name: String,
    pub success: bool,
    pub state: ProgressState,
}

impl ProgressUpdate {
    pub fn marker(&self) -> &'static str {
        if self.success { "✓" } else { "✗" }
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {} {}",
            self.state.completed,
            self.state.total,
            self.marker(),
            self.name
        )
    }
}

/// Receives status lines from a [`ProgressTracker`]
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Thread-safe completed/failed counters for one run.
///
/// Updated only by the collector; the lock lets other threads take
/// consistent snapshots while the run is in progress.
pub struct ProgressTracker {
    state: Mutex<ProgressState>,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(ProgressState::new(total)),
            sink: None,
        }
    }

    pub fn with_sink(total: usize, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            state: Mutex::new(ProgressState::new(total)),
            sink: Some(sink),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record one finished job and emit its status line
    pub fn update(&self, name: &str, success: bool) -> ProgressUpdate {
        let state = {
            let mut state = self.lock();
            state.completed += 1;
            if !success {
                state.failed += 1;
            }
            *state
        };

        let update = ProgressUpdate {
            name: name.to_string(),
            success,
            state,
        };

        tracing::trace!("{}", update);
        if let Some(sink) = &self.sink {
            sink.report(&update);
        }
        update
    }

    pub fn snapshot(&self) -> ProgressState {
        *self.lock()
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("state", &self.snapshot())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_update_counts_success_and_failure() {
        let tracker = ProgressTracker::new(3);

        let first = tracker.update("a.csv", true);
        assert_eq!(first.to_string(), "[1/3] ✓ a.csv");

        let second = tracker.update("b.csv", false);
        assert_eq!(second.to_string(), "[2/3] ✗ b.csv");

        assert_eq!(
            tracker.snapshot(),
            ProgressState {
                total: 3,
                completed: 2,
                failed: 1
            }
        );
        assert_eq!(tracker.snapshot().succeeded(), 1);
    }

    #[test]
    fn test_sink_receives_every_update() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let captured = lines.clone();
        let tracker = ProgressTracker::with_sink(
            2,
            Arc::new(move |update: &ProgressUpdate| {
                captured.lock().unwrap().push(update.to_string());
            }),
        );

        tracker.update("one", true);
        tracker.update("two", true);

        assert_eq!(*lines.lock().unwrap(), vec!["[1/2] ✓ one", "[2/2] ✓ two"]);
    }

    #[test]
    fn test_concurrent_snapshots_stay_consistent() {
        let tracker = Arc::new(ProgressTracker::new(500));

        let reader = {
            let tracker = tracker.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    let state = tracker.snapshot();
                    assert!(state.failed <= state.completed);
                    assert!(state.completed <= state.total);
                }
            })
        };

        for i in 0..500 {
            tracker.update("job", i % 3 != 0);
        }
        reader.join().unwrap();

        let state = tracker.snapshot();
        assert_eq!(state.completed, 500);
        assert_eq!(state.failed, 167);
    }
}
