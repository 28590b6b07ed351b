//! Cooperative cancellation
//!
//! A [`CancellationToken`] is a level-triggered flag: once cancelled it stays
//! cancelled. Workers, the dispatcher and the collector poll it at fixed
//! checkpoints; nothing is preempted. Tokens may be derived from a parent and
//! then also read as cancelled once any ancestor is cancelled.
//!
//! A [`CancellationController`] owns the token of the current run and can
//! re-arm a fresh one for the next run. Re-arming cancels the previous token,
//! so a run still in flight on the old token winds down. Sharing one
//! controller between overlapping runs is not supported.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    parent: Option<CancellationToken>,
}

/// Shared, clonable cancellation signal
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that is cancelled when either it or `self` is cancelled
    pub fn child(&self) -> Self {
        Self {
            state: Arc::new(TokenState {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Request cancellation. Idempotent and safe from any thread.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        if self.state.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        self.state
            .parent
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Holds the cancellation token of the current run
#[derive(Debug, Default)]
pub struct CancellationController {
    current: RwLock<CancellationToken>,
}

impl CancellationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for the current run
    pub fn token(&self) -> CancellationToken {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Cancel the current run. Calling this repeatedly has no further effect.
    pub fn trigger(&self) {
        self.token().cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token().is_cancelled()
    }

    /// Cancel the current token and install a fresh one for the next run.
    ///
    /// When `parent` is given, the new token is derived from it so cancelling
    /// the parent also cancels the run.
    pub fn rearm(&self, parent: Option<&CancellationToken>) -> CancellationToken {
        let fresh = match parent {
            Some(parent) => parent.child(),
            None => CancellationToken::new(),
        };

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.cancel();
        *current = fresh.clone();

        tracing::debug!("Cancellation token re-armed");
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_token_starts_active() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let once = CancellationController::new();
        once.trigger();

        let twice = CancellationController::new();
        twice.trigger();
        twice.trigger();

        assert_eq!(once.is_cancelled(), twice.is_cancelled());
        assert!(twice.is_cancelled());
    }

    #[test]
    fn test_clones_share_state_across_threads() {
        let token = CancellationToken::new();
        let remote = token.clone();

        thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }

    #[test]
    fn test_child_follows_parent_but_not_reverse() {
        let parent = CancellationToken::new();
        let child = parent.child();
        let sibling = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
        assert!(!sibling.is_cancelled());

        parent.cancel();
        assert!(sibling.is_cancelled());
    }

    #[test]
    fn test_rearm_cancels_previous_token() {
        let controller = CancellationController::new();
        let first = controller.token();

        let second = controller.rearm(None);

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!controller.is_cancelled());

        controller.trigger();
        assert!(second.is_cancelled());
    }

    #[test]
    fn test_rearm_with_parent() {
        let controller = CancellationController::new();
        let parent = CancellationToken::new();

        let token = controller.rearm(Some(&parent));
        assert!(!token.is_cancelled());

        parent.cancel();
        assert!(token.is_cancelled());
        assert!(controller.is_cancelled());
    }
}
