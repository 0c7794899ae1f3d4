//! Cooperative cancellation.
//!
//! The round loop polls a [`CancellationSource`] once per round, after the
//! observer has seen the round. Polling never blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Non-blocking "has a stop been requested?" check.
pub trait CancellationSource {
    fn is_cancelled(&self) -> bool;
}

/// One-shot stop flag shared between the simulation and whoever may stop it.
///
/// Clones share the same flag. Cancelling more than once has no further
/// effect, and reading the flag does not reset it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the simulation stop after the current round.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl CancellationSource for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// A source that never asks the simulation to stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancellationSource for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let remote = token.clone();
        assert!(!token.is_cancelled());

        remote.cancel();
        assert!(token.is_cancelled());
        // Still set after being observed
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let token = CancelToken::new();
        let remote = token.clone();
        thread::spawn(move || {
            remote.cancel();
            remote.cancel();
        })
        .join()
        .unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_never_cancel() {
        assert!(!NeverCancel.is_cancelled());
    }
}
