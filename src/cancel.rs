use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Error;

/// A cheap, cloneable handle that lets a caller ask a running diff or merge
/// to abort.
///
/// Cancellation is advisory and cooperative: algorithms poll
/// [`CancellationToken::is_cancelled`] at well-defined points (every D-step
/// in Myers, every popped region in Histogram) and return
/// [`Error::Interrupted`] rather than unwinding through a panic.
///
/// Cloning a token shares the same underlying flag, so the same token can be
/// handed to [`diff`](crate::diff::diff) and polled/cancelled from another
/// thread.
#[derive(Clone, Default, Debug)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that has not been cancelled yet.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request cancellation. Safe to call from any thread holding a clone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on this
    /// token or any of its clones.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns `Err(Error::Interrupted)` if cancelled, `Ok(())` otherwise.
    /// Algorithms call this at their cooperative-cancellation checkpoints.
    #[inline]
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}
