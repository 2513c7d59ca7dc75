//! Cooperative cancellation.

use crate::error::{CoreError, CoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative cancellation flag shared between the caller and workers.
///
/// Workers observe the token at their checkpoints (the start of each
/// segment fill); once cancelled, every in-flight worker returns
/// [`CoreError::Interrupted`] at its next checkpoint and the orchestrator
/// reports the cancellation after all workers have stopped.
///
/// Tokens are cheaply cloneable; clones share the same flag.
///
/// # Example
///
/// ```rust
/// use dexpack_core::CancelToken;
///
/// let token = CancelToken::new();
/// assert!(token.check().is_ok());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    ///
    /// Idempotent; there is no way to un-cancel a token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns [`CoreError::Interrupted`] if cancellation has been
    /// requested.
    ///
    /// # Errors
    ///
    /// Returns an error exactly when [`is_cancelled`](Self::is_cancelled)
    /// is `true`.
    pub fn check(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            Err(CoreError::Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_passes_check() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn cancelled_token_fails_check() {
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(token.check(), Err(CoreError::Interrupted)));
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();
        assert!(token.is_cancelled());
    }
}
