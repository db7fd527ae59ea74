//! Progress reporting and cooperative cancellation
//!
//! The scheduler's coordinator is the only caller of a [`RunMonitor`]; worker
//! tasks never see it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observer of a running computation
///
/// Both methods are polled from the coordinating thread between accepted
/// window results.
pub trait RunMonitor {
    /// Completion fraction in `[0, 1]`, never decreasing within a run
    fn on_progress(&self, _fraction: f64) {}

    /// Whether the caller asked to stop
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Monitor that ignores progress and never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl RunMonitor for NoopMonitor {}

/// Shared cancellation flag
///
/// Clones share the same flag, so one clone can be handed to a signal handler
/// or UI while another is polled by the run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// New, not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl RunMonitor for CancellationToken {
    fn is_cancelled(&self) -> bool {
        Self::is_cancelled(self)
    }
}

/// Monitor forwarding progress to a callback and cancellation to a token
pub struct ProgressMonitor<F> {
    callback: F,
    token: CancellationToken,
}

impl<F: Fn(f64)> ProgressMonitor<F> {
    /// Monitor with its own token
    pub fn new(callback: F) -> Self {
        Self::with_token(callback, CancellationToken::new())
    }

    /// Monitor sharing an existing token
    pub const fn with_token(callback: F, token: CancellationToken) -> Self {
        Self { callback, token }
    }

    /// Token controlling this monitor
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<F: Fn(f64)> RunMonitor for ProgressMonitor<F> {
    fn on_progress(&self, fraction: f64) {
        (self.callback)(fraction);
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<F> fmt::Debug for ProgressMonitor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressMonitor")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
