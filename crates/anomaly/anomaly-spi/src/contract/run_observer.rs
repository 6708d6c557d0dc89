//! Run progress reporting trait.

use crate::error::Result;
use crate::model::RunSummary;

/// Narrow reporting interface passed into a detection run.
///
/// All methods have empty defaults so observers only implement what they
/// consume. Observers take `&self`; implementations that record state use
/// interior mutability so a handle can be shared with another thread.
pub trait RunObserver: Send + Sync {
    /// Coarse progress in percent, monotonically non-decreasing within a run.
    fn on_progress(&self, _percent: u8) {}

    /// A human readable diagnostic line.
    fn on_line(&self, _line: &str) {}

    /// Called exactly once when the run finishes, successfully or not.
    fn on_complete(&self, _outcome: &Result<RunSummary>) {}
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}
