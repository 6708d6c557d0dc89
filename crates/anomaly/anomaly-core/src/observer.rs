//! Run observers: a tracing-backed logger and a caller-owned job handle.

use std::sync::{Arc, Mutex, MutexGuard};

use anomaly_spi::{Result, RunObserver, RunSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Observer that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_progress(&self, percent: u8) {
        debug!(percent, "progress");
    }

    fn on_line(&self, line: &str) {
        info!("{}", line);
    }

    fn on_complete(&self, outcome: &Result<RunSummary>) {
        match outcome {
            Ok(summary) => info!(
                method = %summary.method,
                tier = %summary.tier,
                degraded = summary.degraded(),
                "detection completed"
            ),
            Err(err) => error!(error = %err, kind = ?err.kind(), "detection failed"),
        }
    }
}

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// Point-in-time copy of a job's state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub progress: u8,
    /// Diagnostic lines, newline separated.
    pub output: String,
    pub summary: Option<RunSummary>,
    pub error: Option<String>,
}

/// Shareable progress handle owned by the caller.
///
/// Clones share state, so one clone can be handed to a run on a worker thread
/// while another is polled for status.
#[derive(Debug, Clone, Default)]
pub struct JobHandle {
    state: Arc<Mutex<JobSnapshot>>,
}

impl JobHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> JobSnapshot {
        self.lock().clone()
    }

    pub fn status(&self) -> JobStatus {
        self.lock().status
    }

    /// Reset to idle, dropping previous output.
    pub fn reset(&self) {
        *self.lock() = JobSnapshot::default();
    }

    fn lock(&self) -> MutexGuard<'_, JobSnapshot> {
        // a panicking observer elsewhere must not wedge status polling
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RunObserver for JobHandle {
    fn on_progress(&self, percent: u8) {
        let mut state = self.lock();
        state.status = JobStatus::Running;
        state.progress = state.progress.max(percent.min(100));
    }

    fn on_line(&self, line: &str) {
        let mut state = self.lock();
        state.output.push_str(line);
        state.output.push('\n');
    }

    fn on_complete(&self, outcome: &Result<RunSummary>) {
        let mut state = self.lock();
        state.progress = 100;
        match outcome {
            Ok(summary) => {
                state.status = JobStatus::Completed;
                state.summary = Some(summary.clone());
            }
            Err(err) => {
                state.status = JobStatus::Failed;
                state.error = Some(err.to_string());
            }
        }
    }
}

/// Forwards every callback to two observers, first then second.
#[derive(Debug, Clone, Default)]
pub struct FanOut<A, B>(pub A, pub B);

impl<A: RunObserver, B: RunObserver> RunObserver for FanOut<A, B> {
    fn on_progress(&self, percent: u8) {
        self.0.on_progress(percent);
        self.1.on_progress(percent);
    }

    fn on_line(&self, line: &str) {
        self.0.on_line(line);
        self.1.on_line(line);
    }

    fn on_complete(&self, outcome: &Result<RunSummary>) {
        self.0.on_complete(outcome);
        self.1.on_complete(outcome);
    }
}
