//! Deployment pipeline poller.
//!
//! ```text
//! Idle ──start──► Polling ──stop──► Stopped
//!                    │ ├──progress = 100──► Completed
//!                    │ └──failed, no retry──► Failed
//!                    └◄──────── restart ──────────┘
//! ```
//!
//! One background task per poller fetches progress right away and then every
//! interval. A tick awaits its fetch before the next tick is taken and late
//! ticks are skipped, so fetches never overlap. Every start and restart bumps
//! a generation counter and cancels the previous loop; a fetch that resolves
//! after a stop or a newer generation is discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use launchpad_core::{PipelineProgress, PipelineSummary};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::rpc::PipelineBackend;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Shorter intervals are raised to this floor.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollerStatus {
    Idle,
    Polling,
    Stopped,
    Completed,
    Failed,
}

/// Serializable snapshot of a poller for status consumers.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollerView {
    pub deployment_id: String,
    pub status: PollerStatus,
    pub error: Option<String>,
    pub progress: Option<PipelineProgress>,
    pub summary: Option<PipelineSummary>,
    pub last_updated: Option<DateTime<Utc>>,
}

struct PollerState {
    status: PollerStatus,
    progress: Option<PipelineProgress>,
    error: Option<String>,
    generation: u64,
    interval: Duration,
    cancel: Option<CancellationToken>,
    last_updated: Option<DateTime<Utc>>,
}

struct Shared {
    backend: Arc<dyn PipelineBackend>,
    deployment_id: String,
    state: Mutex<PollerState>,
}

/// Polls one deployment's pipeline progress.
///
/// Dropping the poller cancels its background task.
pub struct PipelinePoller {
    shared: Arc<Shared>,
}

impl PipelinePoller {
    pub fn new(backend: Arc<dyn PipelineBackend>, deployment_id: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                deployment_id: deployment_id.into(),
                state: Mutex::new(PollerState {
                    status: PollerStatus::Idle,
                    progress: None,
                    error: None,
                    generation: 0,
                    interval: DEFAULT_POLL_INTERVAL,
                    cancel: None,
                    last_updated: None,
                }),
            }),
        }
    }

    pub fn deployment_id(&self) -> &str {
        &self.shared.deployment_id
    }

    /// Fetch once right away, then keep fetching every `interval`.
    ///
    /// Does nothing while already polling. The fetches run on a spawned
    /// task, so this returns without waiting for the backend.
    pub fn start(&self, interval: Duration) {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let mut state = self.shared.lock();
        if state.status == PollerStatus::Polling {
            debug!("Poller for {} already running", self.shared.deployment_id);
            return;
        }
        self.spawn_loop(&mut state, interval);
    }

    /// Begin a new generation and spawn its poll loop, cancelling any loop
    /// still running for an older one.
    fn spawn_loop(&self, state: &mut PollerState, interval: Duration) {
        state.generation += 1;
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
        state.status = PollerStatus::Polling;
        state.interval = interval;
        let token = CancellationToken::new();
        state.cancel = Some(token.clone());

        info!(
            "Polling pipeline {} every {:?} (generation {})",
            self.shared.deployment_id, interval, state.generation
        );
        let shared = Arc::clone(&self.shared);
        tokio::spawn(shared.run(state.generation, interval, token));
    }

    /// Cancel polling. Safe to call in any state.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        state.generation += 1;
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
        if state.status == PollerStatus::Polling {
            state.status = PollerStatus::Stopped;
            info!("Stopped polling pipeline {}", self.shared.deployment_id);
        }
    }

    /// Ask the backend to restart the pipeline, then refresh.
    ///
    /// On success the error is cleared and a fresh poll loop starts with an
    /// immediate fetch. Results still in flight from before the restart are
    /// discarded. On failure the error is recorded and returned and the
    /// polling state is left alone.
    pub async fn restart(&self) -> Result<()> {
        if let Err(e) = self
            .shared
            .backend
            .restart_pipeline(&self.shared.deployment_id)
            .await
        {
            warn!(
                "Restart of pipeline {} failed: {e}",
                self.shared.deployment_id
            );
            self.shared.lock().error = Some(e.to_string());
            return Err(e);
        }

        info!("Restarted pipeline {}", self.shared.deployment_id);
        let mut state = self.shared.lock();
        state.error = None;
        let interval = state.interval;
        self.spawn_loop(&mut state, interval);
        Ok(())
    }

    pub fn status(&self) -> PollerStatus {
        self.shared.lock().status
    }

    pub fn is_polling(&self) -> bool {
        self.status() == PollerStatus::Polling
    }

    pub fn progress(&self) -> Option<PipelineProgress> {
        self.shared.lock().progress.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.shared.lock().error.clone()
    }

    pub fn view(&self) -> PollerView {
        let state = self.shared.lock();
        PollerView {
            deployment_id: self.shared.deployment_id.clone(),
            status: state.status,
            error: state.error.clone(),
            summary: state.progress.as_ref().map(PipelineProgress::summary),
            progress: state.progress.clone(),
            last_updated: state.last_updated,
        }
    }
}

impl Drop for PipelinePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(self: Arc<Self>, generation: u64, period: Duration, token: CancellationToken) {
        // The first tick completes at once, giving the immediate fetch.
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let keep_polling = tokio::select! {
                _ = token.cancelled() => false,
                keep = self.tick(generation) => keep,
            };
            if !keep_polling {
                break;
            }
        }
        debug!(
            "Poll loop for {} (generation {generation}) exited",
            self.deployment_id
        );
    }

    /// Fetch once and apply the result. Returns whether polling should go on.
    async fn tick(&self, generation: u64) -> bool {
        let result = self.backend.fetch_progress(&self.deployment_id).await;

        let mut state = self.lock();
        if state.generation != generation || state.status != PollerStatus::Polling {
            debug!(
                "Discarding progress for {} from stale generation {generation}",
                self.deployment_id
            );
            return false;
        }

        match result {
            Ok(progress) => {
                let finished = if progress.is_complete() {
                    Some(PollerStatus::Completed)
                } else if progress.is_terminal() {
                    Some(PollerStatus::Failed)
                } else {
                    None
                };
                debug!(
                    "Pipeline {} at {:.0}% ({})",
                    self.deployment_id, progress.overall_progress, progress.status
                );
                state.progress = Some(progress);
                state.error = None;
                state.last_updated = Some(Utc::now());

                match finished {
                    Some(status) => {
                        state.status = status;
                        if let Some(token) = state.cancel.take() {
                            token.cancel();
                        }
                        info!(
                            "Pipeline {} finished polling: {:?}",
                            self.deployment_id, status
                        );
                        false
                    }
                    None => true,
                }
            }
            Err(e) => {
                warn!("Pipeline {} poll error: {e}", self.deployment_id);
                state.error = Some(e.to_string());
                true
            }
        }
    }
}
