//! # Deployment pipeline model
//!
//! Mirrors the progress document the backend returns for a deployment, plus
//! the aggregates a progress view needs. A [`PipelineProgress`] is always
//! replaced wholesale by the next fetch; nothing here merges snapshots.

use serde::{Deserialize, Serialize};

/// Status of a single pipeline step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    pub stage: String,
    pub status: StepStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Progress of a remote deployment pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineProgress {
    pub status: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub overall_progress: f64,
    #[serde(default)]
    pub can_retry: bool,
}

impl PipelineProgress {
    /// The step being worked on: the first processing step, else the first
    /// pending one.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Processing)
            .or_else(|| self.steps.iter().find(|s| s.status == StepStatus::Pending))
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }

    pub fn failed_steps(&self) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .collect()
    }

    pub fn has_failed(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Failed)
    }

    pub fn is_complete(&self) -> bool {
        self.overall_progress >= 100.0
    }

    /// No further progress can happen without an explicit restart.
    pub fn is_terminal(&self) -> bool {
        self.is_complete() || (self.has_failed() && !self.can_retry)
    }

    /// Overall progress clamped to `[0, 100]`.
    pub fn clamped_progress(&self) -> f64 {
        self.overall_progress.clamp(0.0, 100.0)
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            current_step: self.current_step().map(|s| s.name.clone()),
            completed_steps: self.completed_count(),
            total_steps: self.steps.len(),
            failed_steps: self.failed_steps().iter().map(|s| s.name.clone()).collect(),
            overall_progress: self.clamped_progress(),
            is_complete: self.is_complete(),
            can_retry: self.can_retry,
        }
    }
}

/// Aggregates derived from one [`PipelineProgress`] snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub current_step: Option<String>,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub failed_steps: Vec<String>,
    pub overall_progress: f64,
    pub is_complete: bool,
    pub can_retry: bool,
}
