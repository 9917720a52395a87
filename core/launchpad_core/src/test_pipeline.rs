use crate::invariants::assert_step_counts_consistent;
use crate::pipeline::{PipelineProgress, Step, StepStatus};

fn step(name: &str, status: StepStatus) -> Step {
    Step {
        name: name.to_string(),
        stage: "deploy".to_string(),
        status,
        progress: 0.0,
        error_message: None,
    }
}

fn progress(steps: Vec<Step>, overall: f64, can_retry: bool) -> PipelineProgress {
    PipelineProgress {
        status: "running".to_string(),
        steps,
        overall_progress: overall,
        can_retry,
    }
}

#[test]
fn test_current_step_prefers_processing() {
    let p = progress(
        vec![
            step("create_token", StepStatus::Completed),
            step("mint", StepStatus::Pending),
            step("fund", StepStatus::Processing),
        ],
        40.0,
        true,
    );
    assert_eq!(p.current_step().map(|s| s.name.as_str()), Some("fund"));
    assert_eq!(p.completed_count(), 1);
    assert!(!p.is_terminal());
    assert_step_counts_consistent(&p);
}

#[test]
fn test_current_step_falls_back_to_pending() {
    let p = progress(
        vec![
            step("create_token", StepStatus::Completed),
            step("mint", StepStatus::Pending),
        ],
        50.0,
        true,
    );
    assert_eq!(p.current_step().map(|s| s.name.as_str()), Some("mint"));
}

#[test]
fn test_complete_is_terminal() {
    let p = progress(vec![step("a", StepStatus::Completed)], 100.0, false);
    assert!(p.is_complete());
    assert!(p.is_terminal());
    assert!(p.current_step().is_none());
}

#[test]
fn test_failure_is_terminal_only_without_retry() {
    let mut failed = step("mint", StepStatus::Failed);
    failed.error_message = Some("insufficient cycles".to_string());

    let retryable = progress(vec![failed.clone()], 30.0, true);
    assert!(retryable.has_failed());
    assert!(!retryable.is_terminal());

    let fatal = progress(vec![failed], 30.0, false);
    assert!(fatal.is_terminal());
    let summary = fatal.summary();
    assert_eq!(summary.failed_steps, vec!["mint".to_string()]);
    assert!(!summary.is_complete);
}

#[test]
fn test_summary_clamps_progress() {
    let p = progress(vec![], 140.0, false);
    assert_eq!(p.summary().overall_progress, 100.0);
    let p = progress(vec![], -3.0, false);
    assert_eq!(p.clamped_progress(), 0.0);
}

#[test]
fn test_progress_from_backend_json() {
    let json = r#"{
        "status": "processing",
        "steps": [
            {"name": "Deploy ledger", "stage": "ledger", "status": "completed", "progress": 100},
            {"name": "Deploy index", "stage": "index", "status": "failed",
             "progress": 10, "errorMessage": "out of cycles"}
        ],
        "overallProgress": 55,
        "canRetry": true
    }"#;
    let p: PipelineProgress = serde_json::from_str(json).unwrap();
    assert_eq!(p.steps.len(), 2);
    assert_eq!(p.steps[1].status, StepStatus::Failed);
    assert_eq!(p.steps[1].error_message.as_deref(), Some("out of cycles"));
    assert_eq!(p.overall_progress, 55.0);
    assert!(p.can_retry);
}
