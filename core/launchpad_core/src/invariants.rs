#![allow(dead_code)]

use crate::pipeline::PipelineProgress;
use crate::types::{Phase, PhaseInfo};

/// Progress always lies within `[0, 100]`.
pub fn assert_progress_bounded(info: &PhaseInfo) {
    assert!(
        (0.0..=100.0).contains(&info.progress),
        "progress out of range: {} in {:?}",
        info.progress,
        info.current_phase
    );
}

/// A terminal phase has nothing left to count down to.
pub fn assert_terminal_has_no_next(info: &PhaseInfo) {
    if info.next_phase.is_none() {
        assert_eq!(
            info.time_to_next_phase, 0,
            "no next phase but time_to_next_phase = {}",
            info.time_to_next_phase
        );
    }
}

/// The next phase, when present, comes strictly after the current one.
pub fn assert_next_follows_current(info: &PhaseInfo) {
    if let Some(next) = info.next_phase {
        assert!(
            next > info.current_phase,
            "next phase {:?} does not follow {:?}",
            next,
            info.current_phase
        );
    }
}

/// Phases visited while time moves forward never go backwards.
pub fn assert_phases_non_decreasing(phases: &[Phase]) {
    for pair in phases.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "phase went backwards: {:?} -> {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// A timeline without registration never reports a registration phase.
pub fn assert_no_registration_phases(info: &PhaseInfo) {
    assert!(
        !matches!(
            info.current_phase,
            Phase::RegistrationOpen | Phase::RegistrationClosed
        ),
        "registration phase {:?} on a timeline without registration",
        info.current_phase
    );
}

/// Completed and failed counts never exceed the number of steps.
pub fn assert_step_counts_consistent(progress: &PipelineProgress) {
    let summary = progress.summary();
    assert!(
        summary.completed_steps + summary.failed_steps.len() <= summary.total_steps,
        "step counts exceed total: {:?}",
        summary
    );
}

/// Run all stateless phase invariants.
pub fn assert_all_phase_invariants(info: &PhaseInfo) {
    assert_progress_bounded(info);
    assert_terminal_has_no_next(info);
    assert_next_follows_current(info);
}
