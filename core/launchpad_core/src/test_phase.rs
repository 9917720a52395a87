use crate::invariants::{
    assert_all_phase_invariants, assert_no_registration_phases, assert_phases_non_decreasing,
};
use crate::phase::{detect_phase, window_progress};
use crate::types::{Phase, Timeline};

const T0: u64 = 1_700_000_000;

fn full_timeline() -> Timeline {
    Timeline {
        has_registration: true,
        registration_start: Some(T0),
        registration_end: Some(T0 + 10),
        distribution_start: Some(T0 + 20),
        distribution_end: Some(T0 + 30),
    }
}

fn distribution_only(end: Option<u64>) -> Timeline {
    Timeline {
        has_registration: false,
        registration_start: None,
        registration_end: None,
        distribution_start: Some(T0 + 20),
        distribution_end: end,
    }
}

#[test]
fn test_registration_open_midway() {
    let info = detect_phase(&full_timeline(), T0 + 5);
    assert_eq!(info.current_phase, Phase::RegistrationOpen);
    assert_eq!(info.next_phase, Some(Phase::RegistrationClosed));
    assert_eq!(info.progress, 50.0);
    assert_eq!(info.time_to_next_phase, 5);
    assert_eq!(info.phase_start_time, Some(T0));
    assert_eq!(info.phase_end_time, Some(T0 + 10));
}

#[test]
fn test_created_before_registration() {
    let info = detect_phase(&full_timeline(), T0 - 100);
    assert_eq!(info.current_phase, Phase::Created);
    assert_eq!(info.next_phase, Some(Phase::RegistrationOpen));
    assert_eq!(info.time_to_next_phase, 100);
    assert_eq!(info.progress, 0.0);
}

#[test]
fn test_boundaries_are_inclusive_lower_bounds() {
    let timeline = full_timeline();
    assert_eq!(
        detect_phase(&timeline, T0).current_phase,
        Phase::RegistrationOpen
    );
    assert_eq!(
        detect_phase(&timeline, T0 + 10).current_phase,
        Phase::RegistrationClosed
    );
    assert_eq!(
        detect_phase(&timeline, T0 + 20).current_phase,
        Phase::DistributionLive
    );
    assert_eq!(
        detect_phase(&timeline, T0 + 30).current_phase,
        Phase::DistributionEnded
    );
}

#[test]
fn test_registration_closed_scales_over_gap() {
    let info = detect_phase(&full_timeline(), T0 + 15);
    assert_eq!(info.current_phase, Phase::RegistrationClosed);
    assert_eq!(info.next_phase, Some(Phase::DistributionLive));
    assert_eq!(info.progress, 50.0);
    assert_eq!(info.time_to_next_phase, 5);
}

#[test]
fn test_distribution_live_with_end() {
    let info = detect_phase(&full_timeline(), T0 + 22);
    assert_eq!(info.current_phase, Phase::DistributionLive);
    assert_eq!(info.next_phase, Some(Phase::DistributionEnded));
    assert_eq!(info.progress, 20.0);
    assert_eq!(info.time_to_next_phase, 8);
}

#[test]
fn test_distribution_ended() {
    let info = detect_phase(&full_timeline(), T0 + 1_000);
    assert_eq!(info.current_phase, Phase::DistributionEnded);
    assert_eq!(info.next_phase, None);
    assert_eq!(info.progress, 100.0);
    assert_eq!(info.time_to_next_phase, 0);
    assert_eq!(info.phase_start_time, Some(T0 + 30));
}

#[test]
fn test_open_ended_distribution_never_ends() {
    let mut timeline = full_timeline();
    timeline.distribution_end = None;

    for now in [T0 + 20, T0 + 21, T0 + 10_000, u64::MAX] {
        let info = detect_phase(&timeline, now);
        assert_eq!(info.current_phase, Phase::DistributionLive);
        assert_eq!(info.next_phase, None);
        assert_eq!(info.progress, 100.0);
        assert_eq!(info.time_to_next_phase, 0);
    }
}

#[test]
fn test_without_registration_collapses_phases() {
    let timeline = distribution_only(Some(T0 + 30));

    let before = detect_phase(&timeline, T0);
    assert_eq!(before.current_phase, Phase::Created);
    assert_eq!(before.next_phase, Some(Phase::DistributionLive));
    assert_eq!(before.time_to_next_phase, 20);

    assert_eq!(
        detect_phase(&timeline, T0 + 25).current_phase,
        Phase::DistributionLive
    );
    assert_eq!(
        detect_phase(&timeline, T0 + 30).current_phase,
        Phase::DistributionEnded
    );
}

#[test]
fn test_registration_flag_ignored_without_bounds() {
    let mut timeline = distribution_only(Some(T0 + 30));
    timeline.has_registration = true;
    timeline.registration_start = Some(T0);

    let info = detect_phase(&timeline, T0 + 5);
    assert_eq!(info.current_phase, Phase::Created);
    assert_eq!(info.next_phase, Some(Phase::DistributionLive));
}

#[test]
fn test_unscheduled_distribution_waits_in_closed() {
    let mut timeline = full_timeline();
    timeline.distribution_start = None;
    timeline.distribution_end = None;

    let info = detect_phase(&timeline, T0 + 500);
    assert_eq!(info.current_phase, Phase::RegistrationClosed);
    assert_eq!(info.next_phase, Some(Phase::DistributionLive));
    assert_eq!(info.time_to_next_phase, 0);
    assert_eq!(info.progress, 0.0);

    let bare = Timeline::default();
    let info = detect_phase(&bare, T0);
    assert_eq!(info.current_phase, Phase::Created);
    assert_eq!(info.time_to_next_phase, 0);
}

#[test]
fn test_sweep_is_bounded_and_monotonic() {
    let timeline = full_timeline();
    let phases: Vec<Phase> = (T0 - 5..=T0 + 40)
        .map(|now| {
            let info = detect_phase(&timeline, now);
            assert_all_phase_invariants(&info);
            info.current_phase
        })
        .collect();

    assert_phases_non_decreasing(&phases);
    assert_eq!(phases.first(), Some(&Phase::Created));
    assert_eq!(phases.last(), Some(&Phase::DistributionEnded));
    for phase in [
        Phase::RegistrationOpen,
        Phase::RegistrationClosed,
        Phase::DistributionLive,
    ] {
        assert!(phases.contains(&phase), "sweep never visited {phase:?}");
    }
}

#[test]
fn test_sweep_without_registration() {
    let timeline = distribution_only(None);
    let phases: Vec<Phase> = (T0..=T0 + 40)
        .map(|now| {
            let info = detect_phase(&timeline, now);
            assert_all_phase_invariants(&info);
            assert_no_registration_phases(&info);
            info.current_phase
        })
        .collect();
    assert_phases_non_decreasing(&phases);
}

#[test]
fn test_malformed_windows_stay_in_range() {
    let timeline = Timeline {
        has_registration: true,
        registration_start: Some(T0 + 10),
        registration_end: Some(T0),
        distribution_start: Some(T0 + 5),
        distribution_end: Some(T0 + 5),
    };
    for now in T0 - 2..=T0 + 20 {
        assert_all_phase_invariants(&detect_phase(&timeline, now));
    }
}

#[test]
fn test_detect_phase_is_deterministic() {
    let timeline = full_timeline();
    assert_eq!(
        detect_phase(&timeline, T0 + 7),
        detect_phase(&timeline, T0 + 7)
    );
}

#[test]
fn test_window_progress_clamps() {
    assert_eq!(window_progress(10, 20, 5), 0.0);
    assert_eq!(window_progress(10, 20, 25), 100.0);
    assert_eq!(window_progress(10, 10, 10), 100.0);
    assert_eq!(window_progress(20, 10, 15), 100.0);
}

#[test]
fn test_timeline_from_backend_json() {
    let json = r#"{
        "hasRegistration": true,
        "registrationStart": 100,
        "registrationEnd": 200,
        "distributionStart": 300,
        "distributionEnd": null
    }"#;
    let timeline: Timeline = serde_json::from_str(json).unwrap();
    assert!(timeline.has_registration);
    assert_eq!(timeline.registration_end, Some(200));
    assert_eq!(timeline.distribution_end, None);
}
