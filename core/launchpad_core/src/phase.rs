//! # Phase clock
//!
//! Maps a [`Timeline`] and a caller-supplied `now` to a [`PhaseInfo`].
//!
//! | Window                                   | Phase                | Next                 |
//! |------------------------------------------|----------------------|----------------------|
//! | `now < registration_start`               | `Created`            | `RegistrationOpen`   |
//! | `[registration_start, registration_end)` | `RegistrationOpen`   | `RegistrationClosed` |
//! | `[registration_end, distribution_start)` | `RegistrationClosed` | `DistributionLive`   |
//! | `[distribution_start, distribution_end)` | `DistributionLive`   | `DistributionEnded`  |
//! | `distribution_end <= now`                | `DistributionEnded`  | none                 |
//!
//! Lower bounds are inclusive. An open-ended distribution stays
//! `DistributionLive` forever and reports 100% progress.
//!
//! The clock never reads the system time, so a render tick that captures
//! `now` once gets consistent answers from every call it makes.

use crate::types::{Phase, PhaseInfo, Timeline, Timestamp};

/// Derive the current lifecycle phase of `timeline` at `now`.
pub fn detect_phase(timeline: &Timeline, now: Timestamp) -> PhaseInfo {
    match (
        timeline.has_registration,
        timeline.registration_start,
        timeline.registration_end,
    ) {
        (true, Some(start), Some(end)) => with_registration(timeline, start, end, now),
        _ => without_registration(timeline, now),
    }
}

fn with_registration(
    timeline: &Timeline,
    registration_start: Timestamp,
    registration_end: Timestamp,
    now: Timestamp,
) -> PhaseInfo {
    if now < registration_start {
        return PhaseInfo {
            current_phase: Phase::Created,
            next_phase: Some(Phase::RegistrationOpen),
            time_to_next_phase: registration_start.saturating_sub(now),
            progress: 0.0,
            phase_start_time: None,
            phase_end_time: Some(registration_start),
        };
    }

    if now < registration_end {
        return PhaseInfo {
            current_phase: Phase::RegistrationOpen,
            next_phase: Some(Phase::RegistrationClosed),
            time_to_next_phase: registration_end.saturating_sub(now),
            progress: window_progress(registration_start, registration_end, now),
            phase_start_time: Some(registration_start),
            phase_end_time: Some(registration_end),
        };
    }

    let Some(distribution_start) = timeline.distribution_start else {
        // Registration is over and distribution has not been scheduled.
        return PhaseInfo {
            current_phase: Phase::RegistrationClosed,
            next_phase: Some(Phase::DistributionLive),
            time_to_next_phase: 0,
            progress: 0.0,
            phase_start_time: Some(registration_end),
            phase_end_time: None,
        };
    };

    if now < distribution_start {
        return PhaseInfo {
            current_phase: Phase::RegistrationClosed,
            next_phase: Some(Phase::DistributionLive),
            time_to_next_phase: distribution_start.saturating_sub(now),
            progress: window_progress(registration_end, distribution_start, now),
            phase_start_time: Some(registration_end),
            phase_end_time: Some(distribution_start),
        };
    }

    distribution(distribution_start, timeline.distribution_end, now)
}

fn without_registration(timeline: &Timeline, now: Timestamp) -> PhaseInfo {
    let Some(distribution_start) = timeline.distribution_start else {
        return PhaseInfo {
            current_phase: Phase::Created,
            next_phase: Some(Phase::DistributionLive),
            time_to_next_phase: 0,
            progress: 0.0,
            phase_start_time: None,
            phase_end_time: None,
        };
    };

    if now < distribution_start {
        return PhaseInfo {
            current_phase: Phase::Created,
            next_phase: Some(Phase::DistributionLive),
            time_to_next_phase: distribution_start.saturating_sub(now),
            progress: 0.0,
            phase_start_time: None,
            phase_end_time: Some(distribution_start),
        };
    }

    distribution(distribution_start, timeline.distribution_end, now)
}

/// Shared tail of both branches, with `now >= distribution_start`.
fn distribution(
    distribution_start: Timestamp,
    distribution_end: Option<Timestamp>,
    now: Timestamp,
) -> PhaseInfo {
    match distribution_end {
        None => PhaseInfo {
            current_phase: Phase::DistributionLive,
            next_phase: None,
            time_to_next_phase: 0,
            progress: 100.0,
            phase_start_time: Some(distribution_start),
            phase_end_time: None,
        },
        Some(end) if now < end => PhaseInfo {
            current_phase: Phase::DistributionLive,
            next_phase: Some(Phase::DistributionEnded),
            time_to_next_phase: end.saturating_sub(now),
            progress: window_progress(distribution_start, end, now),
            phase_start_time: Some(distribution_start),
            phase_end_time: Some(end),
        },
        Some(end) => PhaseInfo {
            current_phase: Phase::DistributionEnded,
            next_phase: None,
            time_to_next_phase: 0,
            progress: 100.0,
            phase_start_time: Some(end),
            phase_end_time: None,
        },
    }
}

/// Percentage of `[start, end]` elapsed at `now`, clamped to `[0, 100]`.
///
/// An empty or inverted window counts as fully elapsed.
pub fn window_progress(start: Timestamp, end: Timestamp, now: Timestamp) -> f64 {
    if end <= start {
        return 100.0;
    }
    let elapsed = now.saturating_sub(start) as f64;
    let span = (end - start) as f64;
    (elapsed / span * 100.0).clamp(0.0, 100.0)
}
