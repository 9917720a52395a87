//! # Milestone selection
//!
//! Picks the single milestone a sale page should count down to. Timed
//! milestones only qualify while their timestamp is strictly in the future;
//! when none qualifies the selector falls back to the loading placeholder.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::types::{Milestone, MilestoneKind, SaleConfig, SaleStatus, Timestamp};

impl MilestoneKind {
    /// Build the display record for this kind, pinned to `timestamp`.
    pub fn milestone(self, timestamp: Option<Timestamp>) -> Milestone {
        let (label, icon, color, description) = match self {
            Self::WhitelistOpens => (
                "Whitelist Opens",
                "users",
                "blue",
                "Whitelist registration begins",
            ),
            Self::WhitelistCloses => (
                "Whitelist Closes",
                "user-check",
                "orange",
                "Last chance to join the whitelist",
            ),
            Self::SaleStarts => ("Sale Starts", "rocket", "green", "Token sale opens to buyers"),
            Self::SaleEnds => ("Sale Ends", "hourglass", "red", "Sale closes after this time"),
            Self::Processing => (
                "Processing",
                "loader",
                "yellow",
                "Sale results are being processed",
            ),
            Self::ClaimingActive => (
                "Claiming Active",
                "gift",
                "green",
                "Participants can claim their tokens",
            ),
            Self::Ended => ("Ended", "check-circle", "gray", "This sale has ended"),
            Self::Cancelled => ("Cancelled", "x-circle", "red", "This sale was cancelled"),
            Self::Loading => ("Loading...", "clock", "gray", "Fetching sale schedule"),
        };
        Milestone {
            kind: self,
            label,
            timestamp,
            icon,
            color,
            description,
        }
    }
}

/// Select the most relevant upcoming milestone for `status`.
///
/// `None` means the status has not been loaded yet.
pub fn next_milestone(
    status: Option<&SaleStatus>,
    config: &SaleConfig,
    now: Timestamp,
) -> Milestone {
    let upcoming = |ts: Option<Timestamp>| ts.filter(|&t| t > now);

    let selected = match status {
        Some(SaleStatus::Setup | SaleStatus::Upcoming) => upcoming(config.whitelist_start)
            .map(|t| MilestoneKind::WhitelistOpens.milestone(Some(t)))
            .or_else(|| {
                upcoming(config.sale_start).map(|t| MilestoneKind::SaleStarts.milestone(Some(t)))
            }),
        Some(SaleStatus::WhitelistOpen) => upcoming(config.whitelist_end)
            .map(|t| MilestoneKind::WhitelistCloses.milestone(Some(t)))
            .or_else(|| {
                upcoming(config.sale_start).map(|t| MilestoneKind::SaleStarts.milestone(Some(t)))
            }),
        Some(SaleStatus::SaleActive) => {
            upcoming(config.sale_end).map(|t| MilestoneKind::SaleEnds.milestone(Some(t)))
        }
        Some(SaleStatus::SaleEnded | SaleStatus::Distributing | SaleStatus::Failed) => {
            Some(MilestoneKind::Processing.milestone(None))
        }
        Some(SaleStatus::Claiming) => Some(MilestoneKind::ClaimingActive.milestone(None)),
        Some(SaleStatus::Completed | SaleStatus::Refunded | SaleStatus::Finalized) => {
            Some(MilestoneKind::Ended.milestone(None))
        }
        Some(SaleStatus::Cancelled) => Some(MilestoneKind::Cancelled.milestone(None)),
        None => None,
    };

    selected.unwrap_or_else(|| MilestoneKind::Loading.milestone(None))
}

/// `true` while the milestone has a timestamp still in the future.
pub fn has_active_countdown(milestone: &Milestone, now: Timestamp) -> bool {
    milestone.timestamp.is_some_and(|t| t > now)
}

/// Time left until the milestone; zero once it has passed or when untimed.
pub fn time_remaining(milestone: &Milestone, now: Timestamp) -> Duration {
    milestone
        .timestamp
        .map(|t| Duration::from_secs(t.saturating_sub(now)))
        .unwrap_or(Duration::ZERO)
}

/// A duration split into calendar-style units for countdown display.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub fn from_duration(duration: Duration) -> Self {
        let total = duration.as_secs();
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
        }
        write!(
            f,
            "{:02}h {:02}m {:02}s",
            self.hours, self.minutes, self.seconds
        )
    }
}
