//! # Types
//!
//! Shared data structures used across all modules of the launchpad core.
//!
//! ## Design decisions
//!
//! ### Timestamps
//!
//! Every instant is a [`Timestamp`]: unix seconds as `u64`. The backend
//! reports instants in nanoseconds; convert them at the boundary with
//! [`timestamp_from_nanos`].
//!
//! ### Phase as an ordered lifecycle
//!
//! [`Phase`] is totally ordered in the sequence a campaign walks through:
//!
//! ```text
//! Created ──► RegistrationOpen ──► RegistrationClosed ──► DistributionLive ──► DistributionEnded
//!    └──────────────────────────────────────────────────────►┘   (no registration)
//! ```
//!
//! A campaign without a registration window never visits the two
//! registration phases.
//!
//! ### Sale status as a closed sum type
//!
//! The backend encodes the sale status as a single-key variant object
//! (`{"SaleActive": null}`). [`SaleStatus`] deserializes from that shape, so
//! callers match exhaustively instead of probing keys.

use serde::{Deserialize, Serialize};

/// Unix time in seconds.
pub type Timestamp = u64;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Convert a backend nanosecond instant into a [`Timestamp`].
pub fn timestamp_from_nanos(nanos: u64) -> Timestamp {
    nanos / NANOS_PER_SECOND
}

/// Absolute instants that drive a campaign's lifecycle.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub has_registration: bool,
    pub registration_start: Option<Timestamp>,
    pub registration_end: Option<Timestamp>,
    pub distribution_start: Option<Timestamp>,
    /// `None` keeps the distribution open forever.
    pub distribution_end: Option<Timestamp>,
}

/// Lifecycle phase of a timed campaign.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing has opened yet.
    Created,
    /// Participants may register.
    RegistrationOpen,
    /// Registration is over; distribution has not started.
    RegistrationClosed,
    /// Tokens are being distributed.
    DistributionLive,
    /// Distribution window is over.
    DistributionEnded,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::RegistrationOpen => "registration_open",
            Self::RegistrationClosed => "registration_closed",
            Self::DistributionLive => "distribution_live",
            Self::DistributionEnded => "distribution_ended",
        }
    }
}

/// Snapshot derived from a `(Timeline, now)` pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInfo {
    pub current_phase: Phase,
    pub next_phase: Option<Phase>,
    /// Seconds until `next_phase` begins; `0` when there is none.
    pub time_to_next_phase: u64,
    /// Percentage of the current phase elapsed, within `[0, 100]`.
    pub progress: f64,
    pub phase_start_time: Option<Timestamp>,
    pub phase_end_time: Option<Timestamp>,
}

/// Status of a token sale as reported by the backend.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SaleStatus {
    Setup,
    Upcoming,
    WhitelistOpen,
    SaleActive,
    SaleEnded,
    Distributing,
    Failed,
    Claiming,
    Completed,
    Refunded,
    Finalized,
    Cancelled,
}

/// Sale timestamps a milestone can count down to.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleConfig {
    pub whitelist_start: Option<Timestamp>,
    pub whitelist_end: Option<Timestamp>,
    pub sale_start: Option<Timestamp>,
    pub sale_end: Option<Timestamp>,
}

/// Which milestone was selected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    WhitelistOpens,
    WhitelistCloses,
    SaleStarts,
    SaleEnds,
    Processing,
    ClaimingActive,
    Ended,
    Cancelled,
    Loading,
}

/// Display record for the most relevant upcoming milestone.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub label: &'static str,
    pub timestamp: Option<Timestamp>,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

/// A token whose balance can be queried; identity is `canister_id`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    pub canister_id: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(default)]
    pub name: Option<String>,
}
