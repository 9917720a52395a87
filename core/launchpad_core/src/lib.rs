//! # Launchpad Core
//!
//! Pure, clock-free logic shared by every launchpad client surface:
//!
//! | Concern            | Entry Point(s)                                   |
//! |--------------------|--------------------------------------------------|
//! | Campaign lifecycle | [`detect_phase`]                                 |
//! | Sale countdown     | [`next_milestone`], [`time_remaining`]           |
//! | Deployment status  | [`PipelineProgress::summary`], [`PipelineProgress::is_terminal`] |
//! | Token amounts      | [`to_display_amount`], [`usd_value`], [`format_usd`] |
//!
//! ## Architecture
//!
//! Nothing in this crate performs I/O or reads the system clock; every
//! function that depends on time takes `now` from the caller. Remote calls,
//! polling and batching live in the `launchpad_client` crate.

pub mod amount;
pub mod milestone;
pub mod phase;
pub mod pipeline;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_phase;
#[cfg(test)]
mod test_pipeline;

pub use amount::{format_compact, format_usd, to_display_amount, usd_value, AmountError};
pub use milestone::{has_active_countdown, next_milestone, time_remaining, Countdown};
pub use phase::detect_phase;
pub use pipeline::{PipelineProgress, PipelineSummary, Step, StepStatus};
pub use types::{
    timestamp_from_nanos, Milestone, MilestoneKind, Phase, PhaseInfo, SaleConfig, SaleStatus,
    Timeline, Timestamp, TokenDescriptor,
};
