//! Launchpad client service.
//!
//! Watches a deployment pipeline on the launchpad backend, batches balance
//! lookups for a wallet, and serves both through a small REST API together
//! with the pure phase and milestone logic from `launchpad_core`.

pub mod api;
pub mod assets_panel;
pub mod balances;
pub mod config;
pub mod errors;
pub mod poller;
pub mod rpc;
