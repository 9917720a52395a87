//! Axum REST API handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use launchpad_core::{
    detect_phase, has_active_countdown, next_milestone, time_remaining, Countdown, Milestone,
    SaleConfig, SaleStatus, Timeline, Timestamp, TokenDescriptor,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::assets_panel::AssetsPanel;
use crate::balances::{BalanceBatcher, BalanceView};
use crate::poller::PipelinePoller;

#[derive(Clone)]
pub struct ApiState {
    /// `None` when no deployment is being watched.
    pub poller: Option<Arc<PipelinePoller>>,
    pub batcher: BalanceBatcher,
    pub assets_panel: AssetsPanel,
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PhaseRequest {
    pub timeline: Timeline,
    pub now: Option<Timestamp>,
}

#[derive(Deserialize)]
pub struct MilestoneRequest {
    pub status: Option<SaleStatus>,
    #[serde(default)]
    pub config: SaleConfig,
    pub now: Option<Timestamp>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneResponse {
    pub milestone: Milestone,
    pub has_active_countdown: bool,
    pub time_remaining_secs: u64,
    pub countdown: Countdown,
    pub countdown_label: String,
}

#[derive(Deserialize)]
pub struct BalancesRequest {
    pub owner: Option<String>,
    #[serde(default)]
    pub tokens: Vec<TokenDescriptor>,
    #[serde(default)]
    pub prices: HashMap<String, Decimal>,
}

#[derive(Serialize)]
pub struct BalancesResponse {
    pub count: usize,
    pub balances: HashMap<String, BalanceView>,
}

#[derive(Serialize)]
pub struct PanelResponse {
    pub open: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn unix_now() -> Timestamp {
    Utc::now().timestamp().max(0) as Timestamp
}

fn no_deployment() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "no deployment is being watched".to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /pipeline`
///
/// Returns the latest pipeline snapshot with derived step aggregates.
pub async fn get_pipeline(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match &state.poller {
        Some(poller) => (StatusCode::OK, Json(poller.view())).into_response(),
        None => no_deployment(),
    }
}

/// `POST /pipeline/restart`
pub async fn restart_pipeline(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let Some(poller) = &state.poller else {
        return no_deployment();
    };
    match poller.restart().await {
        Ok(()) => (StatusCode::OK, Json(poller.view())).into_response(),
        Err(e) => {
            error!("Pipeline restart failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `POST /phase`
///
/// Derives the campaign phase for the posted timeline. `now` defaults to the
/// server clock.
pub async fn post_phase(Json(request): Json<PhaseRequest>) -> impl IntoResponse {
    let now = request.now.unwrap_or_else(unix_now);
    Json(detect_phase(&request.timeline, now))
}

/// `POST /milestone`
pub async fn post_milestone(Json(request): Json<MilestoneRequest>) -> impl IntoResponse {
    let now = request.now.unwrap_or_else(unix_now);
    let milestone = next_milestone(request.status.as_ref(), &request.config, now);
    let remaining = time_remaining(&milestone, now);
    let countdown = Countdown::from_duration(remaining);
    Json(MilestoneResponse {
        has_active_countdown: has_active_countdown(&milestone, now),
        time_remaining_secs: remaining.as_secs(),
        countdown_label: countdown.to_string(),
        countdown,
        milestone,
    })
}

/// `POST /balances`
///
/// Tokens without an entry in the response have an unknown balance.
pub async fn post_balances(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<BalancesRequest>,
) -> impl IntoResponse {
    let balances = state
        .batcher
        .fetch_balances(&request.tokens, request.owner.as_deref(), &request.prices)
        .await;
    Json(BalancesResponse {
        count: balances.len(),
        balances,
    })
}

/// `GET /assets-panel`
pub async fn get_assets_panel(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(PanelResponse {
        open: state.assets_panel.is_open(),
    })
}

/// `POST /assets-panel/toggle`
pub async fn toggle_assets_panel(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(PanelResponse {
        open: state.assets_panel.toggle(),
    })
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
