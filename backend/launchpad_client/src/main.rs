//! Launchpad client service: entry point.
//!
//! Starts a background poller for the configured deployment pipeline and
//! exposes a small Axum REST API for the frontend: pipeline status and
//! restart, phase and milestone derivation, batched balances, and the shared
//! assets-panel toggle.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use launchpad_client::api::{self, ApiState};
use launchpad_client::assets_panel::AssetsPanel;
use launchpad_client::balances::BalanceBatcher;
use launchpad_client::config::Config;
use launchpad_client::poller::PipelinePoller;
use launchpad_client::rpc::RpcClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(config.rpc_timeout_secs))
        .build()?;
    let rpc = Arc::new(RpcClient::new(
        client,
        config.backend_url.clone(),
        config.rpc_max_attempts,
    ));

    // ─── Background pipeline poller ───────────────────────
    let poller = match &config.deployment_id {
        Some(deployment_id) => {
            let poller = Arc::new(PipelinePoller::new(rpc.clone(), deployment_id.clone()));
            poller.start(config.poll_interval());
            Some(poller)
        }
        None => {
            info!("DEPLOYMENT_ID not set; pipeline polling disabled");
            None
        }
    };

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(ApiState {
        poller: poller.clone(),
        batcher: BalanceBatcher::new(
            rpc,
            config.balance_batch_size,
            config.balance_batch_delay(),
        ),
        assets_panel: AssetsPanel::default(),
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/pipeline", get(api::get_pipeline))
        .route("/pipeline/restart", post(api::restart_pipeline))
        .route("/phase", post(api::post_phase))
        .route("/milestone", post(api::post_milestone))
        .route("/balances", post(api::post_balances))
        .route("/assets-panel", get(api::get_assets_panel))
        .route("/assets-panel/toggle", post(api::toggle_assets_panel))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some(poller) = poller {
        poller.stop();
    }
    info!("Shut down");

    Ok(())
}
