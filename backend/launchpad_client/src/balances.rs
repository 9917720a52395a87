//! Batched balance fetching.
//!
//! Tokens are queried in fixed-size batches, one batch at a time, with a
//! pause between batches so a wallet holding many tokens does not trip the
//! backend's rate limit. A failed batch costs only its own tokens.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use launchpad_core::{format_compact, format_usd, to_display_amount, usd_value, TokenDescriptor};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::rpc::BalanceBackend;

pub const DEFAULT_BATCH_SIZE: usize = 40;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);
const DISPLAY_DECIMALS: u32 = 4;

/// Synchronous symbol → USD price lookup backed by an already-warm cache.
pub trait PriceLookup {
    fn price(&self, symbol: &str) -> Option<Decimal>;
}

impl PriceLookup for HashMap<String, Decimal> {
    fn price(&self, symbol: &str) -> Option<Decimal> {
        self.get(symbol).copied()
    }
}

/// One token's balance, converted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub canister_id: String,
    pub symbol: String,
    /// Raw integer units, as a string since it may exceed 2^53.
    #[serde(with = "raw_as_string")]
    pub raw: u128,
    pub balance: Decimal,
    pub usd_value: Decimal,
    /// `balance` shortened with a K/M/B suffix.
    pub balance_display: String,
    /// `usd_value` as `$1,234.56`.
    pub usd_display: String,
}

mod raw_as_string {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(raw: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(raw)
    }
}

#[derive(Clone)]
pub struct BalanceBatcher {
    backend: Arc<dyn BalanceBackend>,
    batch_size: usize,
    batch_delay: Duration,
}

impl BalanceBatcher {
    pub fn new(backend: Arc<dyn BalanceBackend>, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            backend,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    pub fn with_defaults(backend: Arc<dyn BalanceBackend>) -> Self {
        Self::new(backend, DEFAULT_BATCH_SIZE, DEFAULT_BATCH_DELAY)
    }

    /// Fetch `owner`'s balance of every token in `tokens`.
    ///
    /// Returns a fresh map keyed by canister id. Tokens the backend did not
    /// answer for are absent, which callers must read as "unknown" rather
    /// than zero. An empty token list or a missing owner yields an empty map
    /// without touching the backend.
    pub async fn fetch_balances(
        &self,
        tokens: &[TokenDescriptor],
        owner: Option<&str>,
        prices: &impl PriceLookup,
    ) -> HashMap<String, BalanceView> {
        let mut views = HashMap::new();

        let owner = match owner.map(str::trim) {
            Some(owner) if !owner.is_empty() => owner,
            _ => return views,
        };
        if tokens.is_empty() {
            return views;
        }

        let batch_count = tokens.len().div_ceil(self.batch_size);
        for (index, batch) in tokens.chunks(self.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.batch_delay).await;
            }

            let canister_ids: Vec<String> = batch.iter().map(|t| t.canister_id.clone()).collect();
            let raw_balances = match self.backend.fetch_balances(owner, &canister_ids).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "Balance batch {}/{} failed ({} tokens): {e}",
                        index + 1,
                        batch_count,
                        batch.len()
                    );
                    continue;
                }
            };

            let resolved = insert_views(batch, &raw_balances, prices, &mut views);
            debug!(
                "Balance batch {}/{}: {} of {} tokens resolved",
                index + 1,
                batch_count,
                resolved,
                batch.len()
            );
        }

        views
    }
}

/// Convert the batch's answered balances into views. Returns how many were
/// inserted; entries for canisters outside `batch` are ignored.
fn insert_views(
    batch: &[TokenDescriptor],
    raw_balances: &HashMap<String, u128>,
    prices: &impl PriceLookup,
    views: &mut HashMap<String, BalanceView>,
) -> usize {
    let mut resolved = 0;
    for token in batch {
        let Some(&raw) = raw_balances.get(&token.canister_id) else {
            continue;
        };
        match balance_view(token, raw, prices) {
            Some(view) => {
                views.insert(token.canister_id.clone(), view);
                resolved += 1;
            }
            None => warn!(
                "Cannot represent balance {raw} of {} with {} decimals",
                token.symbol, token.decimals
            ),
        }
    }
    resolved
}

fn balance_view(
    token: &TokenDescriptor,
    raw: u128,
    prices: &impl PriceLookup,
) -> Option<BalanceView> {
    let balance = to_display_amount(raw, token.decimals).ok()?;
    let usd_value = usd_value(balance, prices.price(&token.symbol));
    Some(BalanceView {
        canister_id: token.canister_id.clone(),
        symbol: token.symbol.clone(),
        raw,
        balance,
        usd_value,
        balance_display: format_compact(balance, DISPLAY_DECIMALS),
        usd_display: format_usd(usd_value),
    })
}
