// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SAR/SDG exchange rate: cached snapshot, provider fallback chain, periodic refresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::db::KeyValueStore;
use crate::errors::{Error, Result};
use crate::models::RateSnapshot;

pub const RATE_CACHE_KEY: &str = "rateSARSDG";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value>;
}

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.json::<Value>().await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateEndpoints {
    /// Quotes a single pair: `{direct}?base=SAR&symbols=SDG`.
    pub direct: String,
    /// Quotes everything against one base: `{base_rates}/SAR`.
    pub base_rates: String,
}

impl Default for RateEndpoints {
    fn default() -> Self {
        Self {
            direct: "https://api.exchangerate.host/latest".to_string(),
            base_rates: "https://open.er-api.com/v6/latest".to_string(),
        }
    }
}

impl RateEndpoints {
    pub fn direct_url(&self, base: &str, symbol: &str) -> String {
        format!("{}?base={}&symbols={}", self.direct, base, symbol)
    }

    pub fn base_url(&self, base: &str) -> String {
        format!("{}/{}", self.base_rates.trim_end_matches('/'), base)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateState {
    /// SDG per 1 SAR; zero until a rate has been loaded or fetched.
    pub rate: Decimal,
    pub last_updated: Option<DateTime<Utc>>,
    pub loading: bool,
    pub error: bool,
}

pub struct RateProvider {
    fetcher: Arc<dyn HttpFetch>,
    cache: Arc<dyn KeyValueStore>,
    endpoints: RateEndpoints,
    attempt_timeout: Duration,
    state: watch::Sender<RateState>,
}

impl RateProvider {
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        cache: Arc<dyn KeyValueStore>,
        endpoints: RateEndpoints,
    ) -> Self {
        let (state, _) = watch::channel(RateState::default());
        Self {
            fetcher,
            cache,
            endpoints,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            state,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<RateState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RateState {
        self.state.borrow().clone()
    }

    pub fn rate(&self) -> Decimal {
        self.state.borrow().rate
    }

    /// Publish the persisted snapshot, if there is a readable one.
    pub async fn load_cached(&self) -> Option<RateSnapshot> {
        let raw = match self.cache.get(RATE_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("could not read cached rate: {e}");
                return None;
            }
        };
        match serde_json::from_str::<RateSnapshot>(&raw) {
            Ok(snapshot) => {
                debug!(rate = %snapshot.rate, "loaded cached exchange rate");
                self.state.send_modify(|s| {
                    s.rate = snapshot.rate;
                    s.last_updated = Some(snapshot.last_updated);
                });
                Some(snapshot)
            }
            Err(e) => {
                warn!("ignoring unreadable cached rate: {e}");
                None
            }
        }
    }

    /// Publish the cached rate, then refresh when it is missing or older than
    /// `max_age`. A failed refresh leaves the cached rate in place.
    pub async fn fresh_rate(&self, max_age: Duration) -> Decimal {
        let stale = match self.load_cached().await {
            Some(snapshot) => (Utc::now() - snapshot.last_updated)
                .to_std()
                .is_ok_and(|age| age >= max_age),
            None => true,
        };
        if stale {
            // failure is logged and reflected in the state
            let _ = self.refresh().await;
        }
        self.rate()
    }

    /// Run the provider chain once. On failure the previous rate stays published
    /// and `error` is raised.
    pub async fn refresh(&self) -> Result<Decimal> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = false;
        });
        match self.fetch_rate().await {
            Ok(rate) => {
                let snapshot = RateSnapshot {
                    rate,
                    last_updated: Utc::now(),
                };
                if let Err(e) = self.persist(&snapshot).await {
                    warn!("could not persist exchange rate: {e}");
                }
                self.state.send_modify(|s| {
                    s.rate = snapshot.rate;
                    s.last_updated = Some(snapshot.last_updated);
                    s.loading = false;
                    s.error = false;
                });
                info!(%rate, "exchange rate refreshed");
                Ok(rate)
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = true;
                });
                warn!("exchange rate refresh failed: {e}");
                Err(e)
            }
        }
    }

    /// SDG per SAR from the first provider that answers with a usable quote.
    pub async fn fetch_rate(&self) -> Result<Decimal> {
        let direct = self.endpoints.direct_url("SAR", "SDG");
        match self.get_json(&direct).await {
            Ok(body) => match quote(&body, "SDG") {
                Some(rate) => return Ok(rate),
                None => warn!("direct provider returned no SDG quote"),
            },
            Err(e) => warn!("direct provider failed: {e}"),
        }

        let sar_url = self.endpoints.base_url("SAR");
        match self.get_json(&sar_url).await {
            Ok(body) => match quote(&body, "SDG") {
                Some(rate) => return Ok(rate),
                None => warn!("base-rate provider returned no SDG quote"),
            },
            Err(e) => warn!("base-rate provider failed: {e}"),
        }

        let sdg_url = self.endpoints.base_url("SDG");
        let (sar, sdg) = tokio::join!(self.get_json(&sar_url), self.get_json(&sdg_url));
        match (sar, sdg) {
            (Ok(sar), Ok(sdg)) => {
                let cross = quote(&sar, "USD")
                    .zip(quote(&sdg, "USD"))
                    .and_then(|(sar_usd, sdg_usd)| sar_usd.checked_div(sdg_usd))
                    .filter(|r| *r > Decimal::ZERO);
                if let Some(rate) = cross {
                    debug!(%rate, "using USD cross rate");
                    return Ok(rate);
                }
                warn!("cross rate unavailable: missing USD quote");
            }
            (Err(e), _) | (_, Err(e)) => warn!("cross rate request failed: {e}"),
        }

        Err(Error::RateUnavailable)
    }

    /// Load the cache, then refresh immediately and every `every` until the handle
    /// is cancelled or dropped. A cycle starts only after the previous one settled.
    pub fn spawn(self: Arc<Self>, every: Duration) -> RefreshHandle {
        let every = every.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            self.load_cached().await;
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // failure is already logged and reflected in the state
                let _ = self.refresh().await;
            }
        });
        RefreshHandle { task }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        match tokio::time::timeout(self.attempt_timeout, self.fetcher.get_json(url)).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout(url.to_string())),
        }
    }

    async fn persist(&self, snapshot: &RateSnapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.cache.set(RATE_CACHE_KEY, &raw).await
    }
}

fn quote(body: &Value, symbol: &str) -> Option<Decimal> {
    let v = body.get("rates")?.get(symbol)?.as_f64()?;
    if !v.is_finite() || v <= 0.0 {
        return None;
    }
    Decimal::try_from(v).ok()
}

/// Periodic refresh task. Dropping the handle stops it; a response still in flight
/// is discarded with the task.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
