//! Exchange-rate fetching with a 24-hour two-layer cache.
//!
//! The upstream free FX API is rate-limited to ~1,500 requests per month, so
//! a fetched rate is reused for a full day. Lookup order:
//!
//! 1. fresh in-memory snapshot (no I/O);
//! 2. fresh durable snapshot, promoted into memory (no network I/O);
//! 3. network fetch, written back to both layers.
//!
//! On fetch failure any remembered snapshot is served marked [`Freshness::Stale`]
//! (stale-while-error); only with no snapshot at all does the call fail.
//! Concurrent refreshes are collapsed onto a single network request.

pub mod store;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::domain::validate_currency_code;
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::ValidationError;
use store::{RateStore, FETCHED_AT_KEY, RATE_KEY};

/// Snapshots stay fresh for exactly 24 hours.
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1_000;

/// USD-based rate table from the free tier of exchangerate-api.
pub const DEFAULT_ENDPOINT: &str = "https://open.er-api.com/v6/latest/USD";

/// The store's home currency.
pub const DEFAULT_TARGET_CURRENCY: &str = "TZS";

/// A cached exchange rate: local-currency units per one USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub rate: f64,
    pub fetched_at_ms: i64,
}

impl RateSnapshot {
    pub const fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.fetched_at_ms < CACHE_TTL_MS
    }

    /// Fetch time as an RFC 3339 UTC string, for display.
    pub fn fetched_at_rfc3339(&self) -> Option<String> {
        let ts = time::OffsetDateTime::from_unix_timestamp_nanos(
            self.fetched_at_ms as i128 * 1_000_000,
        )
        .ok()?;
        ts.format(&time::format_description::well_known::Rfc3339)
            .ok()
    }
}

/// Whether a returned rate is within its 24-hour window or served as a
/// degraded fallback after a failed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    Stale,
}

/// A usable exchange rate with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: f64,
    pub fetched_at_ms: i64,
    pub freshness: Freshness,
}

impl RateQuote {
    const fn from_snapshot(snapshot: RateSnapshot, freshness: Freshness) -> Self {
        Self {
            rate: snapshot.rate,
            fetched_at_ms: snapshot.fetched_at_ms,
            freshness,
        }
    }
}

/// Why no exchange rate could be produced. All variants are non-fatal; the
/// caller suppresses the USD figure and may retry on a later user action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error("rate transport error: {0}")]
    Transport(String),
    #[error("rate service returned status {0}")]
    UpstreamStatus(u16),
    #[error("malformed rate payload: {0}")]
    MalformedPayload(String),
    #[error("rate payload has no usable entry for {0}")]
    MissingCurrency(String),
}

#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Injectable exchange-rate service. Owns the in-memory snapshot; the
/// durable store and HTTP transport are supplied by the caller, so server
/// handlers and tests control isolation explicitly.
pub struct ExchangeRateService {
    memory: RwLock<Option<RateSnapshot>>,
    // Collapses concurrent refreshes onto one network request.
    refresh_lock: Mutex<()>,
    store: Arc<dyn RateStore>,
    http: Arc<dyn HttpClient>,
    endpoint: String,
    target_currency: String,
    timeout_ms: u64,
}

impl ExchangeRateService {
    pub fn new(store: Arc<dyn RateStore>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            memory: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            store,
            http,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            target_currency: DEFAULT_TARGET_CURRENCY.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_target_currency(mut self, code: &str) -> Result<Self, ValidationError> {
        self.target_currency = validate_currency_code(code)?;
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Current rate, fetching over the network only when both cache layers
    /// have expired. See the module docs for the full layering and the
    /// stale-while-error fallback.
    pub async fn fetch(&self) -> Result<RateQuote, RateError> {
        let now = now_ms();

        if let Some(snapshot) = *self.memory.read().await {
            if snapshot.is_fresh(now) {
                return Ok(RateQuote::from_snapshot(snapshot, Freshness::Fresh));
            }
        }

        let _guard = self.refresh_lock.lock().await;
        let now = now_ms();

        // A racing caller may have refreshed while we waited on the lock.
        if let Some(snapshot) = *self.memory.read().await {
            if snapshot.is_fresh(now) {
                return Ok(RateQuote::from_snapshot(snapshot, Freshness::Fresh));
            }
        }

        if let Some(snapshot) = self.load_durable() {
            if snapshot.is_fresh(now) {
                *self.memory.write().await = Some(snapshot);
                return Ok(RateQuote::from_snapshot(snapshot, Freshness::Fresh));
            }
        }

        match self.fetch_remote().await {
            Ok(rate) => {
                let snapshot = RateSnapshot {
                    rate,
                    fetched_at_ms: now,
                };
                *self.memory.write().await = Some(snapshot);
                self.store.put(RATE_KEY, &rate.to_string());
                self.store.put(FETCHED_AT_KEY, &now.to_string());
                Ok(RateQuote::from_snapshot(snapshot, Freshness::Fresh))
            }
            Err(error) => {
                // Stale-while-error: an expired snapshot beats failing
                // outright. Memory wins over the durable mirror.
                let fallback = (*self.memory.read().await).or_else(|| self.load_durable());
                match fallback {
                    Some(snapshot) => {
                        *self.memory.write().await = Some(snapshot);
                        Ok(RateQuote::from_snapshot(snapshot, Freshness::Stale))
                    }
                    None => Err(error),
                }
            }
        }
    }

    /// Legacy sentinel contract: the rate, or `0.0` when unavailable.
    /// Callers must treat `0.0` as failure, never as a valid rate.
    pub async fn rate_or_zero(&self) -> f64 {
        self.fetch().await.map(|quote| quote.rate).unwrap_or(0.0)
    }

    /// In-memory snapshot without fetching or touching the durable store.
    pub async fn cached_rate(&self) -> Option<RateSnapshot> {
        *self.memory.read().await
    }

    /// Durable snapshot, ignoring freshness. Read-only.
    pub fn stored_rate(&self) -> Option<RateSnapshot> {
        self.load_durable()
    }

    /// Clear both layers. Best-effort; storage errors are absorbed by the
    /// store implementation.
    pub async fn clear_cache(&self) {
        *self.memory.write().await = None;
        self.store.remove(RATE_KEY);
        self.store.remove(FETCHED_AT_KEY);
    }

    fn load_durable(&self) -> Option<RateSnapshot> {
        let rate = self.store.get(RATE_KEY)?.parse::<f64>().ok()?;
        let fetched_at_ms = self.store.get(FETCHED_AT_KEY)?.parse::<i64>().ok()?;
        (rate.is_finite() && rate > 0.0).then_some(RateSnapshot {
            rate,
            fetched_at_ms,
        })
    }

    async fn fetch_remote(&self) -> Result<f64, RateError> {
        let request = HttpRequest::get(&self.endpoint).with_timeout_ms(self.timeout_ms);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| RateError::Transport(error.message().to_owned()))?;

        if !response.is_success() {
            return Err(RateError::UpstreamStatus(response.status));
        }

        let payload: RatesPayload = serde_json::from_str(&response.body)
            .map_err(|error| RateError::MalformedPayload(error.to_string()))?;

        payload
            .rates
            .get(&self.target_currency)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| RateError::MissingCurrency(self.target_currency.clone()))
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::store::MemoryRateStore;
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        calls: AtomicUsize,
    }

    impl RecordingHttpClient {
        fn with_rate(rate: f64) -> Self {
            Self {
                response: Ok(HttpResponse::ok_json(format!(
                    r#"{{"result":"success","rates":{{"TZS":{rate},"KES":129.3}}}}"#
                ))),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(HttpError::new("upstream timeout")),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_status(status: u16) -> Self {
            Self {
                response: Ok(HttpResponse {
                    status,
                    body: String::new(),
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn service(
        store: Arc<dyn RateStore>,
        http: Arc<RecordingHttpClient>,
    ) -> ExchangeRateService {
        ExchangeRateService::new(store, http)
    }

    fn seed_durable(store: &dyn RateStore, rate: f64, age_ms: i64) {
        store.put(RATE_KEY, &rate.to_string());
        store.put(FETCHED_AT_KEY, &(now_ms() - age_ms).to_string());
    }

    #[tokio::test]
    async fn first_fetch_hits_network_and_caches() {
        let http = Arc::new(RecordingHttpClient::with_rate(2_516.35));
        let store = Arc::new(MemoryRateStore::new());
        let service = service(store.clone(), http.clone());

        let quote = service.fetch().await.expect("fetch succeeds");
        assert_eq!(quote.rate, 2_516.35);
        assert_eq!(quote.freshness, Freshness::Fresh);
        assert_eq!(http.call_count(), 1);

        // Both durable keys were written as strings.
        assert!(store.get(RATE_KEY).is_some());
        assert!(store.get(FETCHED_AT_KEY).is_some());
    }

    #[tokio::test]
    async fn second_fetch_within_ttl_uses_memory() {
        let http = Arc::new(RecordingHttpClient::with_rate(2_516.35));
        let service = service(Arc::new(MemoryRateStore::new()), http.clone());

        let first = service.fetch().await.expect("fetch succeeds");
        let second = service.fetch().await.expect("cached fetch succeeds");

        assert_eq!(first.rate, second.rate);
        assert_eq!(second.freshness, Freshness::Fresh);
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn fresh_durable_snapshot_avoids_network() {
        let http = Arc::new(RecordingHttpClient::with_rate(9_999.0));
        let store = Arc::new(MemoryRateStore::new());
        seed_durable(store.as_ref(), 2_500.0, 60_000);

        let service = service(store, http.clone());
        let quote = service.fetch().await.expect("durable hit");

        assert_eq!(quote.rate, 2_500.0);
        assert_eq!(quote.freshness, Freshness::Fresh);
        assert_eq!(http.call_count(), 0);
        // Promoted into memory.
        assert_eq!(service.cached_rate().await.map(|s| s.rate), Some(2_500.0));
    }

    #[tokio::test]
    async fn expired_durable_snapshot_triggers_refetch() {
        let http = Arc::new(RecordingHttpClient::with_rate(2_600.0));
        let store = Arc::new(MemoryRateStore::new());
        seed_durable(store.as_ref(), 2_500.0, CACHE_TTL_MS + 1_000);

        let service = service(store, http.clone());
        let quote = service.fetch().await.expect("refetch");

        assert_eq!(quote.rate, 2_600.0);
        assert_eq!(quote.freshness, Freshness::Fresh);
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_durable_snapshot() {
        let http = Arc::new(RecordingHttpClient::failing());
        let store = Arc::new(MemoryRateStore::new());
        seed_durable(store.as_ref(), 2_500.0, CACHE_TTL_MS + 1_000);

        let service = service(store, http.clone());
        let quote = service.fetch().await.expect("stale fallback");

        assert_eq!(quote.rate, 2_500.0);
        assert_eq!(quote.freshness, Freshness::Stale);
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_without_any_cache_errors() {
        let http = Arc::new(RecordingHttpClient::failing());
        let service = service(Arc::new(MemoryRateStore::new()), http);

        let error = service.fetch().await.expect_err("nothing to fall back to");
        assert!(matches!(error, RateError::Transport(_)));
        assert_eq!(service.rate_or_zero().await, 0.0);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let http = Arc::new(RecordingHttpClient::with_status(503));
        let service = service(Arc::new(MemoryRateStore::new()), http);

        let error = service.fetch().await.expect_err("bad status");
        assert_eq!(error, RateError::UpstreamStatus(503));
    }

    #[tokio::test]
    async fn missing_target_currency_is_reported() {
        let http = Arc::new(RecordingHttpClient {
            response: Ok(HttpResponse::ok_json(r#"{"rates":{"KES":129.3}}"#)),
            calls: AtomicUsize::new(0),
        });
        let service = service(Arc::new(MemoryRateStore::new()), http);

        let error = service.fetch().await.expect_err("no TZS entry");
        assert_eq!(error, RateError::MissingCurrency("TZS".to_owned()));
    }

    #[tokio::test]
    async fn malformed_payload_is_reported() {
        let http = Arc::new(RecordingHttpClient {
            response: Ok(HttpResponse::ok_json("<html>nope</html>")),
            calls: AtomicUsize::new(0),
        });
        let service = service(Arc::new(MemoryRateStore::new()), http);

        let error = service.fetch().await.expect_err("not json");
        assert!(matches!(error, RateError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn zero_rate_in_payload_is_rejected() {
        let http = Arc::new(RecordingHttpClient::with_rate(0.0));
        let service = service(Arc::new(MemoryRateStore::new()), http);

        let error = service.fetch().await.expect_err("zero is not a rate");
        assert_eq!(error, RateError::MissingCurrency("TZS".to_owned()));
    }

    #[tokio::test]
    async fn concurrent_fetches_collapse_to_one_request() {
        let http = Arc::new(RecordingHttpClient::with_rate(2_516.35));
        let service = Arc::new(service(Arc::new(MemoryRateStore::new()), http.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.fetch().await })
            })
            .collect();

        for task in tasks {
            let quote = task.await.expect("join").expect("fetch succeeds");
            assert_eq!(quote.rate, 2_516.35);
        }
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn clear_cache_drops_both_layers() {
        let http = Arc::new(RecordingHttpClient::with_rate(2_516.35));
        let store = Arc::new(MemoryRateStore::new());
        let service = service(store.clone(), http);

        service.fetch().await.expect("fetch succeeds");
        assert!(service.cached_rate().await.is_some());

        service.clear_cache().await;
        assert!(service.cached_rate().await.is_none());
        assert_eq!(store.get(RATE_KEY), None);
        assert_eq!(store.get(FETCHED_AT_KEY), None);
    }

    #[tokio::test]
    async fn target_currency_is_configurable() {
        let http = Arc::new(RecordingHttpClient::with_rate(2_516.35));
        let service = ExchangeRateService::new(Arc::new(MemoryRateStore::new()), http)
            .with_target_currency("kes")
            .expect("valid code");

        let quote = service.fetch().await.expect("KES entry exists");
        assert_eq!(quote.rate, 129.3);
    }

    #[test]
    fn snapshot_freshness_window_is_24_hours() {
        let snapshot = RateSnapshot {
            rate: 2_500.0,
            fetched_at_ms: 0,
        };
        assert!(snapshot.is_fresh(CACHE_TTL_MS - 1));
        assert!(!snapshot.is_fresh(CACHE_TTL_MS));
    }

    #[test]
    fn snapshot_formats_fetch_time() {
        let snapshot = RateSnapshot {
            rate: 2_500.0,
            fetched_at_ms: 1_700_000_000_000,
        };
        assert_eq!(
            snapshot.fetched_at_rfc3339().as_deref(),
            Some("2023-11-14T22:13:20Z")
        );
    }
}
