//! # Bei Core
//!
//! Pricing domain and exchange-rate service for the bei toolkit, the
//! back-office pricing logic of a Tanzanian handbag store.
//!
//! ## Overview
//!
//! - **Margin table** mapping buying prices to profit fractions, with a
//!   validated standard 16-band configuration
//! - **Pure calculators** for the single-margin selling price and the
//!   flat-markup multi-currency quote (retail, wholesale TZS, wholesale USD)
//! - **Exchange-rate service** with a 24-hour two-layer cache
//!   (in-memory + durable key-value mirror) and stale-while-error fallback
//! - **HTTP client abstraction** so the rate fetch is testable offline
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Value types (`PriceQuote`, `MarginQuote`) and input guards |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`margin`] | Margin band table and profit-fraction resolution |
//! | [`pricing`] | Pure pricing calculators and markup schemes |
//! | [`rates`] | Exchange-rate service and durable rate store |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bei_core::{ExchangeRateService, FileRateStore, MarkupScheme, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = ExchangeRateService::new(
//!         Arc::new(FileRateStore::new(FileRateStore::default_path())),
//!         Arc::new(ReqwestHttpClient::new()),
//!     );
//!
//!     let rate = service.fetch().await.ok().map(|quote| quote.rate);
//!     if let Some(quote) = MarkupScheme::CURRENT.quote(50_000, rate) {
//!         println!("retail: TSh {}", quote.retail_tzs);
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Calculators are total functions: invalid input yields `0` (or `None` for
//! the typed quote constructors), never a panic. The rate service returns
//! `Result<RateQuote, RateError>`; a legitimate rate is never `0`, and the
//! `rate_or_zero` adapter exists only for callers bound to the legacy
//! sentinel contract.

pub mod domain;
pub mod error;
pub mod http_client;
pub mod margin;
pub mod pricing;
pub mod rates;

// Re-export commonly used types at crate root for convenience

// Domain types
pub use domain::{validate_currency_code, MarginQuote, PriceQuote};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Margin table
pub use margin::{
    resolve_profit_fraction, MarginBand, MarginTable, DEFAULT_PROFIT_FRACTION, STANDARD_BANDS,
};

// Pricing calculators
pub use pricing::{
    calculate_retail_price, calculate_selling_price, calculate_wholesale_price_tzs,
    calculate_wholesale_price_usd, margin_quote, round_up_to_thousand, MarkupScheme,
};

// Exchange rates
pub use rates::store::{FileRateStore, MemoryRateStore, RateStore, FETCHED_AT_KEY, RATE_KEY};
pub use rates::{
    ExchangeRateService, Freshness, RateError, RateQuote, RateSnapshot, CACHE_TTL_MS,
    DEFAULT_ENDPOINT, DEFAULT_TARGET_CURRENCY,
};
