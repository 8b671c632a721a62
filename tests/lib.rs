// Test library for pricing and rate-cache behavior tests
pub use bei_core::{
    calculate_retail_price, calculate_selling_price, calculate_wholesale_price_tzs,
    calculate_wholesale_price_usd, margin_quote, resolve_profit_fraction, round_up_to_thousand,
    ExchangeRateService, FileRateStore, Freshness, HttpClient, HttpError, HttpRequest,
    HttpResponse, MarginBand, MarginTable, MarkupScheme, MemoryRateStore, RateError, RateStore,
    CACHE_TTL_MS, FETCHED_AT_KEY, RATE_KEY, STANDARD_BANDS,
};
pub use std::sync::Arc;
