//! Pure pricing calculators.
//!
//! Two schemes coexist in the store's history:
//!
//! - the single-margin scheme, which applies a profit fraction from the
//!   margin table and rounds the result up to the next thousand shillings;
//! - the flat-markup multi-currency scheme, which adds fixed markups and
//!   quotes the wholesale price in USD via a live exchange rate.
//!
//! All calculators share the same input guard: a buying price of zero or
//! less yields `0`, a sentinel the caller must treat as "not computable"
//! and never persist or display as a real price.

use serde::{Deserialize, Serialize};

use crate::domain::{MarginQuote, PriceQuote};
use crate::margin::{resolve_profit_fraction, MarginTable};

/// Round up to the nearest multiple of 1,000. Non-positive values yield 0;
/// values near `i64::MAX` saturate to the largest representable multiple.
pub const fn round_up_to_thousand(value: i64) -> i64 {
    if value <= 0 {
        return 0;
    }
    (value.saturating_add(999) / 1_000) * 1_000
}

/// Selling price under the single-margin scheme, against the standard table.
///
/// `buying + buying * fraction`, rounded up to the next thousand.
pub fn calculate_selling_price(buying_price: i64) -> i64 {
    selling_price_with(&MarginTable::standard(), buying_price)
}

/// Selling price under the single-margin scheme, against a custom table.
pub fn selling_price_with(table: &MarginTable, buying_price: i64) -> i64 {
    if buying_price <= 0 {
        return 0;
    }
    let fraction = table.resolve(buying_price);
    let raw = buying_price as f64 + buying_price as f64 * fraction;
    round_up_to_thousand(raw.ceil() as i64)
}

/// Full quote under the single-margin scheme, or `None` if not computable.
pub fn margin_quote(buying_price: i64) -> Option<MarginQuote> {
    if buying_price <= 0 {
        return None;
    }
    Some(MarginQuote {
        buying_tzs: buying_price,
        selling_tzs: calculate_selling_price(buying_price),
        profit_fraction: resolve_profit_fraction(buying_price),
    })
}

/// Flat markups, in whole TZS, for the multi-currency scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupScheme {
    /// Added to the buying price for the customer-facing retail price.
    pub retail_markup: i64,
    /// Added to the buying price for the bulk-buyer TZS price.
    pub wholesale_markup: i64,
    /// Added on top of the wholesale TZS price before converting to USD.
    pub export_markup: i64,
}

impl MarkupScheme {
    /// Canonical constants from the latest revision of the store.
    pub const CURRENT: Self = Self {
        retail_markup: 10_000,
        wholesale_markup: 3_000,
        export_markup: 2_000,
    };

    /// Constants from the earlier generation of the product form, kept as a
    /// selectable configuration rather than silently merged.
    pub const LEGACY: Self = Self {
        retail_markup: 12_000,
        wholesale_markup: 7_000,
        export_markup: 9_000,
    };

    pub const fn retail_price(&self, buying_price: i64) -> i64 {
        if buying_price <= 0 {
            return 0;
        }
        buying_price.saturating_add(self.retail_markup)
    }

    pub const fn wholesale_price_tzs(&self, buying_price: i64) -> i64 {
        if buying_price <= 0 {
            return 0;
        }
        buying_price.saturating_add(self.wholesale_markup)
    }

    /// Wholesale price in whole USD, rounded up. Returns 0 when the buying
    /// price or the exchange rate is invalid; callers must treat 0 as
    /// "unavailable", not as a price.
    pub fn wholesale_price_usd(&self, buying_price: i64, exchange_rate: f64) -> i64 {
        if buying_price <= 0 {
            return 0;
        }
        if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
            return 0;
        }
        let amount_tzs = self
            .wholesale_price_tzs(buying_price)
            .saturating_add(self.export_markup);
        (amount_tzs as f64 / exchange_rate).ceil() as i64
    }

    /// Full quote, or `None` if the buying price is not computable. The USD
    /// figure is `None` when no valid exchange rate was supplied.
    pub fn quote(&self, buying_price: i64, exchange_rate: Option<f64>) -> Option<PriceQuote> {
        if buying_price <= 0 {
            return None;
        }
        let wholesale_usd = exchange_rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map(|rate| self.wholesale_price_usd(buying_price, rate));
        Some(PriceQuote {
            buying_tzs: buying_price,
            retail_tzs: self.retail_price(buying_price),
            wholesale_tzs: self.wholesale_price_tzs(buying_price),
            wholesale_usd,
        })
    }
}

/// Retail price under the canonical markup scheme.
pub const fn calculate_retail_price(buying_price: i64) -> i64 {
    MarkupScheme::CURRENT.retail_price(buying_price)
}

/// Wholesale TZS price under the canonical markup scheme.
pub const fn calculate_wholesale_price_tzs(buying_price: i64) -> i64 {
    MarkupScheme::CURRENT.wholesale_price_tzs(buying_price)
}

/// Wholesale USD price under the canonical markup scheme.
pub fn calculate_wholesale_price_usd(buying_price: i64, exchange_rate: f64) -> i64 {
    MarkupScheme::CURRENT.wholesale_price_usd(buying_price, exchange_rate)
}
