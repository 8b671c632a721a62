//! Margin band table mapping buying prices to profit fractions.
//!
//! The table is an ordered list of inclusive price bands. Bands are
//! contiguous and the last band is open-ended, so exactly one band matches
//! any non-negative buying price. Cheap stock carries the highest margin and
//! the fraction steps down as the cost basis grows.

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Fallback fraction when no band matches. Matches the last (open-ended)
/// band of the standard table, so a misconfigured table degrades to the
/// most conservative margin rather than failing.
pub const DEFAULT_PROFIT_FRACTION: f64 = 0.30;

/// One tier of the profit table. Bounds are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginBand {
    pub lower: i64,
    /// Inclusive upper bound; `None` marks the open-ended last band.
    pub upper: Option<i64>,
    pub fraction: f64,
}

impl MarginBand {
    pub const fn bounded(lower: i64, upper: i64, fraction: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
            fraction,
        }
    }

    pub const fn open(lower: i64, fraction: f64) -> Self {
        Self {
            lower,
            upper: None,
            fraction,
        }
    }

    pub fn contains(&self, buying_price: i64) -> bool {
        buying_price >= self.lower && self.upper.map_or(true, |upper| buying_price <= upper)
    }
}

/// The store's standard 16-band profit table, in whole TZS.
pub const STANDARD_BANDS: [MarginBand; 16] = [
    MarginBand::bounded(0, 19_999, 1.00),
    MarginBand::bounded(20_000, 24_999, 0.90),
    MarginBand::bounded(25_000, 30_999, 0.85),
    MarginBand::bounded(31_000, 34_999, 0.80),
    MarginBand::bounded(35_000, 40_999, 0.75),
    MarginBand::bounded(41_000, 44_999, 0.70),
    MarginBand::bounded(45_000, 50_999, 0.65),
    MarginBand::bounded(51_000, 54_999, 0.60),
    MarginBand::bounded(55_000, 60_999, 0.55),
    MarginBand::bounded(61_000, 64_999, 0.50),
    MarginBand::bounded(65_000, 70_999, 0.45),
    MarginBand::bounded(71_000, 74_999, 0.42),
    MarginBand::bounded(75_000, 80_999, 0.38),
    MarginBand::bounded(81_000, 84_999, 0.35),
    MarginBand::bounded(85_000, 90_999, 0.33),
    MarginBand::open(91_000, 0.30),
];

/// Resolve the profit fraction for a buying price against the standard table.
pub fn resolve_profit_fraction(buying_price: i64) -> f64 {
    STANDARD_BANDS
        .iter()
        .find(|band| band.contains(buying_price))
        .map_or(DEFAULT_PROFIT_FRACTION, |band| band.fraction)
}

/// An ordered, validated profit table. Built once, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginTable {
    bands: Vec<MarginBand>,
}

impl MarginTable {
    /// Validate band ordering, contiguity, and full coverage of `[0, +inf)`.
    pub fn new(bands: Vec<MarginBand>) -> Result<Self, ValidationError> {
        let Some(first) = bands.first() else {
            return Err(ValidationError::EmptyMarginTable);
        };
        if first.lower != 0 {
            return Err(ValidationError::MarginTableStart { lower: first.lower });
        }

        for (index, band) in bands.iter().enumerate() {
            if !(band.fraction > 0.0 && band.fraction <= 1.0) {
                return Err(ValidationError::InvalidProfitFraction {
                    fraction: band.fraction,
                });
            }

            match band.upper {
                Some(upper) => {
                    if upper < band.lower {
                        return Err(ValidationError::MarginBandInverted {
                            lower: band.lower,
                            upper,
                        });
                    }
                    match bands.get(index + 1) {
                        Some(next) if next.lower != upper + 1 => {
                            return Err(ValidationError::MarginBandGap {
                                upper,
                                next_lower: next.lower,
                            });
                        }
                        Some(_) => {}
                        None => return Err(ValidationError::MarginTableNotCovering),
                    }
                }
                None if index + 1 != bands.len() => {
                    return Err(ValidationError::MarginBandUnboundedInterior);
                }
                None => {}
            }
        }

        Ok(Self { bands })
    }

    /// The standard store table.
    pub fn standard() -> Self {
        Self {
            bands: STANDARD_BANDS.to_vec(),
        }
    }

    /// Fraction of the first band containing `buying_price`, or
    /// [`DEFAULT_PROFIT_FRACTION`] if nothing matches.
    pub fn resolve(&self, buying_price: i64) -> f64 {
        self.bands
            .iter()
            .find(|band| band.contains(buying_price))
            .map_or(DEFAULT_PROFIT_FRACTION, |band| band.fraction)
    }

    pub fn bands(&self) -> &[MarginBand] {
        &self.bands
    }
}
