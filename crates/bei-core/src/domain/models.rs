use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Derived prices for one product under the flat-markup scheme.
///
/// All TZS amounts are whole shillings. `wholesale_usd` is `None` when no
/// valid exchange rate is available; callers must not display or persist a
/// USD figure in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub buying_tzs: i64,
    pub retail_tzs: i64,
    pub wholesale_tzs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wholesale_usd: Option<i64>,
}

/// Derived price under the single-margin-table scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginQuote {
    pub buying_tzs: i64,
    /// Always a multiple of 1,000.
    pub selling_tzs: i64,
    pub profit_fraction: f64,
}

/// Validate and normalize currency to an uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_currency() {
        assert_eq!(
            validate_currency_code("tzs").expect("must normalize"),
            "TZS"
        );
        assert!(matches!(
            validate_currency_code("TZSH"),
            Err(ValidationError::InvalidCurrency { .. })
        ));
        assert!(matches!(
            validate_currency_code("tz$"),
            Err(ValidationError::InvalidCurrency { .. })
        ));
    }

    #[test]
    fn price_quote_omits_missing_usd_field() {
        let quote = PriceQuote {
            buying_tzs: 50_000,
            retail_tzs: 60_000,
            wholesale_tzs: 53_000,
            wholesale_usd: None,
        };
        let json = serde_json::to_string(&quote).expect("serializable");
        assert!(!json.contains("wholesale_usd"));
    }
}
