use thiserror::Error;

/// Validation and contract errors exposed by `bei-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("margin table cannot be empty")]
    EmptyMarginTable,
    #[error("first margin band must start at 0, got {lower}")]
    MarginTableStart { lower: i64 },
    #[error("margin band lower bound {lower} exceeds upper bound {upper}")]
    MarginBandInverted { lower: i64, upper: i64 },
    #[error("margin bands must be contiguous: band ending at {upper} is followed by one starting at {next_lower}")]
    MarginBandGap { upper: i64, next_lower: i64 },
    #[error("only the last margin band may be open-ended")]
    MarginBandUnboundedInterior,
    #[error("the last margin band must be open-ended to cover all prices")]
    MarginTableNotCovering,
    #[error("profit fraction {fraction} must be in (0, 1]")]
    InvalidProfitFraction { fraction: f64 },

    #[error("buying price must be a whole TZS amount, got '{value}'")]
    InvalidBuyingPrice { value: String },
}
