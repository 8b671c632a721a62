//! Domain value types shared by the calculators and the CLI.

mod models;

pub use models::{validate_currency_code, MarginQuote, PriceQuote};
