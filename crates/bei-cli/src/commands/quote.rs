use bei_core::{margin_quote, ExchangeRateService, Freshness, MarkupScheme};

use crate::cli::{QuoteArgs, SchemeSelector};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &QuoteArgs,
    service: &ExchangeRateService,
) -> Result<CommandResult, CliError> {
    if args.buying_price <= 0 {
        return Err(CliError::Command(format!(
            "buying price must be positive, got {}",
            args.buying_price
        )));
    }

    let scheme = match args.scheme {
        SchemeSelector::Current => MarkupScheme::CURRENT,
        SchemeSelector::Legacy => MarkupScheme::LEGACY,
        SchemeSelector::Margin => {
            let quote = margin_quote(args.buying_price).ok_or_else(|| {
                CliError::Command(String::from("buying price is not computable"))
            })?;
            return Ok(CommandResult::ok(serde_json::to_value(quote)?));
        }
    };

    let (rate, rate_warning) = resolve_rate(args.offline, service).await;
    let quote = scheme
        .quote(args.buying_price, rate)
        .ok_or_else(|| CliError::Command(String::from("buying price is not computable")))?;

    let usd_missing = quote.wholesale_usd.is_none();
    let mut result = CommandResult::ok(serde_json::to_value(quote)?);
    if let Some(warning) = rate_warning {
        result = result.with_warning(warning);
    }
    if usd_missing {
        result = result.with_warning("exchange rate unavailable; USD wholesale price omitted");
    }
    Ok(result)
}

async fn resolve_rate(
    offline: bool,
    service: &ExchangeRateService,
) -> (Option<f64>, Option<String>) {
    if offline {
        return match service.stored_rate() {
            Some(snapshot) if !snapshot.is_fresh(super::now_ms()) => (
                Some(snapshot.rate),
                Some(String::from("cached exchange rate is older than 24 hours")),
            ),
            Some(snapshot) => (Some(snapshot.rate), None),
            None => (None, None),
        };
    }

    match service.fetch().await {
        Ok(quote) => {
            let warning = (quote.freshness == Freshness::Stale).then(|| {
                String::from("serving a stale exchange rate; the last refresh failed")
            });
            (Some(quote.rate), warning)
        }
        Err(error) => (None, Some(format!("exchange rate fetch failed: {error}"))),
    }
}
