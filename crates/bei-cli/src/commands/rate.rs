use serde_json::json;

use bei_core::{ExchangeRateService, Freshness, RateSnapshot};

use crate::cli::RateArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &RateArgs,
    service: &ExchangeRateService,
) -> Result<CommandResult, CliError> {
    if args.offline {
        let snapshot = service.stored_rate().ok_or_else(|| {
            CliError::Command(String::from(
                "no cached exchange rate; run `bei rate` without --offline first",
            ))
        })?;
        let fresh = snapshot.is_fresh(super::now_ms());
        let freshness = if fresh {
            Freshness::Fresh
        } else {
            Freshness::Stale
        };
        let mut result = CommandResult::ok(json!({
            "rate": snapshot.rate,
            "fetched_at": snapshot.fetched_at_rfc3339(),
            "freshness": freshness,
        }));
        if !fresh {
            result = result.with_warning("cached exchange rate is older than 24 hours");
        }
        return Ok(result);
    }

    let quote = service.fetch().await?;
    let snapshot = RateSnapshot {
        rate: quote.rate,
        fetched_at_ms: quote.fetched_at_ms,
    };
    let mut result = CommandResult::ok(json!({
        "rate": quote.rate,
        "fetched_at": snapshot.fetched_at_rfc3339(),
        "freshness": quote.freshness,
    }));
    if quote.freshness == Freshness::Stale {
        result = result.with_warning("serving a stale exchange rate; the last refresh failed");
    }
    Ok(result)
}
