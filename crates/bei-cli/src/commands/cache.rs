use std::path::Path;

use serde_json::json;

use bei_core::ExchangeRateService;

use crate::error::CliError;

use super::CommandResult;

pub fn show(service: &ExchangeRateService, path: &Path) -> Result<CommandResult, CliError> {
    let data = match service.stored_rate() {
        Some(snapshot) => json!({
            "path": path.display().to_string(),
            "cached": true,
            "rate": snapshot.rate,
            "fetched_at": snapshot.fetched_at_rfc3339(),
            "fresh": snapshot.is_fresh(super::now_ms()),
        }),
        None => json!({
            "path": path.display().to_string(),
            "cached": false,
        }),
    };
    Ok(CommandResult::ok(data))
}

pub async fn clear(service: &ExchangeRateService, path: &Path) -> Result<CommandResult, CliError> {
    service.clear_cache().await;
    Ok(CommandResult::ok(json!({
        "path": path.display().to_string(),
        "cleared": true,
    })))
}
