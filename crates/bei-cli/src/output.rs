use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let mut envelope = json!({ "data": result.data });
            if !result.warnings.is_empty() {
                envelope["warnings"] = json!(result.warnings);
            }
            let payload = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(result)?,
    }

    Ok(())
}

fn render_table(result: &CommandResult) -> Result<(), CliError> {
    if !result.warnings.is_empty() {
        println!("warnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }

    println!("data:");
    let pretty_data = serde_json::to_string_pretty(&result.data)?;
    for line in pretty_data.lines() {
        println!("  {line}");
    }

    Ok(())
}
