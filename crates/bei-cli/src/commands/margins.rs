use bei_core::MarginTable;

use crate::error::CliError;

use super::CommandResult;

pub fn run() -> Result<CommandResult, CliError> {
    let table = MarginTable::standard();
    Ok(CommandResult::ok(serde_json::to_value(table.bands())?))
}
