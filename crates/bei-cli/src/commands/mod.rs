mod cache;
mod margins;
mod quote;
mod rate;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use bei_core::{ExchangeRateService, FileRateStore, HttpClient, NoopHttpClient, ReqwestHttpClient};

use crate::cli::{CacheCommand, Cli, Command};
use crate::error::CliError;

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let store = FileRateStore::new(FileRateStore::default_path());

    match &cli.command {
        Command::Quote(args) => {
            let service = rate_service(store, args.offline);
            quote::run(args, &service).await
        }
        Command::Rate(args) => {
            let service = rate_service(store, args.offline);
            rate::run(args, &service).await
        }
        Command::Margins => margins::run(),
        Command::Cache(args) => {
            let path = store.path().to_path_buf();
            // Cache commands never need the network.
            let service = rate_service(store, true);
            match args.command {
                CacheCommand::Show => cache::show(&service, &path),
                CacheCommand::Clear => cache::clear(&service, &path).await,
            }
        }
    }
}

fn rate_service(store: FileRateStore, offline: bool) -> ExchangeRateService {
    let http: Arc<dyn HttpClient> = if offline {
        Arc::new(NoopHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    };
    ExchangeRateService::new(Arc::new(store), http)
}

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
