//! CLI argument definitions for bei.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Derive selling prices from a buying price |
//! | `rate` | Show the current USD→TZS exchange rate |
//! | `margins` | Print the standard margin band table |
//! | `cache` | Inspect or clear the durable rate cache |
//!
//! # Examples
//!
//! ```bash
//! # Full multi-currency quote for a TSh 50,000 cost basis
//! bei quote 50000 --pretty
//!
//! # Selling price under the old margin-table scheme
//! bei quote 50000 --scheme margin
//!
//! # Show the cached rate without touching the network
//! bei rate --offline
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// bei - pricing toolkit for the handbag store back office
///
/// Derives retail and wholesale prices from a buying price, using either the
/// flat-markup multi-currency scheme or the older margin-table scheme, with a
/// 24-hour cached USD exchange rate for export quotes.
#[derive(Debug, Parser)]
#[command(
    name = "bei",
    author,
    version,
    about = "Pricing and exchange-rate CLI for the handbag store"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Key/value listing for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Pricing scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeSelector {
    /// Flat markups +10,000 / +3,000 / +2,000 (canonical).
    Current,
    /// Flat markups +12,000 / +7,000 / +9,000 (earlier generation).
    Legacy,
    /// Single-margin scheme: profit fraction from the band table, rounded
    /// up to the next thousand.
    Margin,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive selling prices from a buying price.
    ///
    /// Under the markup schemes the USD wholesale price needs a live
    /// exchange rate; when none is available the USD figure is omitted and
    /// a warning is attached instead.
    ///
    /// # Examples
    ///
    ///   bei quote 50000
    ///   bei quote 50000 --scheme legacy
    ///   bei quote 50000 --offline
    Quote(QuoteArgs),

    /// Show the current USD→TZS exchange rate.
    ///
    /// Serves the cached rate when it is younger than 24 hours; otherwise
    /// fetches a fresh one and falls back to the stale cache on failure.
    Rate(RateArgs),

    /// Print the standard margin band table.
    Margins,

    /// Rate cache management commands.
    Cache(CacheArgs),
}

/// Arguments for the `quote` command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Buying price in whole TZS.
    pub buying_price: i64,

    /// Pricing scheme to apply.
    #[arg(long, value_enum, default_value_t = SchemeSelector::Current)]
    pub scheme: SchemeSelector,

    /// Use only the cached exchange rate; never touch the network.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

/// Arguments for the `rate` command.
#[derive(Debug, Args)]
pub struct RateArgs {
    /// Use only the cached exchange rate; never touch the network.
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

/// Arguments for the `cache` command group.
#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Cache management subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show the durable cache contents and freshness.
    Show,
    /// Clear the in-memory and durable rate cache.
    Clear,
}
