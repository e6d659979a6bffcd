//! # Marketfetch CLI
//!
//! Dispatch, rendering, and logging shared by the `coingecko-fetcher` and
//! `yfinance-fetcher` binaries. The binaries only wire the real HTTP client
//! and process environment into [`run_crypto`] / [`run_equity`] and pass the
//! outcome to [`output::emit`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use std::ffi::OsString;
use std::sync::Arc;

use marketfetch_core::{CoinGeckoAdapter, FetcherConfig, HttpClient, YahooAdapter};
use serde_json::Value;

pub use error::CliError;

/// Runs one `coingecko-fetcher` invocation. `args` includes the program name.
///
/// Argument errors are raised before `http_client` is touched.
pub async fn run_crypto<I, T>(
    args: I,
    http_client: Arc<dyn HttpClient>,
    config: &FetcherConfig,
) -> Result<Value, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let command = cli::parse_crypto(&args)?;
    let adapter = CoinGeckoAdapter::new(http_client, config.coingecko.clone());
    commands::crypto::run(command, &adapter).await
}

/// Runs one `yfinance-fetcher` invocation. `args` includes the program name.
pub async fn run_equity<I, T>(
    args: I,
    http_client: Arc<dyn HttpClient>,
    config: &FetcherConfig,
) -> Result<Value, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let command = cli::parse_equity(&args)?;
    let adapter = YahooAdapter::new(http_client, config.yahoo.clone());
    commands::equity::run(command, &adapter).await
}
