//! Positional argument grammar for both fetchers.
//!
//! | Binary | Command | Arguments |
//! |--------|---------|-----------|
//! | `coingecko-fetcher` | `historical` | `<coin_id> <vs_currency> <days>` |
//! | `coingecko-fetcher` | `current` | `<coin_id> <vs_currency>` |
//! | `coingecko-fetcher` | `search` | `<query>` |
//! | `coingecko-fetcher` | `list` | |
//! | `yfinance-fetcher` | `historical` | `<symbol> [period=1mo] [interval=1d]` |
//! | `yfinance-fetcher` | `info` | `<symbol>` |
//!
//! Arguments past the declared ones are ignored. Help and version flags are
//! disabled; every parse failure becomes a [`CliError`] so it can be reported
//! as an error document.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{ColorChoice, CommandFactory, Parser, Subcommand};

use crate::error::CliError;

/// Cryptocurrency market data from CoinGecko.
#[derive(Debug, Parser)]
#[command(
    name = "coingecko-fetcher",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true,
    color = ColorChoice::Never
)]
pub struct CryptoCli {
    #[command(subcommand)]
    pub command: CryptoCommand,
}

#[derive(Debug, Subcommand)]
pub enum CryptoCommand {
    /// Price and volume series for the last `days` days.
    #[command(disable_help_flag = true)]
    Historical {
        coin_id: String,
        vs_currency: String,
        days: u32,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _extra: Vec<OsString>,
    },
    /// Current price snapshot with best-effort coin details.
    #[command(disable_help_flag = true)]
    Current {
        coin_id: String,
        vs_currency: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _extra: Vec<OsString>,
    },
    /// Free-text coin search, top 10 matches.
    #[command(disable_help_flag = true)]
    Search {
        #[arg(allow_hyphen_values = true)]
        query: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _extra: Vec<OsString>,
    },
    /// First 100 entries of the supported-coin catalog.
    #[command(disable_help_flag = true)]
    List {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _extra: Vec<OsString>,
    },
}

/// Equity market data from Yahoo Finance.
#[derive(Debug, Parser)]
#[command(
    name = "yfinance-fetcher",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true,
    color = ColorChoice::Never
)]
pub struct EquityCli {
    #[command(subcommand)]
    pub command: EquityCommand,
}

#[derive(Debug, Subcommand)]
pub enum EquityCommand {
    /// OHLCV bars for a range and bar width.
    #[command(disable_help_flag = true)]
    Historical {
        symbol: String,
        #[arg(default_value = "1mo")]
        period: String,
        #[arg(default_value = "1d")]
        interval: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _extra: Vec<OsString>,
    },
    /// Company profile and quote snapshot.
    #[command(disable_help_flag = true)]
    Info {
        symbol: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _extra: Vec<OsString>,
    },
}

pub fn parse_crypto(args: &[OsString]) -> Result<CryptoCommand, CliError> {
    parse::<CryptoCli>(args).map(|cli| cli.command)
}

pub fn parse_equity(args: &[OsString]) -> Result<EquityCommand, CliError> {
    parse::<EquityCli>(args).map(|cli| cli.command)
}

/// `args` includes the program name, as `std::env::args_os` yields it.
fn parse<C: Parser + CommandFactory>(args: &[OsString]) -> Result<C, CliError> {
    let command = args.get(1).ok_or(CliError::InvalidArguments)?;
    let name = command.to_string_lossy().into_owned();
    if C::command().find_subcommand(command).is_none() {
        return Err(CliError::UnknownCommand(name));
    }

    C::try_parse_from(args).map_err(|error| match error.kind() {
        ErrorKind::MissingRequiredArgument => CliError::MissingArguments { command: name },
        _ => CliError::InvalidArgument(summary_line(&error.to_string())),
    })
}

/// First line of a clap diagnostic without its `error: ` prefix.
fn summary_line(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_owned()
}
