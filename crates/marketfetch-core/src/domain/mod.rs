//! # Domain Models
//!
//! Validated request values and the typed series results.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CoinId`] | CoinGecko coin identifier |
//! | [`QuoteCurrency`] | Lowercase vs-currency code |
//! | [`Symbol`] | Normalized equity ticker |
//! | [`Period`] / [`BarInterval`] | Yahoo chart range and bar width |
//! | [`MarketTimestamp`] | RFC 3339 timestamp |
//! | [`CoinHistory`] / [`PricePoint`] | Crypto price/volume series |
//! | [`EquityHistory`] / [`OhlcvBar`] | Equity OHLCV series |
//!
//! Snapshot-style results (crypto `current`, equity `info`, search and
//! catalog entries) are built by the schema tables in [`crate::schema`]
//! rather than fixed structs.

mod coin;
mod models;
mod period;
mod request;
mod symbol;
mod timestamp;

pub use coin::{CoinId, QuoteCurrency};
pub use models::{CoinHistory, EquityHistory, OhlcvBar, PricePoint};
pub use period::{BarInterval, Period};
pub use request::{CoinHistoryRequest, CoinQuoteRequest, CoinSearchRequest, EquityHistoryRequest};
pub use symbol::Symbol;
pub use timestamp::MarketTimestamp;
