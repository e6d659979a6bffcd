use serde::Serialize;

use crate::{BarInterval, CoinId, MarketTimestamp, Period, QuoteCurrency, Symbol};

/// One point of a CoinGecko market chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: MarketTimestamp,
    pub price: f64,
    pub volume: f64,
}

/// Normalized `historical` result for a coin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinHistory {
    pub coin_id: CoinId,
    pub vs_currency: QuoteCurrency,
    pub days: u32,
    pub data: Vec<PricePoint>,
}

/// OHLCV bar; every measurement is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub timestamp: MarketTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Normalized `historical` result for an equity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityHistory {
    pub symbol: Symbol,
    pub period: Period,
    pub interval: BarInterval,
    pub data: Vec<OhlcvBar>,
}
