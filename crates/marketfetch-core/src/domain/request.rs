//! Validated request values, built from positional arguments before any
//! provider call is made.

use std::str::FromStr;

use crate::{BarInterval, CoinId, Period, QuoteCurrency, Symbol, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinHistoryRequest {
    pub coin: CoinId,
    pub currency: QuoteCurrency,
    pub days: u32,
}

impl CoinHistoryRequest {
    pub fn new(coin: &str, currency: &str, days: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            coin: CoinId::parse(coin)?,
            currency: QuoteCurrency::parse(currency)?,
            days,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinQuoteRequest {
    pub coin: CoinId,
    pub currency: QuoteCurrency,
}

impl CoinQuoteRequest {
    pub fn new(coin: &str, currency: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            coin: CoinId::parse(coin)?,
            currency: QuoteCurrency::parse(currency)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSearchRequest {
    pub query: String,
}

impl CoinSearchRequest {
    pub fn new(query: &str) -> Result<Self, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self {
            query: query.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityHistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
    pub interval: BarInterval,
}

impl EquityHistoryRequest {
    pub fn new(symbol: &str, period: &str, interval: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: Symbol::parse(symbol)?,
            period: Period::from_str(period)?,
            interval: BarInterval::from_str(interval)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_request_normalizes_inputs() {
        let request = CoinHistoryRequest::new("bitcoin", "EUR", 7).expect("valid request");
        assert_eq!(request.coin.as_str(), "bitcoin");
        assert_eq!(request.currency.as_str(), "eur");
        assert_eq!(request.days, 7);
    }

    #[test]
    fn search_request_rejects_blank_query() {
        assert_eq!(
            CoinSearchRequest::new("  "),
            Err(ValidationError::EmptyQuery)
        );
    }

    #[test]
    fn equity_request_validates_each_field() {
        assert!(EquityHistoryRequest::new("msft", "6mo", "1wk").is_ok());
        assert!(matches!(
            EquityHistoryRequest::new("msft", "7mo", "1d"),
            Err(ValidationError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            EquityHistoryRequest::new("msft", "1mo", "7m"),
            Err(ValidationError::InvalidInterval { .. })
        ));
    }
}
