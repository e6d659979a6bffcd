use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::ValidationError;

/// CoinGecko coin identifier (`bitcoin`, `wrapped-steth`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct CoinId(String);

impl CoinId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCoinId);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::CoinIdWhitespace {
                value: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CoinId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CoinId> for String {
    fn from(value: CoinId) -> Self {
        value.0
    }
}

/// Quote ("vs") currency code, lowercased because CoinGecko keys its
/// responses by the lowercase code (`usd`, `usd_market_cap`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct QuoteCurrency(String);

impl QuoteCurrency {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }
        if !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidCurrency {
                value: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuoteCurrency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QuoteCurrency> for String {
    fn from(value: QuoteCurrency) -> Self {
        value.0
    }
}
