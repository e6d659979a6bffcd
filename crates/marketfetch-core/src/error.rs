use thiserror::Error;

/// Validation errors raised while building requests from positional arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("coin id cannot be empty")]
    EmptyCoinId,
    #[error("coin id contains whitespace: '{value}'")]
    CoinIdWhitespace { value: String },
    #[error("vs currency cannot be empty")]
    EmptyCurrency,
    #[error("vs currency must be ASCII alphanumeric: '{value}'")]
    InvalidCurrency { value: String },
    #[error("search query cannot be empty")]
    EmptyQuery,

    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error(
        "invalid period '{value}', expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max"
    )]
    InvalidPeriod { value: String },
    #[error(
        "invalid interval '{value}', expected one of 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo"
    )]
    InvalidInterval { value: String },

    #[error("timestamp {value} is outside the representable range")]
    TimestampOutOfRange { value: i128 },
    #[error("utc offset of {seconds} seconds is not a whole number of minutes")]
    InvalidUtcOffset { seconds: i64 },
}
