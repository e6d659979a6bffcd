//! Provider identifiers and the structured error every provider call returns.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream market-data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    CoinGecko,
    Yahoo,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoinGecko => "coingecko",
            Self::Yahoo => "yahoo",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-call failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The request never produced a response (DNS, connect, timeout).
    Unavailable,
    /// The provider does not know the requested identifier.
    NotFound,
    RateLimited,
    /// Any other non-success status or provider-reported error.
    Upstream,
    /// The response body could not be decoded into the expected shape.
    Malformed,
}

/// Structured provider error. The message is surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    provider: ProviderId,
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(provider: ProviderId, kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::Unavailable, message)
    }

    pub fn not_found(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::NotFound, message)
    }

    pub fn rate_limited(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::RateLimited, message)
    }

    pub fn upstream(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::Upstream, message)
    }

    pub fn malformed(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::Malformed, message)
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(provider: ProviderId, status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            404 => SourceErrorKind::NotFound,
            429 => SourceErrorKind::RateLimited,
            _ => SourceErrorKind::Upstream,
        };
        Self::new(provider, kind, message)
    }

    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        let missing = SourceError::from_status(ProviderId::CoinGecko, 404, "coin not found");
        assert_eq!(missing.kind(), SourceErrorKind::NotFound);

        let limited = SourceError::from_status(ProviderId::Yahoo, 429, "too many requests");
        assert_eq!(limited.kind(), SourceErrorKind::RateLimited);

        let other = SourceError::from_status(ProviderId::Yahoo, 503, "service unavailable");
        assert_eq!(other.kind(), SourceErrorKind::Upstream);
    }

    #[test]
    fn display_is_the_bare_message() {
        let error = SourceError::not_found(ProviderId::CoinGecko, "coin not found");
        assert_eq!(error.to_string(), "coin not found");
        assert_eq!(error.provider(), ProviderId::CoinGecko);
    }
}
