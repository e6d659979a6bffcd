//! Environment-driven configuration.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `DEBUG` | `true` enables debug-level diagnostics |
//! | `MARKETFETCH_LOG` | tracing filter directive, overrides `DEBUG` |
//! | `COINGECKO_API_KEY` | demo key sent as `x-cg-demo-api-key` |
//! | `COINGECKO_PRO_API_KEY` | pro key sent as `x-cg-pro-api-key`; selects the pro host |
//! | `COINGECKO_BASE_URL` | overrides the CoinGecko API root |
//! | `YAHOO_BASE_URL` | overrides the Yahoo query host |
//! | `YAHOO_COOKIE` | pre-established Yahoo session cookie |

use crate::http_client::HttpAuth;

pub const COINGECKO_PUBLIC_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const COINGECKO_PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";
pub const YAHOO_QUERY_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

/// CoinGecko client default, matching the upstream Python client's 120 s.
const COINGECKO_TIMEOUT_MS: u64 = 120_000;
const YAHOO_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub auth: HttpAuth,
    pub timeout_ms: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(COINGECKO_PUBLIC_BASE_URL),
            auth: HttpAuth::None,
            timeout_ms: COINGECKO_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YahooConfig {
    pub base_url: String,
    pub cookie_url: String,
    pub auth: HttpAuth,
    pub timeout_ms: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(YAHOO_QUERY_BASE_URL),
            cookie_url: String::from(YAHOO_COOKIE_URL),
            auth: HttpAuth::None,
            timeout_ms: YAHOO_TIMEOUT_MS,
        }
    }
}

/// Process-wide settings resolved once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherConfig {
    pub debug: bool,
    pub log_filter: Option<String>,
    pub coingecko: CoinGeckoConfig,
    pub yahoo: YahooConfig,
}

impl FetcherConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let debug = get("DEBUG").is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let mut coingecko = CoinGeckoConfig::default();
        if let Some(key) = get("COINGECKO_PRO_API_KEY") {
            coingecko.base_url = String::from(COINGECKO_PRO_BASE_URL);
            coingecko.auth = HttpAuth::Header {
                name: String::from("x-cg-pro-api-key"),
                value: key,
            };
        } else if let Some(key) = get("COINGECKO_API_KEY") {
            coingecko.auth = HttpAuth::Header {
                name: String::from("x-cg-demo-api-key"),
                value: key,
            };
        }
        if let Some(base_url) = get("COINGECKO_BASE_URL") {
            coingecko.base_url = base_url.trim_end_matches('/').to_owned();
        }

        let mut yahoo = YahooConfig::default();
        if let Some(base_url) = get("YAHOO_BASE_URL") {
            yahoo.base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Some(cookie) = get("YAHOO_COOKIE") {
            yahoo.auth = HttpAuth::Cookie(cookie);
        }

        Self {
            debug,
            log_filter: get("MARKETFETCH_LOG"),
            coingecko,
            yahoo,
        }
    }
}
