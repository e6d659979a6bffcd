//! # Marketfetch Core
//!
//! Provider adapters, domain types, and response normalization for the
//! `coingecko-fetcher` and `yfinance-fetcher` command-line tools.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | CoinGecko and Yahoo Finance adapters |
//! | [`config`] | Environment-driven settings |
//! | [`domain`] | Validated request values and series models |
//! | [`error`] | Argument validation errors |
//! | [`http_client`] | HTTP transport abstraction and test fixture client |
//! | [`schema`] | Declarative field mapping with per-field fallbacks |
//! | [`source`] | Provider identifiers and structured provider errors |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Validated        │
//! │ Request          │
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Provider Adapter │────▶│ HTTP Client      │
//! │ (CoinGecko/Yahoo)│     │ (reqwest/fixture)│
//! └────────┬─────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Schema tables /  │
//! │ series models    │
//! └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketfetch_core::{CoinGeckoAdapter, CoinQuoteRequest, FetcherConfig, ReqwestHttpClient};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FetcherConfig::from_env();
//!     let adapter = CoinGeckoAdapter::new(Arc::new(ReqwestHttpClient::new()), config.coingecko);
//!
//!     let request = CoinQuoteRequest::new("bitcoin", "usd")?;
//!     let record = adapter.current(&request).await?;
//!     println!("{}", serde_json::to_string(&record)?);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod schema;
pub mod source;

pub use adapters::{CoinGeckoAdapter, YahooAdapter, CATALOG_LIMIT, SEARCH_LIMIT};
pub use config::{CoinGeckoConfig, FetcherConfig, YahooConfig};
pub use domain::*;
pub use error::ValidationError;
pub use http_client::{
    FixtureHttpClient, HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};
pub use schema::{Fallback, FieldMapping, LookupContext, Record, Schema, Segment};
pub use source::{ProviderId, SourceError, SourceErrorKind};
