use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::fetch_json;
use crate::config::CoinGeckoConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::schema::{Fallback, FieldMapping, LookupContext, Record, Schema, Segment};
use crate::source::{ProviderId, SourceError, SourceErrorKind};
use crate::{
    CoinHistory, CoinHistoryRequest, CoinQuoteRequest, CoinSearchRequest, MarketTimestamp,
    PricePoint,
};

/// Maximum number of search matches returned.
pub const SEARCH_LIMIT: usize = 10;
/// Maximum number of catalog entries returned.
pub const CATALOG_LIMIT: usize = 100;

const PROVIDER: ProviderId = ProviderId::CoinGecko;

const CURRENT_SNAPSHOT: Schema = Schema::new(
    "coingecko.current",
    &[
        FieldMapping {
            field: "currentPrice",
            sources: &[&[Segment::Currency]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "marketCap",
            sources: &[&[Segment::CurrencySuffix("_market_cap")]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "volume24h",
            sources: &[&[Segment::CurrencySuffix("_24h_vol")]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "change24h",
            sources: &[&[Segment::CurrencySuffix("_24h_change")]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "lastUpdated",
            sources: &[&[Segment::Key("last_updated_at")]],
            fallback: Fallback::Integer,
        },
    ],
);

const COIN_PROFILE: Schema = Schema::new(
    "coingecko.profile",
    &[
        FieldMapping {
            field: "name",
            sources: &[&[Segment::Key("name")]],
            fallback: Fallback::Text(""),
        },
        FieldMapping {
            field: "symbol",
            sources: &[&[Segment::Key("symbol")]],
            fallback: Fallback::UpperText(""),
        },
        FieldMapping {
            field: "high24h",
            sources: &[&[Segment::Key("market_data"), Segment::Key("high_24h"), Segment::Currency]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "low24h",
            sources: &[&[Segment::Key("market_data"), Segment::Key("low_24h"), Segment::Currency]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "ath",
            sources: &[&[Segment::Key("market_data"), Segment::Key("ath"), Segment::Currency]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "atl",
            sources: &[&[Segment::Key("market_data"), Segment::Key("atl"), Segment::Currency]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "circulatingSupply",
            sources: &[&[Segment::Key("market_data"), Segment::Key("circulating_supply")]],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "totalSupply",
            sources: &[&[Segment::Key("market_data"), Segment::Key("total_supply")]],
            fallback: Fallback::Float,
        },
    ],
);

const SEARCH_ENTRY: Schema = Schema::new(
    "coingecko.search",
    &[
        FieldMapping {
            field: "id",
            sources: &[&[Segment::Key("id")]],
            fallback: Fallback::Text(""),
        },
        FieldMapping {
            field: "name",
            sources: &[&[Segment::Key("name")]],
            fallback: Fallback::Text(""),
        },
        FieldMapping {
            field: "symbol",
            sources: &[&[Segment::Key("symbol")]],
            fallback: Fallback::UpperText(""),
        },
        FieldMapping {
            field: "marketCapRank",
            sources: &[&[Segment::Key("market_cap_rank")]],
            fallback: Fallback::Integer,
        },
    ],
);

const CATALOG_ENTRY: Schema = Schema::new(
    "coingecko.list",
    &[
        FieldMapping {
            field: "id",
            sources: &[&[Segment::Key("id")]],
            fallback: Fallback::Text(""),
        },
        FieldMapping {
            field: "symbol",
            sources: &[&[Segment::Key("symbol")]],
            fallback: Fallback::UpperText(""),
        },
        FieldMapping {
            field: "name",
            sources: &[&[Segment::Key("name")]],
            fallback: Fallback::Text(""),
        },
    ],
);

/// CoinGecko market chart; either series may be missing or `null`.
#[derive(Debug, Deserialize)]
struct MarketChartPayload {
    #[serde(default)]
    prices: Option<Vec<ChartSample>>,
    #[serde(default)]
    total_volumes: Option<Vec<ChartSample>>,
}

/// `[epoch_ms, value]` pair.
#[derive(Debug, Clone, Copy, Deserialize)]
struct ChartSample(f64, Option<f64>);

/// CoinGecko v3 adapter.
#[derive(Clone)]
pub struct CoinGeckoAdapter {
    http_client: Arc<dyn HttpClient>,
    config: CoinGeckoConfig,
}

impl CoinGeckoAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: CoinGeckoConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Price and volume series over the last `days` days.
    pub async fn historical(&self, request: &CoinHistoryRequest) -> Result<CoinHistory, SourceError> {
        let endpoint = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}",
            self.config.base_url,
            urlencoding::encode(request.coin.as_str()),
            urlencoding::encode(request.currency.as_str()),
            request.days
        );

        let payload = self.get(endpoint).await?;
        let chart: MarketChartPayload = serde_json::from_value(payload).map_err(|error| {
            SourceError::malformed(PROVIDER, format!("failed to parse coingecko market chart: {error}"))
        })?;

        let prices = chart.prices.unwrap_or_default();
        let volumes = chart.total_volumes.unwrap_or_default();
        debug!(
            coin = %request.coin,
            prices = prices.len(),
            volumes = volumes.len(),
            "normalizing market chart"
        );

        let data = prices
            .iter()
            .enumerate()
            .map(|(index, sample)| -> Result<PricePoint, SourceError> {
                let timestamp = MarketTimestamp::from_unix_millis(sample.0)
                    .map_err(|error| SourceError::malformed(PROVIDER, error.to_string()))?;
                Ok(PricePoint {
                    timestamp,
                    price: finite_or_zero(sample.1),
                    // volume series shorter than the price series pads with zero
                    volume: finite_or_zero(volumes.get(index).and_then(|volume| volume.1)),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CoinHistory {
            coin_id: request.coin.clone(),
            vs_currency: request.currency.clone(),
            days: request.days,
            data,
        })
    }

    /// Current quote, enriched with the coin profile when that lookup succeeds.
    pub async fn current(&self, request: &CoinQuoteRequest) -> Result<Record, SourceError> {
        let endpoint = format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_market_cap=true&include_24hr_vol=true&include_24hr_change=true&include_last_updated_at=true",
            self.config.base_url,
            urlencoding::encode(request.coin.as_str()),
            urlencoding::encode(request.currency.as_str()),
        );

        let payload = self.get(endpoint).await?;
        let quote = payload.get(request.coin.as_str()).unwrap_or(&Value::Null);
        let context = LookupContext::with_currency(request.currency.as_str());

        let mut record = Record::new()
            .with("coinId", request.coin.as_str())
            .with("vsCurrency", request.currency.as_str());
        CURRENT_SNAPSHOT.apply_into(quote, &context, &mut record);

        if let Some(profile) = self.profile(request).await {
            record.merge(profile);
        }
        Ok(record)
    }

    /// Best-effort coin detail lookup. Any failure yields `None`.
    async fn profile(&self, request: &CoinQuoteRequest) -> Option<Record> {
        let endpoint = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false",
            self.config.base_url,
            urlencoding::encode(request.coin.as_str()),
        );

        match self.get(endpoint).await {
            Ok(payload) => Some(COIN_PROFILE.apply(
                &payload,
                &LookupContext::with_currency(request.currency.as_str()),
            )),
            Err(error) if error.kind() == SourceErrorKind::NotFound => {
                debug!(coin = %request.coin, %error, "coin profile not found; skipping enrichment");
                None
            }
            Err(error) => {
                warn!(coin = %request.coin, provider = %error.provider(), %error, "coin profile lookup failed; skipping enrichment");
                None
            }
        }
    }

    /// Coins matching a free-text query, in provider order.
    pub async fn search(&self, request: &CoinSearchRequest) -> Result<Vec<Record>, SourceError> {
        let endpoint = format!(
            "{}/search?query={}",
            self.config.base_url,
            urlencoding::encode(&request.query)
        );

        let payload = self.get(endpoint).await?;
        match payload.get("coins") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(coins)) => {
                Ok(SEARCH_ENTRY.apply_list(coins, SEARCH_LIMIT, &LookupContext::new()))
            }
            Some(_) => Err(SourceError::malformed(
                PROVIDER,
                "coingecko search response has a non-array 'coins' field",
            )),
        }
    }

    /// Head of the supported-coin catalog.
    pub async fn list(&self) -> Result<Vec<Record>, SourceError> {
        let endpoint = format!("{}/coins/list", self.config.base_url);

        let payload = self.get(endpoint).await?;
        let coins = payload.as_array().ok_or_else(|| {
            SourceError::malformed(PROVIDER, "coingecko coin list response is not an array")
        })?;
        Ok(CATALOG_ENTRY.apply_list(coins, CATALOG_LIMIT, &LookupContext::new()))
    }

    async fn get(&self, endpoint: String) -> Result<Value, SourceError> {
        let request = HttpRequest::get(endpoint)
            .with_header("accept", "application/json")
            .with_auth(&self.config.auth)
            .with_timeout_ms(self.config.timeout_ms);

        let payload = fetch_json(self.http_client.as_ref(), PROVIDER, request, error_message).await?;

        // CoinGecko occasionally reports failures inside a 200 body
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            return Err(SourceError::upstream(PROVIDER, message));
        }
        Ok(payload)
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/status/error_message").and_then(Value::as_str))
        .or_else(|| body.pointer("/error/status/error_message").and_then(Value::as_str))
        .map(str::to_owned)
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
