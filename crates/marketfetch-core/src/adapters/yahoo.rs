use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::fetch_json;
use crate::config::YahooConfig;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::schema::{Fallback, FieldMapping, LookupContext, Record, Schema, Segment};
use crate::source::{ProviderId, SourceError};
use crate::{EquityHistory, EquityHistoryRequest, MarketTimestamp, OhlcvBar, Symbol};

const PROVIDER: ProviderId = ProviderId::Yahoo;
const REFERER: &str = "https://finance.yahoo.com/";
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData,quoteType,defaultKeyStatistics";

macro_rules! path {
    ($($key:literal),+) => {
        &[$(Segment::Key($key)),+]
    };
}

const EQUITY_INFO: Schema = Schema::new(
    "yahoo.info",
    &[
        FieldMapping {
            field: "shortName",
            sources: &[path!("price", "shortName"), path!("quoteType", "shortName")],
            fallback: Fallback::Text(""),
        },
        FieldMapping {
            field: "longName",
            sources: &[path!("price", "longName"), path!("quoteType", "longName")],
            fallback: Fallback::Text(""),
        },
        FieldMapping {
            field: "currentPrice",
            sources: &[
                path!("financialData", "currentPrice"),
                path!("price", "regularMarketPrice"),
            ],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "regularMarketPrice",
            sources: &[
                path!("price", "regularMarketPrice"),
                path!("financialData", "currentPrice"),
            ],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "previousClose",
            sources: &[
                path!("summaryDetail", "previousClose"),
                path!("price", "regularMarketPreviousClose"),
            ],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "open",
            sources: &[path!("summaryDetail", "open"), path!("price", "regularMarketOpen")],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "dayHigh",
            sources: &[
                path!("summaryDetail", "dayHigh"),
                path!("price", "regularMarketDayHigh"),
            ],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "dayLow",
            sources: &[
                path!("summaryDetail", "dayLow"),
                path!("price", "regularMarketDayLow"),
            ],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "volume",
            sources: &[
                path!("summaryDetail", "volume"),
                path!("price", "regularMarketVolume"),
            ],
            fallback: Fallback::Integer,
        },
        FieldMapping {
            field: "marketCap",
            sources: &[path!("summaryDetail", "marketCap"), path!("price", "marketCap")],
            fallback: Fallback::Integer,
        },
        FieldMapping {
            field: "fiftyTwoWeekHigh",
            sources: &[path!("summaryDetail", "fiftyTwoWeekHigh")],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "fiftyTwoWeekLow",
            sources: &[path!("summaryDetail", "fiftyTwoWeekLow")],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "trailingPE",
            sources: &[path!("summaryDetail", "trailingPE")],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "forwardPE",
            sources: &[
                path!("summaryDetail", "forwardPE"),
                path!("defaultKeyStatistics", "forwardPE"),
            ],
            fallback: Fallback::Float,
        },
        FieldMapping {
            field: "currency",
            sources: &[
                path!("price", "currency"),
                path!("summaryDetail", "currency"),
                path!("financialData", "financialCurrency"),
            ],
            fallback: Fallback::Text("USD"),
        },
        FieldMapping {
            field: "exchange",
            sources: &[path!("price", "exchange"), path!("quoteType", "exchange")],
            fallback: Fallback::Text(""),
        },
    ],
);

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooErrorBody>,
}

#[derive(Debug, Deserialize)]
struct YahooErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooErrorBody {
    fn into_source_error(self) -> SourceError {
        let message = self
            .description
            .filter(|text| !text.is_empty())
            .or(self.code.clone())
            .unwrap_or_else(|| String::from("yahoo reported an unspecified error"));
        match self.code.as_deref() {
            Some("Not Found") => SourceError::not_found(PROVIDER, message),
            _ => SourceError::upstream(PROVIDER, message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
    #[serde(default)]
    adjclose: Option<Vec<ChartAdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance adapter for the chart and quoteSummary endpoints.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    config: YahooConfig,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: YahooConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Split/dividend-adjusted OHLCV bars for the requested range.
    pub async fn history(&self, request: &EquityHistoryRequest) -> Result<EquityHistory, SourceError> {
        let endpoint = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false&events=div%2Csplits",
            self.config.base_url,
            urlencoding::encode(request.symbol.as_str()),
            request.period,
            request.interval
        );

        let payload = fetch_json(
            self.http_client.as_ref(),
            PROVIDER,
            self.request(endpoint),
            error_message,
        )
        .await?;
        let envelope: ChartEnvelope = serde_json::from_value(payload).map_err(|error| {
            SourceError::malformed(PROVIDER, format!("failed to parse yahoo chart: {error}"))
        })?;

        if let Some(error) = envelope.chart.error {
            return Err(error.into_source_error());
        }

        let result = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| {
                SourceError::not_found(PROVIDER, format!("no chart data for {}", request.symbol))
            })?;

        let data = normalize_bars(&result)?;
        debug!(symbol = %request.symbol, bars = data.len(), "normalized chart");

        Ok(EquityHistory {
            symbol: request.symbol.clone(),
            period: request.period,
            interval: request.interval,
            data,
        })
    }

    /// Company profile and quote snapshot from quoteSummary.
    pub async fn info(&self, symbol: &Symbol) -> Result<Record, SourceError> {
        let crumb = self.crumb().await?;
        let endpoint = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            self.config.base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(SUMMARY_MODULES),
            urlencoding::encode(&crumb)
        );

        let payload = fetch_json(
            self.http_client.as_ref(),
            PROVIDER,
            self.request(endpoint),
            error_message,
        )
        .await?;

        if let Some(error) = payload.pointer("/quoteSummary/error").filter(|e| !e.is_null()) {
            let error: YahooErrorBody = serde_json::from_value(error.clone()).map_err(|e| {
                SourceError::malformed(PROVIDER, format!("failed to parse yahoo error: {e}"))
            })?;
            return Err(error.into_source_error());
        }

        let summary = payload.pointer("/quoteSummary/result/0").ok_or_else(|| {
            SourceError::not_found(PROVIDER, format!("no quote summary for {symbol}"))
        })?;

        let mut record = Record::new().with("symbol", symbol.as_str());
        EQUITY_INFO.apply_into(summary, &LookupContext::new(), &mut record);
        Ok(record)
    }

    /// Runs the cookie/crumb handshake quoteSummary requires.
    async fn crumb(&self) -> Result<String, SourceError> {
        // a configured session cookie replaces the fc.yahoo.com visit
        if self.config.auth == HttpAuth::None {
            let request = self.request(self.config.cookie_url.clone());
            // fc.yahoo.com answers 404 while still setting the session cookie
            self.http_client.execute(request).await.map_err(|error| {
                SourceError::unavailable(
                    PROVIDER,
                    format!("failed to fetch Yahoo cookie: {}", error.message()),
                )
            })?;
        }

        let request = self.request(format!("{}/v1/test/getcrumb", self.config.base_url));
        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(
                PROVIDER,
                format!("failed to fetch Yahoo crumb: {}", error.message()),
            )
        })?;

        let body = response.body.trim();
        if response.status == 429 || body.to_ascii_lowercase().contains("too many requests") {
            return Err(SourceError::rate_limited(
                PROVIDER,
                "Yahoo rate limited while fetching crumb",
            ));
        }
        if !response.is_success() {
            return Err(SourceError::from_status(
                PROVIDER,
                response.status,
                format!("failed to fetch Yahoo crumb: status {}", response.status),
            ));
        }
        if body.is_empty()
            || body.len() >= 100
            || body.contains(char::is_whitespace)
            || body.contains('<')
        {
            return Err(SourceError::unavailable(PROVIDER, "Yahoo returned an invalid crumb"));
        }

        debug!("obtained yahoo crumb");
        Ok(body.to_owned())
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_auth(&self.config.auth)
            .with_timeout_ms(self.config.timeout_ms)
    }
}

fn error_message(body: &Value) -> Option<String> {
    [
        "/chart/error/description",
        "/quoteSummary/error/description",
        "/finance/error/description",
    ]
    .iter()
    .find_map(|pointer| body.pointer(pointer).and_then(Value::as_str))
    .filter(|text| !text.is_empty())
    .map(str::to_owned)
}

/// Pairs timestamps with quote rows, dropping rows with no OHLC value at all
/// and rescaling by `adjclose` when the chart carries it.
fn normalize_bars(result: &ChartResult) -> Result<Vec<OhlcvBar>, SourceError> {
    let timestamps = result.timestamp.as_deref().unwrap_or_default();
    let quote = result.indicators.quote.first();
    let adjclose = result
        .indicators
        .adjclose
        .as_ref()
        .and_then(|series| series.first())
        .map(|series| series.adjclose.as_slice());

    let at = |series: Option<&[Option<f64>]>, index: usize| {
        series
            .and_then(|values| values.get(index).copied().flatten())
            .filter(|value| value.is_finite())
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (index, &seconds) in timestamps.iter().enumerate() {
        let open = at(quote.map(|q| q.open.as_slice()), index);
        let high = at(quote.map(|q| q.high.as_slice()), index);
        let low = at(quote.map(|q| q.low.as_slice()), index);
        let close = at(quote.map(|q| q.close.as_slice()), index);
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        let mut open = open.unwrap_or(0.0);
        let mut high = high.unwrap_or(0.0);
        let mut low = low.unwrap_or(0.0);
        let mut close = close.unwrap_or(0.0);
        if let Some(adjusted) = at(adjclose, index) {
            if close != 0.0 {
                let ratio = adjusted / close;
                open *= ratio;
                high *= ratio;
                low *= ratio;
                close = adjusted;
            }
        }

        // `as` saturates; volume is reported as a float
        let volume = at(quote.map(|q| q.volume.as_slice()), index)
            .map(|value| value.trunc() as i64)
            .unwrap_or(0);

        let timestamp = MarketTimestamp::from_unix_seconds(seconds, result.meta.gmtoffset)
            .map_err(|error| SourceError::malformed(PROVIDER, error.to_string()))?;

        bars.push(OhlcvBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(bars)
}
