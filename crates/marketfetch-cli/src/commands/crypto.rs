use marketfetch_core::{CoinGeckoAdapter, CoinHistoryRequest, CoinQuoteRequest, CoinSearchRequest};
use serde_json::Value;
use tracing::debug;

use crate::cli::CryptoCommand;
use crate::error::CliError;

pub async fn run(command: CryptoCommand, adapter: &CoinGeckoAdapter) -> Result<Value, CliError> {
    match command {
        CryptoCommand::Historical {
            coin_id,
            vs_currency,
            days,
            ..
        } => {
            let request = CoinHistoryRequest::new(&coin_id, &vs_currency, days)?;
            debug!(coin = %request.coin, currency = %request.currency, days, "fetching historical data");
            let history = adapter.historical(&request).await?;
            debug!(points = history.data.len(), "processed market chart");
            Ok(serde_json::to_value(history)?)
        }
        CryptoCommand::Current {
            coin_id,
            vs_currency,
            ..
        } => {
            let request = CoinQuoteRequest::new(&coin_id, &vs_currency)?;
            debug!(coin = %request.coin, currency = %request.currency, "fetching current data");
            Ok(adapter.current(&request).await?.into_value())
        }
        CryptoCommand::Search { query, .. } => {
            let request = CoinSearchRequest::new(&query)?;
            debug!(query = %request.query, "searching coins");
            Ok(serde_json::to_value(adapter.search(&request).await?)?)
        }
        CryptoCommand::List { .. } => {
            debug!("listing coins");
            Ok(serde_json::to_value(adapter.list().await?)?)
        }
    }
}
