use marketfetch_core::{EquityHistoryRequest, Symbol, YahooAdapter};
use serde_json::Value;
use tracing::debug;

use crate::cli::EquityCommand;
use crate::error::CliError;

pub async fn run(command: EquityCommand, adapter: &YahooAdapter) -> Result<Value, CliError> {
    match command {
        EquityCommand::Historical {
            symbol,
            period,
            interval,
            ..
        } => {
            let request = EquityHistoryRequest::new(&symbol, &period, &interval)?;
            debug!(
                symbol = %request.symbol,
                period = %request.period,
                interval = %request.interval,
                "fetching historical data"
            );
            let history = adapter.history(&request).await?;
            debug!(bars = history.data.len(), "processed chart");
            Ok(serde_json::to_value(history)?)
        }
        EquityCommand::Info { symbol, .. } => {
            let symbol = Symbol::parse(&symbol)?;
            debug!(%symbol, "fetching stock info");
            let record = adapter.info(&symbol).await?;
            debug!(fields = record.fields().count(), "retrieved stock info");
            Ok(record.into_value())
        }
    }
}
