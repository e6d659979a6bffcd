use std::process::ExitCode;
use std::sync::Arc;

use marketfetch_cli::{logging, output, run_equity};
use marketfetch_core::{FetcherConfig, ReqwestHttpClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = FetcherConfig::from_env();
    logging::init(&config);

    let result = run_equity(
        std::env::args_os(),
        Arc::new(ReqwestHttpClient::new()),
        &config,
    )
    .await;

    let code = output::emit(result, &mut std::io::stdout().lock(), &mut std::io::stderr().lock());
    ExitCode::from(code)
}
