use marketfetch_core::FetcherConfig;
use tracing_subscriber::EnvFilter;

/// Directive used when `DEBUG=true`; dependency crates stay at `warn`.
const DEBUG_DIRECTIVE: &str = "warn,marketfetch_core=debug,marketfetch_cli=debug";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs a stderr `fmt` subscriber. Stdout is reserved for the result
/// document.
pub fn init(config: &FetcherConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    // a subscriber may already be installed (tests)
    let _ = subscriber.try_init();
}

fn filter(config: &FetcherConfig) -> EnvFilter {
    config
        .log_filter
        .as_deref()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(if config.debug {
                DEBUG_DIRECTIVE
            } else {
                DEFAULT_DIRECTIVE
            })
        })
}
