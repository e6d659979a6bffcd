//! Behavior tests for `coingecko-fetcher` invocations.
//!
//! Every test drives the same entry point the binary uses, with a scripted
//! transport standing in for CoinGecko so call counts can be asserted.

use std::sync::Arc;

use marketfetch_cli::{output, run_crypto, CliError};
use marketfetch_core::{FetcherConfig, FixtureHttpClient, HttpResponse};
use serde_json::{json, Value};

fn argv(values: &[&str]) -> Vec<String> {
    std::iter::once("coingecko-fetcher")
        .chain(values.iter().copied())
        .map(str::to_owned)
        .collect()
}

async fn invoke(client: &Arc<FixtureHttpClient>, values: &[&str]) -> (u8, String, String) {
    let result = run_crypto(argv(values), client.clone(), &FetcherConfig::default()).await;
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let code = output::emit(result, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("stdout is utf8"),
        String::from_utf8(stderr).expect("stderr is utf8"),
    )
}

fn error_of(stderr: &str) -> String {
    let document: Value = serde_json::from_str(stderr).expect("stderr holds one JSON document");
    document["error"].as_str().expect("error field").to_owned()
}

// =============================================================================
// Argument handling
// =============================================================================

#[tokio::test]
async fn missing_arguments_fail_without_calling_the_provider() {
    // Given: A transport that would answer anything
    let client = Arc::new(FixtureHttpClient::new().with_json("/", "{}"));

    // When: Each command is invoked with too few arguments
    let cases = [
        (vec!["historical", "bitcoin", "usd"], "Missing arguments for historical command"),
        (vec!["current", "bitcoin"], "Missing arguments for current command"),
        (vec!["search"], "Missing query for search command"),
    ];

    for (args, expected) in cases {
        let (code, stdout, stderr) = invoke(&client, &args).await;

        // Then: Exit code 1, the error document on stderr, nothing on stdout
        assert_eq!(code, 1, "args: {args:?}");
        assert!(stdout.is_empty());
        assert_eq!(error_of(&stderr), expected);
    }

    // And: No request ever reached the provider
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn no_command_and_unknown_command_are_rejected_up_front() {
    // Given: A transport that would answer anything
    let client = Arc::new(FixtureHttpClient::new().with_json("/", "{}"));

    // When: The fetcher is run bare, then with an unknown operation
    let (bare_code, _, bare_stderr) = invoke(&client, &[]).await;
    let (unknown_code, _, unknown_stderr) = invoke(&client, &["price", "bitcoin"]).await;

    // Then: Both fail with the documented messages and no calls
    assert_eq!(bare_code, 1);
    assert_eq!(error_of(&bare_stderr), "Invalid arguments");
    assert_eq!(unknown_code, 1);
    assert_eq!(error_of(&unknown_stderr), "Unknown command: price");
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn malformed_argument_values_fail_before_any_call() {
    let client = Arc::new(FixtureHttpClient::new().with_json("/", "{}"));

    let (days_code, _, days_stderr) = invoke(&client, &["historical", "bitcoin", "usd", "ten"]).await;
    let (coin_code, _, coin_stderr) = invoke(&client, &["current", " ", "usd"]).await;

    assert_eq!(days_code, 1);
    assert!(error_of(&days_stderr).contains("ten"));
    assert_eq!(coin_code, 1);
    assert_eq!(error_of(&coin_stderr), "coin id cannot be empty");
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn arguments_past_the_declared_ones_are_ignored() {
    // Given: A catalog with a single coin
    let client = Arc::new(
        FixtureHttpClient::new().with_json("/coins/list", r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin"}]"#),
    );

    // When: The list command is given a trailing argument it does not declare
    let (code, stdout, stderr) = invoke(&client, &["list", "extra"]).await;

    // Then: The extra argument is ignored and the catalog is printed
    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "[{\"id\":\"bitcoin\",\"symbol\":\"BTC\",\"name\":\"Bitcoin\"}]\n");
    assert_eq!(client.request_count(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn non_utf8_argument_is_reported_as_an_error_document() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let client = Arc::new(FixtureHttpClient::new().with_json("/", "{}"));
    let argv = vec![
        OsString::from("coingecko-fetcher"),
        OsString::from("search"),
        OsString::from_vec(b"bit\xffcoin".to_vec()),
    ];

    let result = run_crypto(argv, client.clone(), &FetcherConfig::default()).await;
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let code = output::emit(result, &mut stdout, &mut stderr);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    let stderr = String::from_utf8(stderr).expect("stderr is utf8");
    assert!(!error_of(&stderr).is_empty());
    assert_eq!(client.request_count(), 0);
}

// =============================================================================
// historical
// =============================================================================

#[tokio::test]
async fn historical_pairs_prices_with_volumes_and_pads_missing_ones() {
    // Given: A chart with three prices but only two volumes
    let client = Arc::new(FixtureHttpClient::new().with_json(
        "/coins/ethereum/market_chart",
        json!({
            "prices": [[1_704_067_200_000_i64, 2_281.5], [1_704_153_600_000_i64, 2_352.0], [1_704_240_000_000_i64, 2_210.75]],
            "market_caps": [],
            "total_volumes": [[1_704_067_200_000_i64, 5.1e9], [1_704_153_600_000_i64, 7.4e9]],
        })
        .to_string(),
    ));

    // When: The user asks for three days of history in EUR spelled upper case
    let (code, stdout, stderr) = invoke(&client, &["historical", "ethereum", "EUR", "3"]).await;

    // Then: One point per price, volume padded with zero, currency echoed lowercase
    assert_eq!(code, 0, "stderr: {stderr}");
    let document: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(document["coinId"], "ethereum");
    assert_eq!(document["vsCurrency"], "eur");
    assert_eq!(document["days"], 3);

    let data = document["data"].as_array().expect("data array");
    assert_eq!(data.len(), 3);
    assert_eq!(
        data[0],
        json!({ "timestamp": "2024-01-01T00:00:00Z", "price": 2_281.5, "volume": 5.1e9 })
    );
    assert_eq!(data[2]["volume"], 0.0);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn unknown_coin_surfaces_the_provider_message() {
    // Given: CoinGecko rejects the coin id
    let client = Arc::new(FixtureHttpClient::new().with_response(
        "/market_chart",
        HttpResponse::with_status(404, r#"{"error":"coin not found"}"#),
    ));

    // When: History is requested for it
    let (code, stdout, stderr) = invoke(&client, &["historical", "notacoin", "usd", "7"]).await;

    // Then: The provider's text is reported verbatim
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr, "{\"error\":\"coin not found\"}\n");
}

// =============================================================================
// current
// =============================================================================

#[tokio::test]
async fn current_keeps_core_fields_when_enrichment_fails() {
    // Given: A price snapshot, and a detail endpoint that is down
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json(
                "/simple/price",
                json!({ "solana": {
                    "usd": 101.2,
                    "usd_market_cap": 4.4e10,
                    "usd_24h_vol": 2.2e9,
                    "usd_24h_change": 3.5,
                    "last_updated_at": 1_704_067_200,
                }})
                .to_string(),
            )
            .with_transport_error("/coins/solana", "connection reset by peer"),
    );

    // When: The current snapshot is requested
    let (code, stdout, _) = invoke(&client, &["current", "solana", "usd"]).await;

    // Then: The run still succeeds with exactly the core fields, in order
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "{\"coinId\":\"solana\",\"vsCurrency\":\"usd\",\"currentPrice\":101.2,\"marketCap\":44000000000.0,\"volume24h\":2200000000.0,\"change24h\":3.5,\"lastUpdated\":1704067200}\n"
    );

    // And: Both the primary and the enrichment call were attempted
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn current_for_unknown_coin_emits_fallback_values() {
    // Given: CoinGecko has no price entry and no profile for the coin
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/simple/price", "{}")
            .with_response(
                "/coins/notacoin",
                HttpResponse::with_status(404, r#"{"error":"coin not found"}"#),
            ),
    );

    // When: The current snapshot is requested
    let (code, stdout, stderr) = invoke(&client, &["current", "notacoin", "usd"]).await;

    // Then: Every core field is present at its fallback and the run succeeds
    assert_eq!(code, 0);
    assert!(stderr.is_empty());
    assert_eq!(
        stdout,
        "{\"coinId\":\"notacoin\",\"vsCurrency\":\"usd\",\"currentPrice\":0.0,\"marketCap\":0.0,\"volume24h\":0.0,\"change24h\":0.0,\"lastUpdated\":0}\n"
    );
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn current_merges_details_when_available() {
    let client = Arc::new(
        FixtureHttpClient::new()
            .with_json("/simple/price", r#"{"bitcoin":{"usd":42000}}"#)
            .with_json(
                "/coins/bitcoin",
                json!({
                    "name": "Bitcoin",
                    "symbol": "btc",
                    "market_data": {
                        "high_24h": { "usd": 42_500 },
                        "ath": { "usd": 69_045 },
                        "circulating_supply": 19_580_000.0,
                        "total_supply": null,
                    },
                })
                .to_string(),
            ),
    );

    let (code, stdout, _) = invoke(&client, &["current", "bitcoin", "usd"]).await;

    assert_eq!(code, 0);
    let document: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(document["name"], "Bitcoin");
    assert_eq!(document["symbol"], "BTC");
    assert_eq!(document["high24h"], 42_500.0);
    assert_eq!(document["low24h"], 0.0);
    assert_eq!(document["totalSupply"], 0.0);
    assert_eq!(document["marketCap"], 0.0);
    assert_eq!(document.as_object().map(|o| o.len()), Some(15));
}

// =============================================================================
// search / list
// =============================================================================

#[tokio::test]
async fn search_returns_at_most_ten_matches_in_provider_order() {
    // Given: Twelve matches
    let coins: Vec<Value> = (1..=12)
        .map(|rank| json!({ "id": format!("wrapped-{rank}"), "name": "Wrapped", "symbol": "wbtc", "market_cap_rank": rank }))
        .collect();
    let client = Arc::new(FixtureHttpClient::new().with_json("/search?query=wrapped%20bitcoin", json!({ "coins": coins }).to_string()));

    // When: A multi-word query is searched
    let (code, stdout, _) = invoke(&client, &["search", "wrapped bitcoin"]).await;

    // Then: Ten entries come back, first to tenth
    assert_eq!(code, 0);
    let entries: Vec<Value> = serde_json::from_str(&stdout).expect("json array");
    assert_eq!(entries.len(), 10);
    assert_eq!(
        entries[0],
        json!({ "id": "wrapped-1", "name": "Wrapped", "symbol": "WBTC", "marketCapRank": 1 })
    );
    assert_eq!(entries[9]["id"], "wrapped-10");
}

#[tokio::test]
async fn list_returns_the_first_hundred_coins() {
    let coins: Vec<Value> = (0..250)
        .map(|index| json!({ "id": format!("coin-{index}"), "symbol": format!("c{index}"), "name": format!("Coin {index}") }))
        .collect();
    let client = Arc::new(FixtureHttpClient::new().with_json("/coins/list", Value::Array(coins).to_string()));

    let (code, stdout, _) = invoke(&client, &["list"]).await;

    assert_eq!(code, 0);
    let entries: Vec<Value> = serde_json::from_str(&stdout).expect("json array");
    assert_eq!(entries.len(), 100);
    assert_eq!(entries[99], json!({ "id": "coin-99", "symbol": "C99", "name": "Coin 99" }));
}

#[tokio::test]
async fn provider_failures_are_reported_as_errors() {
    let client = Arc::new(FixtureHttpClient::new().with_transport_error("/coins/list", "dns error"));

    let result = run_crypto(argv(&["list"]), client.clone(), &FetcherConfig::default()).await;

    assert!(matches!(result, Err(CliError::Source(_))));
}
