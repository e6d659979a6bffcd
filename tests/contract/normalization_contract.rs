//! Output-contract tests shared by both fetchers: fixed field sets, fallback
//! values, coercion of loosely typed inputs, and byte-stable rendering.

use std::sync::Arc;

use marketfetch_cli::{output, run_crypto, run_equity};
use marketfetch_core::{
    FetcherConfig, FixtureHttpClient, HttpResponse, LookupContext, Schema, YahooConfig,
};
use serde_json::{json, Value};

async fn render_crypto(client: Arc<FixtureHttpClient>, args: &[&str]) -> Vec<u8> {
    let argv: Vec<String> = std::iter::once("coingecko-fetcher")
        .chain(args.iter().copied())
        .map(str::to_owned)
        .collect();
    let result = run_crypto(argv, client, &FetcherConfig::default()).await;
    let mut stdout = Vec::new();
    let code = output::emit(result, &mut stdout, &mut std::io::sink());
    assert_eq!(code, 0);
    stdout
}

fn price_fixture() -> FixtureHttpClient {
    FixtureHttpClient::new()
        .with_json(
            "/simple/price",
            r#"{"cardano":{"gbp":"0.45","gbp_market_cap":1.58e10,"gbp_24h_vol":null,"gbp_24h_change":-2.75,"last_updated_at":1704067200.9}}"#,
        )
        .with_json(
            "/coins/cardano",
            r#"{"name":"Cardano","symbol":"ada","market_data":{"high_24h":{"gbp":0.47},"circulating_supply":"35000000000"}}"#,
        )
}

#[tokio::test]
async fn fixed_fixture_renders_byte_identical_output() {
    // Given: The same provider responses served twice
    // When: The same invocation runs twice
    let first = render_crypto(Arc::new(price_fixture()), &["current", "cardano", "GBP"]).await;
    let second = render_crypto(Arc::new(price_fixture()), &["current", "cardano", "GBP"]).await;

    // Then: The bytes match exactly
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn loosely_typed_inputs_are_coerced_to_the_declared_types() {
    // Given: Numeric strings, a null volume, and a fractional timestamp
    let stdout = render_crypto(Arc::new(price_fixture()), &["current", "cardano", "gbp"]).await;

    // When: The output is decoded
    let document: Value = serde_json::from_slice(&stdout).expect("json");

    // Then: Each field carries its declared type or its fallback
    assert_eq!(document["currentPrice"], 0.45);
    assert_eq!(document["volume24h"], 0.0);
    assert_eq!(document["lastUpdated"], 1_704_067_200);
    assert_eq!(document["circulatingSupply"], 3.5e10);
    assert_eq!(document["symbol"], "ADA");
    assert_eq!(document["totalSupply"], 0.0);
}

#[tokio::test]
async fn no_normalized_output_contains_null() {
    // Given: Provider payloads that are null almost everywhere
    let crypto = Arc::new(
        FixtureHttpClient::new()
            .with_json("/simple/price", r#"{"bitcoin":null}"#)
            .with_json("/coins/bitcoin", r#"{"name":null,"market_data":null}"#)
            .with_json("/search", r#"{"coins":[{"id":null,"market_cap_rank":null}]}"#)
            .with_json("/coins/list", r#"[{}]"#),
    );
    let equity = Arc::new(
        FixtureHttpClient::new()
            .with_response("session.test", HttpResponse::with_status(404, ""))
            .with_response("/getcrumb", HttpResponse::ok_json("crumb"))
            .with_json("/quoteSummary/", r#"{"quoteSummary":{"error":null,"result":[{"price":null}]}}"#),
    );
    let equity_config = FetcherConfig {
        yahoo: YahooConfig {
            base_url: String::from("https://query.test"),
            cookie_url: String::from("https://session.test"),
            ..YahooConfig::default()
        },
        ..FetcherConfig::default()
    };

    // When: Every snapshot-style operation runs
    let mut documents = Vec::new();
    for args in [
        vec!["current", "bitcoin", "usd"],
        vec!["search", "btc"],
        vec!["list"],
    ] {
        let argv: Vec<String> = std::iter::once("coingecko-fetcher")
            .chain(args)
            .map(str::to_owned)
            .collect();
        documents.push(
            run_crypto(argv, crypto.clone(), &FetcherConfig::default())
                .await
                .expect("crypto run"),
        );
    }
    documents.push(
        run_equity(
            vec![String::from("yfinance-fetcher"), String::from("info"), String::from("IBM")],
            equity.clone(),
            &equity_config,
        )
        .await
        .expect("equity run"),
    );

    // Then: No value anywhere is null
    for document in &documents {
        assert!(!contains_null(document), "null in {document}");
    }
    assert_eq!(documents[0].as_object().map(|o| o.len()), Some(15));
    assert_eq!(documents[3]["currency"], "USD");
}

#[test]
fn schema_tables_are_usable_by_callers() {
    // Given: A caller-defined schema with a raw-wrapped source
    const QUOTE: Schema = Schema::new(
        "caller.quote",
        &[marketfetch_core::FieldMapping {
            field: "price",
            sources: &[&[marketfetch_core::Segment::Key("price")]],
            fallback: marketfetch_core::Fallback::Float,
        }],
    );

    // When: It is applied to a Yahoo-style payload
    let record = QUOTE.apply(&json!({ "price": { "raw": 12.5 } }), &LookupContext::new());

    // Then: The wrapper is unwrapped
    assert_eq!(serde_json::to_string(&record).expect("json"), r#"{"price":12.5}"#);
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}
