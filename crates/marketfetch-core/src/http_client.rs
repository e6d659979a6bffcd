use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::warn;

/// Browser-like user agent; Yahoo rejects obvious library agents.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Authentication applied to outgoing provider requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    Header { name: String, value: String },
    Cookie(String),
}

impl HttpAuth {
    pub fn apply(&self, headers: &mut BTreeMap<String, String>) {
        match self {
            Self::None => {}
            Self::Header { name, value } => {
                headers.insert(name.to_ascii_lowercase(), value.clone());
            }
            Self::Cookie(cookie) => {
                headers.insert(String::from("cookie"), cookie.clone());
            }
        }
    }
}

/// GET request issued by a provider adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        auth.apply(&mut self.headers);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure: no response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport contract used by provider adapters.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
///
/// The cookie store is enabled so the Yahoo session cookie obtained during the
/// crumb handshake is replayed on the follow-up `quoteSummary` call.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|error| {
                warn!(%error, "http client setup failed; using defaults without a cookie store");
                reqwest::Client::new()
            });

        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms));

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
struct FixtureRoute {
    url_fragment: String,
    reply: Result<HttpResponse, HttpError>,
}

/// Scripted transport for deterministic offline tests.
///
/// Each request is answered by the first route whose fragment occurs in the
/// request URL; unmatched requests fail at the transport level. Every request
/// is recorded so tests can assert how many upstream calls were made.
#[derive(Debug, Default)]
pub struct FixtureHttpClient {
    routes: Vec<FixtureRoute>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FixtureHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, url_fragment: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(url_fragment, HttpResponse::ok_json(body))
    }

    pub fn with_response(mut self, url_fragment: impl Into<String>, response: HttpResponse) -> Self {
        self.routes.push(FixtureRoute {
            url_fragment: url_fragment.into(),
            reply: Ok(response),
        });
        self
    }

    pub fn with_transport_error(
        mut self,
        url_fragment: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.routes.push(FixtureRoute {
            url_fragment: url_fragment.into(),
            reply: Err(HttpError::new(message)),
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl HttpClient for FixtureHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let reply = self
            .routes
            .iter()
            .find(|route| request.url.contains(&route.url_fragment))
            .map(|route| route.reply.clone())
            .unwrap_or_else(|| Err(HttpError::new(format!("no fixture for {}", request.url))));

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        Box::pin(async move { reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_header_auth_lowercases_name() {
        let request = HttpRequest::get("https://example.test/ping").with_auth(&HttpAuth::Header {
            name: String::from("X-CG-Demo-Api-Key"),
            value: String::from("demo"),
        });

        assert_eq!(
            request.headers.get("x-cg-demo-api-key").map(String::as_str),
            Some("demo")
        );
    }

    #[test]
    fn cookie_auth_sets_cookie_header() {
        let request = HttpRequest::get("https://example.test/ping")
            .with_auth(&HttpAuth::Cookie(String::from("A1=session")));

        assert_eq!(
            request.headers.get("cookie").map(String::as_str),
            Some("A1=session")
        );
    }

    #[tokio::test]
    async fn reqwest_client_reports_connection_failures() {
        let client = ReqwestHttpClient::new();
        let unreachable = HttpRequest::get("http://127.0.0.1:9/").with_timeout_ms(200);

        let error = client.execute(unreachable).await.expect_err("nothing listens on port 9");
        assert!(!error.to_string().is_empty());
    }

    #[tokio::test]
    async fn fixture_client_answers_first_matching_route_and_records() {
        let client = FixtureHttpClient::new()
            .with_json("/simple/price", r#"{"bitcoin":{"usd":1.0}}"#)
            .with_response("/coins/", HttpResponse::with_status(404, "{}"));

        let price = client
            .execute(HttpRequest::get("https://api.test/simple/price?ids=bitcoin"))
            .await
            .expect("route should match");
        assert!(price.is_success());

        let detail = client
            .execute(HttpRequest::get("https://api.test/coins/bitcoin"))
            .await
            .expect("route should match");
        assert_eq!(detail.status, 404);

        let error = client
            .execute(HttpRequest::get("https://api.test/search"))
            .await
            .expect_err("no route for search");
        assert!(error.message().contains("no fixture"));

        assert_eq!(client.request_count(), 3);
    }
}
