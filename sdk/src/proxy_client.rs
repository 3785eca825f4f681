//! Client for the proxy functions served by `market-cmc`.
//!
//! The client only ever talks to the proxy, never to the upstream provider,
//! so it carries no credentials.

use {
    crate::{
        currency::Currency,
        models::{self, CoinDetail, ExchangeListing, GlobalMetrics, MarketQuote},
    },
    log::debug,
    reqwest::{header, Client},
    serde_json::Value,
    thiserror::Error,
};

/// Proxy the CLI talks to when nothing else is configured.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8080";

/// Default page of the markets listing.
const MARKETS_START: &str = "1";
const MARKETS_LIMIT: &str = "100";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProxyError {
    #[error("missing function name")]
    MissingFunction,
    /// The proxy answered with a non-2xx status. Displays as
    /// `"{status} {body}"`.
    #[error("{status} {body}")]
    Status { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ProxyError {
    fn from(e: serde_json::Error) -> Self {
        ProxyError::Decode(e.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calls a proxy function by name and returns its JSON reply.
    pub async fn call(&self, function: &str, params: &[(&str, &str)]) -> Result<Value, ProxyError> {
        let function = function.trim_matches('/');

        if function.is_empty() {
            return Err(ProxyError::MissingFunction);
        }

        let url = format!("{}/{}", self.base_url, function);

        debug!("Calling proxy function {url} with {params:?}");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProxyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn markets(&self, currency: Currency) -> Result<Vec<MarketQuote>, ProxyError> {
        let value = self
            .call(
                "cmc-markets",
                &[
                    ("start", MARKETS_START),
                    ("limit", MARKETS_LIMIT),
                    ("convert", currency.code()),
                ],
            )
            .await?;

        Ok(models::markets_from_value(value, currency)?)
    }

    pub async fn global(&self, currency: Currency) -> Result<GlobalMetrics, ProxyError> {
        let value = self
            .call("cmc-global", &[("convert", currency.code())])
            .await?;

        Ok(models::global_from_value(value, currency)?)
    }

    pub async fn exchanges(&self) -> Result<Vec<ExchangeListing>, ProxyError> {
        let value = self.call("cmc-exchanges", &[]).await?;

        Ok(models::exchanges_from_value(value)?)
    }

    pub async fn coin(&self, symbol: &str, currency: Currency) -> Result<CoinDetail, ProxyError> {
        let value = self
            .call(
                "cmc-coin",
                &[("symbol", symbol), ("convert", currency.code())],
            )
            .await?;

        Ok(models::coin_from_value(value, symbol, currency)?)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, mockito::Matcher, serde_json::json};

    async fn create_server_and_client() -> (mockito::ServerGuard, ProxyClient) {
        let server = mockito::Server::new_async().await;
        let client = ProxyClient::new(&server.url());

        (server, client)
    }

    #[tokio::test]
    async fn test_markets_request() {
        let (mut server, client) = create_server_and_client().await;

        let mock = server
            .mock("GET", "/cmc-markets")
            .match_header("accept", "application/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "100".into()),
                Matcher::UrlEncoded("convert".into(), "GBP".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{ "id": 1, "name": "Bitcoin", "symbol": "BTC", "quote": { "GBP": { "price": 50000.0 } } }])
                    .to_string(),
            )
            .create_async()
            .await;

        let quotes = client.markets(Currency::Gbp).await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, Some(50000.0));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_error_carries_raw_body() {
        let (mut server, client) = create_server_and_client().await;

        server
            .mock("GET", "/cmc-exchanges")
            .with_status(503)
            .with_body("rate limited")
            .create_async()
            .await;

        let error = client.exchanges().await.unwrap_err();

        assert_eq!(
            error,
            ProxyError::Status {
                status: 503,
                body: "rate limited".to_string()
            }
        );
        assert_eq!(error.to_string(), "503 rate limited");
    }

    #[tokio::test]
    async fn test_coin_request() {
        let (mut server, client) = create_server_and_client().await;

        let mock = server
            .mock("GET", "/cmc-coin")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbol".into(), "ETH".into()),
                Matcher::UrlEncoded("convert".into(), "EUR".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"info":null,"quote":null}"#)
            .create_async()
            .await;

        let coin = client.coin("ETH", Currency::Eur).await.unwrap();

        assert_eq!(coin.symbol, "ETH");
        assert_eq!(coin.price, None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_function_name() {
        let client = ProxyClient::new("http://127.0.0.1:1");

        assert_eq!(
            client.call("", &[]).await.unwrap_err(),
            ProxyError::MissingFunction
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let (mut server, client) = create_server_and_client().await;

        server
            .mock("GET", "/cmc-global")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        assert_matches!(
            client.global(Currency::Usd).await,
            Err(ProxyError::Decode(_))
        );
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_network_error() {
        let client = ProxyClient::new("http://127.0.0.1:1/");

        assert_matches!(client.exchanges().await, Err(ProxyError::Network(_)));
    }
}
