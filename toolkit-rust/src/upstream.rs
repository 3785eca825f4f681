//! Upstream API client.
//!
//! Every request carries the server-held API key. The key never leaves this
//! process: it is neither logged nor echoed back to callers.

use {
    crate::ApiKey,
    log::debug,
    reqwest::{header::ACCEPT, Client},
    serde::de::DeserializeOwned,
    std::sync::Arc,
    thiserror::Error,
    warp::http::StatusCode,
};

/// Header the upstream provider reads the API key from.
pub const DEFAULT_API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Errors raised while talking to the upstream provider. Non-success HTTP
/// statuses are *not* errors, they are relayed through [`UpstreamResponse`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid upstream JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and raw body of an upstream answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The status as a server status code. Anything that is not a valid HTTP
    /// status maps to `502 Bad Gateway`.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Client for the upstream market-data API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    api_key: Arc<ApiKey>,
    key_header: &'static str,
}

impl UpstreamClient {
    /// Creates a new client for the given base URL.
    pub fn new(base_url: &str, api_key: ApiKey) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: Arc::new(api_key),
            key_header: DEFAULT_API_KEY_HEADER,
        }
    }

    /// Sends the API key in a different header.
    pub fn with_key_header(mut self, key_header: &'static str) -> Self {
        self.key_header = key_header;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a GET request to the specified endpoint. Query values are
    /// percent-encoded.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        debug!("GET {url} {query:?}");

        let network_error = |source| UpstreamError::Network {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(self.key_header, self.api_key.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;

        debug!("GET {url} answered {status}");

        Ok(UpstreamResponse { status, body })
    }
}
