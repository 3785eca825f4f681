use {
    crate::{upstream::UpstreamResponse, UpstreamClient},
    anyhow::Result as AnyResult,
    serde::de::DeserializeOwned,
    serde_json::{json, Value},
    std::future::Future,
    warp::{http::StatusCode, Reply},
};

/// This trait defines the interface for a proxy function. It forces
/// implementation of the following methods:
///
/// - `new`: Builds the function around the shared upstream client.
/// - `path`: Returns the URL path the function is served on.
/// - `handle`: Handles one request.
///
/// And the following associated type:
///
/// - `Query`: The query-string parameters of the function.
///
/// Based on these, the runtime generates the following endpoints:
///
/// - `GET {path}`: Calls the function with the request query string.
/// - `GET {path}/health`: Returns the health status of the function.
///
/// Functions are stateless. A fresh instance is built for every request and
/// nothing is shared between invocations apart from the upstream client.
pub trait ProxyFunction: Send + Sync + 'static {
    /// The query-string parameters of the function. Fields should be
    /// optional; required parameters are validated in [`ProxyFunction::handle`]
    /// so that the function controls the exact rejection body.
    type Query: DeserializeOwned + Send + 'static;
    /// Builds the function. Called once per request.
    fn new(upstream: UpstreamClient) -> Self;
    /// Returns the relative path on the webserver that the function resides
    /// on, for example `/cmc-coin`.
    fn path() -> &'static str;
    /// Handles a request. Returning an `Err` makes the runtime answer with a
    /// `500` whose body is the error description.
    fn handle(&self, query: Self::Query) -> impl Future<Output = AnyResult<ProxyReply>> + Send;
    /// Returns the health status of the function. Defaults to `200 OK`.
    fn health(&self) -> impl Future<Output = AnyResult<StatusCode>> + Send {
        async { Ok(StatusCode::OK) }
    }
}

/// Body of a [`ProxyReply`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProxyBody {
    /// Serialized as `application/json`.
    Json(Value),
    /// Relayed verbatim as `text/plain`.
    Text(String),
}

/// The answer of a proxy function: a status code and a body.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyReply {
    status: StatusCode,
    body: ProxyBody,
}

impl ProxyReply {
    pub fn json(status: StatusCode, value: Value) -> Self {
        Self {
            status,
            body: ProxyBody::Json(value),
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ProxyBody::Text(body.into()),
        }
    }

    /// Relays an upstream response untouched: same status, raw body text.
    pub fn passthrough(response: UpstreamResponse) -> Self {
        Self::text(response.status_code(), response.body)
    }

    /// On success, answers with the upstream status and only the `data`
    /// member of the upstream envelope. On failure, relays status and raw
    /// body text without re-wrapping them.
    pub fn data_or_raw(response: UpstreamResponse) -> AnyResult<Self> {
        if !response.is_success() {
            return Ok(Self::passthrough(response));
        }

        let status = response.status_code();
        let mut envelope = response.json::<Value>()?;
        let data = envelope
            .get_mut("data")
            .map(Value::take)
            .unwrap_or(Value::Null);

        Ok(Self::json(status, data))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ProxyBody {
        &self.body
    }

    /// Converts the reply into a warp response. When `normalize_errors` is
    /// set, non-success text bodies are wrapped into a JSON error object.
    pub fn into_response(self, normalize_errors: bool) -> warp::reply::Response {
        match self.body {
            ProxyBody::Text(text) if normalize_errors && !self.status.is_success() => {
                let reply = json!({
                    "error": self.status.as_u16(),
                    "details": text,
                });

                warp::reply::with_status(warp::reply::json(&reply), self.status).into_response()
            }
            ProxyBody::Text(text) => warp::reply::with_status(text, self.status).into_response(),
            ProxyBody::Json(value) => {
                warp::reply::with_status(warp::reply::json(&value), self.status).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16, body: &str) -> UpstreamResponse {
        UpstreamResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_data_or_raw_strips_envelope() {
        let response = upstream(200, r#"{"status":{"error_code":0},"data":[{"id":270}]}"#);

        let reply = ProxyReply::data_or_raw(response).unwrap();

        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(reply.body(), &ProxyBody::Json(json!([{ "id": 270 }])));
    }

    #[test]
    fn test_data_or_raw_missing_data_is_null() {
        let reply = ProxyReply::data_or_raw(upstream(200, r#"{"status":{}}"#)).unwrap();

        assert_eq!(reply.body(), &ProxyBody::Json(Value::Null));
    }

    #[test]
    fn test_data_or_raw_keeps_failure_body_verbatim() {
        let reply = ProxyReply::data_or_raw(upstream(503, "rate limited")).unwrap();

        assert_eq!(reply.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(reply.body(), &ProxyBody::Text("rate limited".to_string()));
    }

    #[test]
    fn test_data_or_raw_fails_on_malformed_success_body() {
        assert!(ProxyReply::data_or_raw(upstream(200, "<html>")).is_err());
    }
}
