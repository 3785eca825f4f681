//! # `GET /cmc-exchanges`
//!
//! Lists up to 200 exchanges in the upstream default ranking.

use {hfv_toolkit::*, serde::Deserialize};

const EXCHANGES_ENDPOINT: &str = "v1/exchange/listings/latest";
const EXCHANGES_LIMIT: &str = "200";

/// Takes no parameters; anything passed is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Query {}

pub(crate) struct CmcExchanges {
    upstream: UpstreamClient,
}

impl ProxyFunction for CmcExchanges {
    type Query = Query;

    fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    fn path() -> &'static str {
        "/cmc-exchanges"
    }

    async fn handle(&self, _: Query) -> AnyResult<ProxyReply> {
        let response = self
            .upstream
            .get(
                EXCHANGES_ENDPOINT,
                &[("start", "1"), ("limit", EXCHANGES_LIMIT)],
            )
            .await?;

        ProxyReply::data_or_raw(response)
    }
}
