//! # `GET /cmc-global`
//!
//! Global aggregate market metrics in the target currency.

use {crate::market::normalize_convert, hfv_toolkit::*, serde::Deserialize};

const GLOBAL_METRICS_ENDPOINT: &str = "v1/global-metrics/quotes/latest";

#[derive(Debug, Deserialize)]
pub(crate) struct Query {
    /// Target currency, defaults to `USD`.
    convert: Option<String>,
}

pub(crate) struct CmcGlobal {
    upstream: UpstreamClient,
}

impl ProxyFunction for CmcGlobal {
    type Query = Query;

    fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    fn path() -> &'static str {
        "/cmc-global"
    }

    async fn handle(&self, Query { convert }: Query) -> AnyResult<ProxyReply> {
        let convert = normalize_convert(convert.as_deref());

        let response = self
            .upstream
            .get(GLOBAL_METRICS_ENDPOINT, &[("convert", convert.as_str())])
            .await?;

        ProxyReply::data_or_raw(response)
    }
}
