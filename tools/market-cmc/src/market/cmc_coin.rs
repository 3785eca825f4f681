//! # `GET /cmc-coin`
//!
//! Looks up one asset: descriptive metadata (logo, links) and the latest quote
//! in the target currency, fetched concurrently.

use {
    crate::market::normalize_convert,
    hfv_toolkit::*,
    serde::Deserialize,
    serde_json::{json, Value},
};

const INFO_ENDPOINT: &str = "v2/cryptocurrency/info";
const QUOTES_ENDPOINT: &str = "v2/cryptocurrency/quotes/latest";

#[derive(Debug, Deserialize)]
pub(crate) struct Query {
    /// Asset symbol, e.g. `BTC`. Required.
    symbol: Option<String>,
    /// Target currency, defaults to `USD`.
    convert: Option<String>,
}

pub(crate) struct CmcCoin {
    upstream: UpstreamClient,
}

impl ProxyFunction for CmcCoin {
    type Query = Query;

    fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    fn path() -> &'static str {
        "/cmc-coin"
    }

    async fn handle(&self, Query { symbol, convert }: Query) -> AnyResult<ProxyReply> {
        let Some(symbol) = symbol.filter(|symbol| !symbol.is_empty()) else {
            return Ok(ProxyReply::text(StatusCode::BAD_REQUEST, "symbol required"));
        };

        let convert = normalize_convert(convert.as_deref());

        let info_query = [("symbol", symbol.as_str())];
        let quote_query = [("symbol", symbol.as_str()), ("convert", convert.as_str())];

        let (info, quote) = tokio::join!(
            self.upstream.get(INFO_ENDPOINT, &info_query),
            self.upstream.get(QUOTES_ENDPOINT, &quote_query),
        );

        // A metadata failure is reported whatever happened to the quote call.
        let info = info?;

        if !info.is_success() {
            return Ok(ProxyReply::passthrough(info));
        }

        let quote = quote?;

        if !quote.is_success() {
            return Ok(ProxyReply::passthrough(quote));
        }

        let info = info.json::<Value>()?;
        let quote = quote.json::<Value>()?;

        Ok(ProxyReply::json(
            StatusCode::OK,
            json!({
                "info": first_record(&info, &symbol),
                "quote": first_record(&quote, &symbol),
            }),
        ))
    }
}

/// Returns `data[symbol][0]` of an upstream envelope, or `null`. The upstream
/// keys records by upper-case symbol, so that spelling is tried second.
fn first_record(envelope: &Value, symbol: &str) -> Value {
    let data = &envelope["data"];

    data.get(symbol)
        .or_else(|| data.get(symbol.to_uppercase()))
        .and_then(|records| records.get(0))
        .cloned()
        .unwrap_or(Value::Null)
}
