//! # `GET /cmc-markets`
//!
//! Paginated asset listing with quotes in the target currency. Backs the
//! dashboard's markets table.

use {crate::market::normalize_convert, hfv_toolkit::*, serde::Deserialize};

const LISTINGS_ENDPOINT: &str = "v1/cryptocurrency/listings/latest";
const DEFAULT_START: u32 = 1;
const DEFAULT_LIMIT: u32 = 100;
/// Largest page the upstream accepts.
const MAX_LIMIT: u32 = 5000;

#[derive(Debug, Deserialize)]
pub(crate) struct Query {
    /// 1-based rank offset, defaults to 1.
    start: Option<String>,
    /// Page size, defaults to 100.
    limit: Option<String>,
    /// Target currency, defaults to `USD`.
    convert: Option<String>,
}

pub(crate) struct CmcMarkets {
    upstream: UpstreamClient,
}

impl ProxyFunction for CmcMarkets {
    type Query = Query;

    fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    fn path() -> &'static str {
        "/cmc-markets"
    }

    async fn handle(&self, query: Query) -> AnyResult<ProxyReply> {
        let start = match parse_paging(query.start.as_deref(), DEFAULT_START, u32::MAX) {
            Some(start) => start,
            None => {
                return Ok(ProxyReply::text(
                    StatusCode::BAD_REQUEST,
                    "start must be a positive integer",
                ))
            }
        };

        let limit = match parse_paging(query.limit.as_deref(), DEFAULT_LIMIT, MAX_LIMIT) {
            Some(limit) => limit,
            None => {
                return Ok(ProxyReply::text(
                    StatusCode::BAD_REQUEST,
                    format!("limit must be between 1 and {MAX_LIMIT}"),
                ))
            }
        };

        let convert = normalize_convert(query.convert.as_deref());
        let (start, limit) = (start.to_string(), limit.to_string());

        let response = self
            .upstream
            .get(
                LISTINGS_ENDPOINT,
                &[
                    ("start", start.as_str()),
                    ("limit", limit.as_str()),
                    ("convert", convert.as_str()),
                ],
            )
            .await?;

        ProxyReply::data_or_raw(response)
    }
}

/// Parses a paging parameter in `1..=max`. Absent values take the default.
fn parse_paging(value: Option<&str>, default: u32, max: u32) -> Option<u32> {
    match value.map(str::trim) {
        None | Some("") => Some(default),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|value| (1..=max).contains(value)),
    }
}
