//! Proxy functions for CoinMarketCap market endpoints

pub(crate) const CMC_API_BASE: &str = "https://pro-api.coinmarketcap.com";

/// Target currency used when the caller does not pick one.
pub(crate) const DEFAULT_CONVERT: &str = "USD";

pub(crate) mod cmc_coin;
pub(crate) mod cmc_exchanges;
pub(crate) mod cmc_global;
pub(crate) mod cmc_markets;

/// Upper-cases the requested target currency, falling back to
/// [`DEFAULT_CONVERT`] when it is absent or blank.
pub(crate) fn normalize_convert(convert: Option<&str>) -> String {
    match convert.map(str::trim) {
        Some(convert) if !convert.is_empty() => convert.to_uppercase(),
        _ => DEFAULT_CONVERT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_convert() {
        assert_eq!(normalize_convert(None), "USD");
        assert_eq!(normalize_convert(Some("")), "USD");
        assert_eq!(normalize_convert(Some("eur")), "EUR");
        assert_eq!(normalize_convert(Some(" gbp ")), "GBP");
    }
}
