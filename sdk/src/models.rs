//! Every entity here is rebuilt from the latest proxy payload; nothing is
//! merged with previously fetched values.

use {
    crate::currency::Currency,
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::collections::HashMap,
};

const COIN_LOGO_BASE: &str = "https://s2.coinmarketcap.com/static/img/coins/64x64";
const EXCHANGE_LOGO_BASE: &str = "https://s2.coinmarketcap.com/static/img/exchanges/64x64";

/// One asset quoted in one target currency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketQuote {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    pub currency: Currency,
    pub price: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub logo_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlobalMetrics {
    pub currency: Currency,
    pub total_market_cap: Option<f64>,
    pub total_volume_24h: Option<f64>,
    pub btc_dominance: Option<f64>,
    pub eth_dominance: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExchangeListing {
    pub id: u64,
    pub name: String,
    pub num_market_pairs: Option<u64>,
    /// Always denominated in USD.
    pub volume_24h: Option<f64>,
    pub logo_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoinDetail {
    pub symbol: String,
    pub currency: Currency,
    pub logo_url: Option<String>,
    pub official_site_url: Option<String>,
    pub price: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub market_cap: Option<f64>,
}

/// Wire shapes of the proxy payloads. Unknown fields are ignored and every
/// figure the upstream may leave out or send as `null` is optional.
mod wire {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct QuoteValues {
        pub price: Option<f64>,
        pub percent_change_24h: Option<f64>,
        pub market_cap: Option<f64>,
        pub volume_24h: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Listing {
        pub id: u64,
        pub name: String,
        pub symbol: String,
        #[serde(default)]
        pub quote: HashMap<String, QuoteValues>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct GlobalQuote {
        pub total_market_cap: Option<f64>,
        pub total_volume_24h: Option<f64>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct Global {
        pub btc_dominance: Option<f64>,
        pub eth_dominance: Option<f64>,
        #[serde(default)]
        pub quote: HashMap<String, GlobalQuote>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Exchange {
        pub id: u64,
        pub name: String,
        pub num_market_pairs: Option<u64>,
        #[serde(default)]
        pub quote: HashMap<String, QuoteValues>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct Urls {
        #[serde(default)]
        pub website: Vec<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct CoinInfo {
        pub logo: Option<String>,
        #[serde(default)]
        pub urls: Option<Urls>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct CoinQuote {
        #[serde(default)]
        pub quote: HashMap<String, QuoteValues>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Coin {
        pub info: Option<CoinInfo>,
        pub quote: Option<CoinQuote>,
    }
}

/// Looks up the quote block for `currency`; the upstream keys them by
/// upper-case code.
fn quote_in<T: Default>(quotes: &mut HashMap<String, T>, currency: Currency) -> T {
    quotes.remove(currency.code()).unwrap_or_default()
}

/// Maps the `/cmc-markets` payload. A `null` payload is an empty listing.
pub fn markets_from_value(
    value: Value,
    currency: Currency,
) -> Result<Vec<MarketQuote>, serde_json::Error> {
    let listings = serde_json::from_value::<Option<Vec<wire::Listing>>>(value)?;

    Ok(listings
        .unwrap_or_default()
        .into_iter()
        .map(|mut listing| {
            let quote = quote_in(&mut listing.quote, currency);

            MarketQuote {
                logo_url: format!("{COIN_LOGO_BASE}/{}.png", listing.id),
                id: listing.id,
                name: listing.name,
                symbol: listing.symbol,
                currency,
                price: quote.price,
                percent_change_24h: quote.percent_change_24h,
                market_cap: quote.market_cap,
            }
        })
        .collect())
}

/// Maps the `/cmc-global` payload.
pub fn global_from_value(
    value: Value,
    currency: Currency,
) -> Result<GlobalMetrics, serde_json::Error> {
    let mut global = serde_json::from_value::<Option<wire::Global>>(value)?.unwrap_or_default();
    let quote = quote_in(&mut global.quote, currency);

    Ok(GlobalMetrics {
        currency,
        total_market_cap: quote.total_market_cap,
        total_volume_24h: quote.total_volume_24h,
        btc_dominance: global.btc_dominance,
        eth_dominance: global.eth_dominance,
    })
}

/// Maps the `/cmc-exchanges` payload. Volumes come from the USD block since
/// the listing is never converted.
pub fn exchanges_from_value(value: Value) -> Result<Vec<ExchangeListing>, serde_json::Error> {
    let exchanges = serde_json::from_value::<Option<Vec<wire::Exchange>>>(value)?;

    Ok(exchanges
        .unwrap_or_default()
        .into_iter()
        .map(|mut exchange| ExchangeListing {
            logo_url: format!("{EXCHANGE_LOGO_BASE}/{}.png", exchange.id),
            id: exchange.id,
            name: exchange.name,
            num_market_pairs: exchange.num_market_pairs,
            volume_24h: quote_in(&mut exchange.quote, Currency::Usd).volume_24h,
        })
        .collect())
}

/// Maps the `/cmc-coin` payload `{"info": .., "quote": ..}`. Either half may
/// be `null` for an unknown symbol.
pub fn coin_from_value(
    value: Value,
    symbol: &str,
    currency: Currency,
) -> Result<CoinDetail, serde_json::Error> {
    let coin = serde_json::from_value::<wire::Coin>(value)?;
    let info = coin.info.unwrap_or_default();
    let quote = quote_in(&mut coin.quote.unwrap_or_default().quote, currency);

    Ok(CoinDetail {
        symbol: symbol.to_string(),
        currency,
        logo_url: info.logo,
        official_site_url: info.urls.and_then(|urls| urls.website.into_iter().next()),
        price: quote.price,
        percent_change_24h: quote.percent_change_24h,
        market_cap: quote.market_cap,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_markets_mapping() {
        let payload = json!([
            {
                "id": 1, "name": "Bitcoin", "symbol": "BTC", "cmc_rank": 1,
                "quote": { "EUR": { "price": 59000.0, "percent_change_24h": 2.5, "market_cap": 1.1e12 } }
            },
            {
                "id": 52, "name": "XRP", "symbol": "XRP",
                "quote": { "EUR": { "price": null, "percent_change_24h": null } }
            }
        ]);

        let quotes = markets_from_value(payload, Currency::Eur).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].price, Some(59000.0));
        assert_eq!(quotes[0].currency, Currency::Eur);
        assert_eq!(
            quotes[0].logo_url,
            "https://s2.coinmarketcap.com/static/img/coins/64x64/1.png"
        );
        assert_eq!(quotes[1].price, None);
        assert_eq!(quotes[1].market_cap, None);
    }

    #[test]
    fn test_markets_missing_currency_block_is_empty_quote() {
        let payload = json!([{ "id": 1, "name": "Bitcoin", "symbol": "BTC", "quote": { "USD": { "price": 1.0 } } }]);

        let quotes = markets_from_value(payload, Currency::Gbp).unwrap();

        assert_eq!(quotes[0].price, None);
    }

    #[test]
    fn test_null_payloads() {
        assert!(markets_from_value(Value::Null, Currency::Usd)
            .unwrap()
            .is_empty());
        assert!(exchanges_from_value(Value::Null).unwrap().is_empty());
        assert_eq!(
            global_from_value(Value::Null, Currency::Usd).unwrap(),
            GlobalMetrics {
                currency: Currency::Usd,
                total_market_cap: None,
                total_volume_24h: None,
                btc_dominance: None,
                eth_dominance: None,
            }
        );
    }

    #[test]
    fn test_global_mapping() {
        let payload = json!({
            "btc_dominance": 52.1,
            "eth_dominance": 17.4,
            "quote": { "GBP": { "total_market_cap": 1.9e12, "total_volume_24h": 7.5e10 } }
        });

        let global = global_from_value(payload, Currency::Gbp).unwrap();

        assert_eq!(global.total_market_cap, Some(1.9e12));
        assert_eq!(global.total_volume_24h, Some(7.5e10));
        assert_eq!(global.btc_dominance, Some(52.1));
    }

    #[test]
    fn test_exchanges_read_usd_volume() {
        let payload = json!([
            { "id": 270, "name": "Binance", "num_market_pairs": 1500, "quote": { "USD": { "volume_24h": 1.5e10 } } },
            { "id": 89, "name": "Coinbase Exchange" }
        ]);

        let exchanges = exchanges_from_value(payload).unwrap();

        assert_eq!(exchanges[0].volume_24h, Some(1.5e10));
        assert_eq!(exchanges[0].num_market_pairs, Some(1500));
        assert_eq!(exchanges[1].volume_24h, None);
        assert_eq!(
            exchanges[1].logo_url,
            "https://s2.coinmarketcap.com/static/img/exchanges/64x64/89.png"
        );
    }

    #[test]
    fn test_coin_mapping() {
        let payload = json!({
            "info": {
                "logo": "https://s2.coinmarketcap.com/static/img/coins/64x64/1.png",
                "urls": { "website": ["https://bitcoin.org/", "https://example.org/"] }
            },
            "quote": { "quote": { "USD": { "price": 64000.5, "percent_change_24h": -1.25, "market_cap": 1.2e12 } } }
        });

        let coin = coin_from_value(payload, "BTC", Currency::Usd).unwrap();

        assert_eq!(
            coin.official_site_url.as_deref(),
            Some("https://bitcoin.org/")
        );
        assert_eq!(coin.price, Some(64000.5));
        assert_eq!(coin.percent_change_24h, Some(-1.25));
    }

    #[test]
    fn test_unknown_coin_has_no_figures() {
        let coin = coin_from_value(json!({ "info": null, "quote": null }), "NOPE", Currency::Usd)
            .unwrap();

        assert_eq!(coin.logo_url, None);
        assert_eq!(coin.official_site_url, None);
        assert_eq!(coin.price, None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(markets_from_value(json!({ "unexpected": true }), Currency::Usd).is_err());
    }
}
