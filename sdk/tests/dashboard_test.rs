use {
    hfv_sdk::{
        AppAction,
        AppState,
        BottomTab,
        Currency,
        Dashboard,
        MarketTab,
        ProxyClient,
        SelectedCoin,
        ViewState,
    },
    mockito::{Matcher, Mock, ServerGuard},
    serde_json::json,
    std::time::Duration,
};

/// Polls the dashboard until `done` holds, failing after a few seconds.
async fn wait_until(dashboard: &Dashboard, done: impl Fn(&Dashboard) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(dashboard) {
            dashboard.changed().await;
        }
    })
    .await
    .expect("Dashboard did not reach the expected state");
}

async fn mock_markets(server: &mut ServerGuard, currency: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", "/cmc-markets")
        .match_query(Matcher::UrlEncoded("convert".into(), currency.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

async fn mock_global(server: &mut ServerGuard, currency: &str, cap: f64) -> Mock {
    server
        .mock("GET", "/cmc-global")
        .match_query(Matcher::UrlEncoded("convert".into(), currency.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "btc_dominance": 52.1,
                "eth_dominance": 17.4,
                "quote": { (currency): { "total_market_cap": cap, "total_volume_24h": 7.5e10 } }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await
}

fn markets_ready_in(dashboard: &Dashboard, currency: Currency) -> bool {
    matches!(
        dashboard.markets(),
        ViewState::Ready(quotes) if quotes.iter().all(|quote| quote.currency == currency)
    )
}

fn global_ready_in(dashboard: &Dashboard, currency: Currency) -> bool {
    matches!(dashboard.global(), ViewState::Ready(global) if global.currency == currency)
}

#[tokio::test]
async fn test_currency_change_refetches_each_view_once() {
    let mut server = mockito::Server::new_async().await;

    let usd_markets = mock_markets(
        &mut server,
        "USD",
        json!([
            { "id": 1, "name": "Bitcoin", "symbol": "BTC", "quote": { "USD": { "price": 64000.5 } } },
            { "id": 1027, "name": "Ethereum", "symbol": "ETH", "quote": { "USD": { "price": 3100.0 } } }
        ]),
    )
    .await;
    let usd_global = mock_global(&mut server, "USD", 2.2e12).await;

    let eur_markets = mock_markets(
        &mut server,
        "EUR",
        json!([
            { "id": 1, "name": "Bitcoin", "symbol": "BTC", "quote": { "EUR": { "price": 59000.0 } } }
        ]),
    )
    .await;
    let eur_global = mock_global(&mut server, "EUR", 2.0e12).await;

    let exchanges = server
        .mock("GET", "/cmc-exchanges")
        .expect(0)
        .create_async()
        .await;

    let mut dashboard = Dashboard::new(ProxyClient::new(&server.url()), AppState::default(), None);

    wait_until(&dashboard, |d| {
        markets_ready_in(d, Currency::Usd) && global_ready_in(d, Currency::Usd)
    })
    .await;

    assert_eq!(dashboard.markets().ready().map(Vec::len), Some(2));

    dashboard.dispatch(AppAction::SetCurrency(Currency::Eur));

    // Both views restart from scratch.
    assert!(dashboard.markets().is_loading());
    assert!(dashboard.global().is_loading());

    wait_until(&dashboard, |d| {
        markets_ready_in(d, Currency::Eur) && global_ready_in(d, Currency::Eur)
    })
    .await;

    let quotes = dashboard.markets().ready().cloned().unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].symbol, "BTC");
    assert_eq!(quotes[0].price, Some(59000.0));

    let global = dashboard.global().ready().cloned().unwrap();

    assert_eq!(global.total_market_cap, Some(2.0e12));

    usd_markets.assert_async().await;
    usd_global.assert_async().await;
    eur_markets.assert_async().await;
    eur_global.assert_async().await;
    exchanges.assert_async().await;
}

#[tokio::test]
async fn test_search_filters_without_fetching() {
    let mut server = mockito::Server::new_async().await;

    let markets = mock_markets(
        &mut server,
        "USD",
        json!([
            { "id": 1, "name": "Bitcoin", "symbol": "BTC" },
            { "id": 1027, "name": "Ethereum", "symbol": "ETH" },
            { "id": 1839, "name": "BNB", "symbol": "BNB" }
        ]),
    )
    .await;
    mock_global(&mut server, "USD", 2.2e12).await;

    let mut dashboard = Dashboard::new(ProxyClient::new(&server.url()), AppState::default(), None);

    wait_until(&dashboard, |d| markets_ready_in(d, Currency::Usd)).await;

    dashboard.dispatch(AppAction::SetQuery("B".to_string()));

    let symbols = |d: &Dashboard| {
        d.markets()
            .ready()
            .map(|quotes| quotes.iter().map(|q| q.symbol.clone()).collect::<Vec<_>>())
    };

    assert_eq!(
        symbols(&dashboard),
        Some(vec!["BTC".to_string(), "BNB".to_string()])
    );

    dashboard.dispatch(AppAction::SetQuery("solana".to_string()));
    assert_eq!(symbols(&dashboard), Some(vec![]));

    dashboard.dispatch(AppAction::ToggleFavorite("ETH".to_string()));
    assert!(dashboard.state().favorites.contains("ETH"));

    markets.assert_async().await;
}

#[tokio::test]
async fn test_tab_switch_unmounts_markets_and_mounts_exchanges() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/cmc-markets")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{ "id": 1, "name": "Bitcoin", "symbol": "BTC" }]"#)
        .expect_at_most(1)
        .create_async()
        .await;
    mock_global(&mut server, "USD", 2.2e12).await;

    let exchanges = server
        .mock("GET", "/cmc-exchanges")
        .with_status(503)
        .with_body("rate limited")
        .expect(1)
        .create_async()
        .await;

    let mut dashboard = Dashboard::new(ProxyClient::new(&server.url()), AppState::default(), None);

    // Switch before the markets fetch had a chance to resolve.
    dashboard.dispatch(AppAction::ShowMarketTab(MarketTab::Exchanges));

    wait_until(&dashboard, |d| d.exchanges().error().is_some()).await;

    assert_eq!(dashboard.exchanges().error(), Some("503 rate limited"));
    assert!(dashboard.markets().is_loading());

    // Leaving the market page stops everything.
    dashboard.dispatch(AppAction::ShowBottom(BottomTab::Portfolio));

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(dashboard.markets().is_loading());

    exchanges.assert_async().await;
}

#[tokio::test]
async fn test_coin_detail_follows_selection() {
    let mut server = mockito::Server::new_async().await;

    mock_markets(&mut server, "USD", json!([])).await;
    mock_global(&mut server, "USD", 2.2e12).await;

    let eth = server
        .mock("GET", "/cmc-coin")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "ETH".into()),
            Matcher::UrlEncoded("convert".into(), "USD".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "info": { "logo": "https://example.org/eth.png", "urls": { "website": ["https://ethereum.org/"] } },
                "quote": { "quote": { "USD": { "price": 3100.0, "percent_change_24h": 1.5 } } }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let mut dashboard = Dashboard::new(ProxyClient::new(&server.url()), AppState::default(), None);

    assert!(dashboard.detail().is_none());

    dashboard.dispatch(AppAction::SelectCoin(SelectedCoin {
        symbol: "ETH".to_string(),
        name: "Ethereum".to_string(),
    }));

    wait_until(&dashboard, |d| {
        matches!(d.detail(), Some((_, ViewState::Ready(_))))
    })
    .await;

    let (coin, detail) = dashboard.detail().unwrap();
    let detail = detail.ready().cloned().unwrap();

    assert_eq!(coin.name, "Ethereum");
    assert_eq!(detail.official_site_url.as_deref(), Some("https://ethereum.org/"));
    assert_eq!(detail.price, Some(3100.0));

    dashboard.dispatch(AppAction::CloseDetail);
    assert!(dashboard.detail().is_none());

    eth.assert_async().await;
}

async fn mock_coin(server: &mut ServerGuard, symbol: &str, currency: &str, price: f64) -> Mock {
    server
        .mock("GET", "/cmc-coin")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), symbol.into()),
            Matcher::UrlEncoded("convert".into(), currency.into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "info": { "urls": { "website": ["https://bitcoin.org/"] } },
                "quote": { "quote": { (currency): { "price": price, "market_cap": price * 1e7 } } }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_currency_change_refetches_open_detail_once() {
    let mut server = mockito::Server::new_async().await;

    let usd_markets = mock_markets(&mut server, "USD", json!([])).await;
    let usd_global = mock_global(&mut server, "USD", 2.2e12).await;
    let usd_coin = mock_coin(&mut server, "BTC", "USD", 1.0).await;

    let eur_markets = mock_markets(&mut server, "EUR", json!([])).await;
    let eur_global = mock_global(&mut server, "EUR", 2.0e12).await;
    let eur_coin = mock_coin(&mut server, "BTC", "EUR", 2.0).await;

    let mut dashboard = Dashboard::new(ProxyClient::new(&server.url()), AppState::default(), None);

    dashboard.dispatch(AppAction::SelectCoin(SelectedCoin {
        symbol: "BTC".to_string(),
        name: "Bitcoin".to_string(),
    }));

    let detail_ready_in = |d: &Dashboard, currency: Currency| {
        matches!(d.detail(), Some((_, ViewState::Ready(detail))) if detail.currency == currency)
    };

    wait_until(&dashboard, |d| {
        detail_ready_in(d, Currency::Usd)
            && markets_ready_in(d, Currency::Usd)
            && global_ready_in(d, Currency::Usd)
    })
    .await;

    dashboard.dispatch(AppAction::SetCurrency(Currency::Eur));

    assert!(matches!(dashboard.detail(), Some((_, ViewState::Loading))));

    wait_until(&dashboard, |d| {
        detail_ready_in(d, Currency::Eur)
            && markets_ready_in(d, Currency::Eur)
            && global_ready_in(d, Currency::Eur)
    })
    .await;

    let (coin, detail) = dashboard.detail().unwrap();
    let detail = detail.ready().cloned().unwrap();

    // The USD figures are gone, not merged.
    assert_eq!(coin.symbol, "BTC");
    assert_eq!(detail.price, Some(2.0));
    assert_eq!(detail.market_cap, Some(2.0e7));

    for mock in [usd_markets, usd_global, usd_coin, eur_markets, eur_global, eur_coin] {
        mock.assert_async().await;
    }
}
