//! Application state is owned by one root, the [`Dashboard`]. Front ends never
//! mutate it directly: they dispatch [`AppAction`]s and read back the slices
//! they render. After every action the dashboard reconciles which polling
//! views are mounted and what they are keyed on.

use {
    crate::{
        currency::Currency,
        favorites::Favorites,
        filter::filter_quotes,
        models::{CoinDetail, ExchangeListing, GlobalMetrics, MarketQuote},
        proxy_client::ProxyClient,
        sources::{CoinDetailSource, CoinKey, ExchangesSource, GlobalSource, MarketsSource, ViewSource},
        view::{PollingView, ViewState},
    },
    log::debug,
    serde::{Deserialize, Serialize},
    std::{sync::Arc, time::Duration},
    tokio::sync::Notify,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottomTab {
    #[default]
    Market,
    Portfolio,
    Search,
    Explore,
    Profile,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTab {
    #[default]
    Crypto,
    Categories,
    Nft,
    Exchanges,
}

/// What the front end has to render. Resolve it with one exhaustive `match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "tab", rename_all = "lowercase")]
pub enum Page {
    Market(MarketTab),
    Portfolio,
    Search,
    Explore,
    Profile,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedCoin {
    pub symbol: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    ShowBottom(BottomTab),
    ShowMarketTab(MarketTab),
    SetCurrency(Currency),
    SetQuery(String),
    SelectCoin(SelectedCoin),
    CloseDetail,
    ToggleFavorite(String),
    /// Fetch every mounted view again now.
    Refresh,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub bottom: BottomTab,
    pub market_tab: MarketTab,
    pub currency: Currency,
    pub query: String,
    pub selected: Option<SelectedCoin>,
    pub favorites: Favorites,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            bottom: BottomTab::default(),
            market_tab: MarketTab::default(),
            currency: Currency::default(),
            query: String::new(),
            selected: None,
            favorites: Favorites::new(["HFV"]),
        }
    }
}

impl AppState {
    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::ShowBottom(tab) => self.bottom = tab,
            AppAction::ShowMarketTab(tab) => self.market_tab = tab,
            AppAction::SetCurrency(currency) => self.currency = currency,
            AppAction::SetQuery(query) => self.query = query,
            AppAction::SelectCoin(coin) => self.selected = Some(coin),
            AppAction::CloseDetail => self.selected = None,
            AppAction::ToggleFavorite(symbol) => {
                self.favorites.toggle(&symbol);
            }
            AppAction::Refresh => {}
        }
    }

    pub fn page(&self) -> Page {
        match self.bottom {
            BottomTab::Market => Page::Market(self.market_tab),
            BottomTab::Portfolio => Page::Portfolio,
            BottomTab::Search => Page::Search,
            BottomTab::Explore => Page::Explore,
            BottomTab::Profile => Page::Profile,
        }
    }

    /// Key of the coin detail view, if it should be showing.
    fn detail_key(&self) -> Option<CoinKey> {
        match (self.page(), &self.selected) {
            (Page::Market(_), Some(coin)) => Some(CoinKey {
                symbol: coin.symbol.clone(),
                currency: self.currency,
            }),
            _ => None,
        }
    }
}

/// Root of the dashboard: owns [`AppState`] and every polling view.
///
/// Global metrics show on the whole market page, the markets listing only on
/// the crypto tab, exchanges only on the exchanges tab and the coin detail
/// while a coin is selected on the market page.
pub struct Dashboard {
    state: AppState,
    client: ProxyClient,
    refresh: Option<Duration>,
    changed: Arc<Notify>,
    global: PollingView<GlobalSource>,
    markets: PollingView<MarketsSource>,
    exchanges: PollingView<ExchangesSource>,
    detail: Option<PollingView<CoinDetailSource>>,
}

impl Dashboard {
    /// Builds the views and mounts those the initial state shows. Must be
    /// called from within a Tokio runtime.
    pub fn new(client: ProxyClient, state: AppState, refresh: Option<Duration>) -> Self {
        let changed = Arc::new(Notify::new());

        let mut dashboard = Self {
            global: Self::view(GlobalSource(client.clone()), state.currency, refresh, &changed),
            markets: Self::view(MarketsSource(client.clone()), state.currency, refresh, &changed),
            exchanges: Self::view(ExchangesSource(client.clone()), (), refresh, &changed),
            detail: None,
            state,
            client,
            refresh,
            changed,
        };

        dashboard.reconcile();

        dashboard
    }

    fn view<S: ViewSource>(
        source: S,
        key: S::Key,
        refresh: Option<Duration>,
        changed: &Arc<Notify>,
    ) -> PollingView<S> {
        PollingView::new(source, key)
            .with_refresh(refresh)
            .with_notify(Arc::clone(changed))
    }

    pub fn dispatch(&mut self, action: AppAction) {
        debug!("Dispatching {action:?}");

        let refresh = action == AppAction::Refresh;

        self.state.apply(action);
        self.reconcile();

        if refresh {
            self.refresh_mounted();
        }

        self.changed.notify_one();
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn page(&self) -> Page {
        self.state.page()
    }

    /// Resolves once anything visible may have changed.
    pub async fn changed(&self) {
        self.changed.notified().await
    }

    pub fn global(&self) -> ViewState<GlobalMetrics> {
        self.global.state()
    }

    /// Markets listing narrowed by the current search query.
    pub fn markets(&self) -> ViewState<Vec<MarketQuote>> {
        let query = &self.state.query;

        self.markets.state().map(|quotes| {
            filter_quotes(&quotes, query)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn exchanges(&self) -> ViewState<Vec<ExchangeListing>> {
        self.exchanges.state()
    }

    pub fn detail(&self) -> Option<(&SelectedCoin, ViewState<CoinDetail>)> {
        let coin = self.state.selected.as_ref()?;
        let detail = self.detail.as_ref()?;

        Some((coin, detail.state()))
    }

    fn reconcile(&mut self) {
        let page = self.state.page();
        let currency = self.state.currency;

        let on_market = matches!(page, Page::Market(_));

        reconcile_view(&mut self.global, on_market, currency);
        reconcile_view(
            &mut self.markets,
            page == Page::Market(MarketTab::Crypto),
            currency,
        );
        reconcile_view(
            &mut self.exchanges,
            page == Page::Market(MarketTab::Exchanges),
            (),
        );

        match (self.state.detail_key(), self.detail.as_mut()) {
            (Some(key), Some(detail)) => detail.set_key(key),
            (Some(key), None) => {
                let mut detail = Self::view(
                    CoinDetailSource(self.client.clone()),
                    key,
                    self.refresh,
                    &self.changed,
                );
                detail.mount();
                self.detail = Some(detail);
            }
            // Dropping the view unmounts it.
            (None, _) => self.detail = None,
        }
    }

    fn refresh_mounted(&self) {
        if self.global.is_mounted() {
            self.global.refresh();
        }

        if self.markets.is_mounted() {
            self.markets.refresh();
        }

        if self.exchanges.is_mounted() {
            self.exchanges.refresh();
        }

        if let Some(detail) = &self.detail {
            detail.refresh();
        }
    }
}

fn reconcile_view<S: ViewSource>(view: &mut PollingView<S>, active: bool, key: S::Key) {
    if !active {
        view.unmount();
        return;
    }

    // Rekeying an unmounted view only records the key.
    view.set_key(key);
    view.mount();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_resolution() {
        let mut state = AppState::default();

        assert_eq!(state.page(), Page::Market(MarketTab::Crypto));

        state.apply(AppAction::ShowMarketTab(MarketTab::Nft));
        assert_eq!(state.page(), Page::Market(MarketTab::Nft));

        state.apply(AppAction::ShowBottom(BottomTab::Profile));
        assert_eq!(state.page(), Page::Profile);

        // The market tab is remembered while on other pages.
        state.apply(AppAction::ShowBottom(BottomTab::Market));
        assert_eq!(state.page(), Page::Market(MarketTab::Nft));
    }

    #[test]
    fn test_detail_only_on_market_page() {
        let mut state = AppState::default();

        state.apply(AppAction::SelectCoin(SelectedCoin {
            symbol: "ETH".to_string(),
            name: "Ethereum".to_string(),
        }));
        assert_eq!(
            state.detail_key(),
            Some(CoinKey {
                symbol: "ETH".to_string(),
                currency: Currency::Usd
            })
        );

        state.apply(AppAction::ShowBottom(BottomTab::Explore));
        assert_eq!(state.detail_key(), None);
        assert!(state.selected.is_some());

        state.apply(AppAction::ShowBottom(BottomTab::Market));
        state.apply(AppAction::CloseDetail);
        assert_eq!(state.detail_key(), None);
    }

    #[test]
    fn test_default_favorites() {
        let mut state = AppState::default();

        assert!(state.favorites.contains("HFV"));

        state.apply(AppAction::ToggleFavorite("BTC".to_string()));
        state.apply(AppAction::ToggleFavorite("BTC".to_string()));

        assert_eq!(state, AppState::default());
    }
}
