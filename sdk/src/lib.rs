//! This library contains the presentation core of the HFV market dashboard.
//! It is shared by every front end (currently the `hfv` CLI) and knows nothing
//! about the upstream provider's API key; all data flows through the proxy
//! functions served by `market-cmc`.

/// Target currencies a user can pick and how they are displayed.
pub mod currency;
/// Assets, metrics and exchanges as the dashboard shows them, plus the mapping
/// from the proxy's JSON payloads.
pub mod models;
/// HTTP client for the proxy functions.
pub mod proxy_client;
/// Data sources that a polling view can be bound to.
pub mod sources;
/// The polling view controller: fetch lifecycle, active-view guard and the
/// refresh timer.
pub mod view;
/// In-memory favorites.
pub mod favorites;
/// Local search over a fetched result set.
pub mod filter;
/// Root-owned application state and the dashboard that reconciles views with
/// it.
pub mod app;
/// Number formatting for prices, amounts and percentages.
pub mod format;

pub use {
    app::{AppAction, AppState, BottomTab, Dashboard, MarketTab, Page, SelectedCoin},
    currency::Currency,
    proxy_client::{ProxyClient, ProxyError},
    view::{PollingView, ViewSnapshot, ViewState, DEFAULT_REFRESH_INTERVAL},
};
