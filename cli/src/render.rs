//! Terminal rendering of the dashboard sections. Every function returns the
//! text instead of printing it so the live dashboard can redraw in one write.

use {
    crate::{display::dim, prelude::*},
    hfv_sdk::{
        favorites::Favorites,
        format::{format_amount, format_count, format_percent, format_price},
        models::{CoinDetail, ExchangeListing, GlobalMetrics, MarketQuote},
        BottomTab,
        Dashboard,
        MarketTab,
        Page,
        SelectedCoin,
        ViewState,
    },
    std::fmt::Write,
};

const NAME_WIDTH: usize = 30;
const FIGURE_WIDTH: usize = 18;

/// Renders whatever the current [`Page`] shows.
pub(crate) fn render_dashboard(dashboard: &Dashboard) -> String {
    let state = dashboard.state();
    let mut out = String::new();

    out.push_str(&render_header(dashboard));

    match dashboard.page() {
        Page::Market(tab) => {
            out.push_str(&render_global(&dashboard.global(), state.currency));

            match tab {
                MarketTab::Crypto => {
                    out.push_str(&render_markets(&dashboard.markets(), &state.favorites))
                }
                MarketTab::Categories => out.push_str(&render_placeholder(
                    "Categories",
                    "Category snapshots are not available yet.",
                )),
                MarketTab::Nft => out.push_str(&render_placeholder(
                    "NFT",
                    "NFT collections are not available on the current plan.",
                )),
                MarketTab::Exchanges => out.push_str(&render_exchanges(&dashboard.exchanges())),
            }

            if let Some((coin, detail)) = dashboard.detail() {
                out.push_str(&render_detail(coin, &detail));
            }
        }
        Page::Portfolio => out.push_str(&render_placeholder(
            "Portfolio",
            "Track holdings here once a wallet is connected. No history is stored.",
        )),
        Page::Search => out.push_str(&render_placeholder(
            "Search",
            "Type /<text> to filter the markets listing.",
        )),
        Page::Explore => out.push_str(&render_placeholder(
            "Explore",
            "Trending assets, latest values only.",
        )),
        Page::Profile => out.push_str(&render_placeholder(
            "Profile",
            "Settings live in ~/.hfv/conf.toml, see `hfv conf`.",
        )),
    }

    out.push_str(&format!(
        "\n{}\n",
        dim("Latest values only • No history stored")
    ));

    out
}

fn render_header(dashboard: &Dashboard) -> String {
    let state = dashboard.state();

    let bottom = [
        (BottomTab::Market, "Market"),
        (BottomTab::Portfolio, "Portfolio"),
        (BottomTab::Search, "Search"),
        (BottomTab::Explore, "Explore"),
        (BottomTab::Profile, "Profile"),
    ]
    .into_iter()
    .map(|(tab, label)| highlight(label, tab == state.bottom))
    .collect::<Vec<_>>()
    .join("  ");

    let market = [
        (MarketTab::Crypto, "Cryptocurrency"),
        (MarketTab::Categories, "Categories"),
        (MarketTab::Nft, "NFT"),
        (MarketTab::Exchanges, "Exchanges"),
    ]
    .into_iter()
    .map(|(tab, label)| highlight(label, tab == state.market_tab))
    .collect::<Vec<_>>()
    .join("  ");

    let mut out = format!(
        "{} {}  {}\n{}\n",
        "HFV".bold().green(),
        bottom,
        dim(&format!("[{}]", state.currency)),
        market
    );

    if !state.query.is_empty() {
        let _ = writeln!(out, "Search: {}", state.query.bold());
    }

    out
}

fn highlight(label: &str, active: bool) -> String {
    if active {
        label.bold().underline().to_string()
    } else {
        dim(label).to_string()
    }
}

fn render_placeholder(title: &str, body: &str) -> String {
    format!(
        "\n{}\n{}\n",
        title.bold(),
        dim(body)
    )
}

/// Shared rendering of the three view states. `ready` is only called with
/// data.
fn render_state<T>(
    state: &ViewState<T>,
    loading: &str,
    ready: impl FnOnce(&T) -> String,
) -> String {
    match state {
        ViewState::Loading => format!("{}\n", dim(loading)),
        ViewState::Error(message) => format!("{}\n", message.red()),
        ViewState::Ready(data) => ready(data),
    }
}

pub(crate) fn render_global(state: &ViewState<GlobalMetrics>, currency: Currency) -> String {
    let mut out = String::from("\n");

    // The cards show placeholders until the metrics arrive.
    let empty = GlobalMetrics {
        currency,
        total_market_cap: None,
        total_volume_24h: None,
        btc_dominance: None,
        eth_dominance: None,
    };
    let global = state.ready().unwrap_or(&empty);

    for (label, value) in [
        (
            "Global Market Cap",
            format_amount(global.total_market_cap, global.currency),
        ),
        (
            "24h Volume",
            format_amount(global.total_volume_24h, global.currency),
        ),
        ("BTC Dominance", format_percent(global.btc_dominance)),
        ("ETH Dominance", format_percent(global.eth_dominance)),
    ] {
        let _ = writeln!(
            out,
            "{:<20}{}",
            dim(label),
            value.bold()
        );
    }

    if let Some(message) = state.error() {
        let _ = writeln!(out, "{}", message.red());
    }

    out
}

pub(crate) fn render_markets(state: &ViewState<Vec<MarketQuote>>, favorites: &Favorites) -> String {
    let mut out = format!("\n{}\n", "Cryptocurrency".bold());

    out.push_str(&render_state(state, "Loading markets…", |quotes| {
        let mut rows = String::new();

        for quote in quotes {
            let star = if favorites.contains(&quote.symbol) {
                "★".yellow()
            } else {
                dim("☆")
            };

            let name = format!("{} ({})", quote.name, quote.symbol);
            let price = format_price(quote.price, quote.currency);

            let _ = writeln!(
                rows,
                "{star} {name:<NAME_WIDTH$} {price:>FIGURE_WIDTH$} {change}",
                change = colored_change(quote.percent_change_24h),
            );
        }

        if quotes.is_empty() {
            rows.push_str(&format!("{}\n", dim("No matching assets.")));
        }

        rows
    }));

    out
}

pub(crate) fn render_exchanges(state: &ViewState<Vec<ExchangeListing>>) -> String {
    let mut out = format!("\n{}\n", "Exchanges".bold());

    out.push_str(&render_state(state, "Loading exchanges…", |exchanges| {
        let mut rows = String::new();

        for exchange in exchanges {
            let pairs = format!("Markets: {}", format_count(exchange.num_market_pairs));
            let volume = format_amount(exchange.volume_24h, Currency::Usd);

            let _ = writeln!(
                rows,
                "{name:<NAME_WIDTH$} {pairs:<18} 24h Vol: {volume}",
                name = exchange.name,
            );
        }

        rows
    }));

    out
}

pub(crate) fn render_detail(coin: &SelectedCoin, state: &ViewState<CoinDetail>) -> String {
    let mut out = format!(
        "\n{} {}\n",
        coin.name.bold(),
        dim(&format!("({})", coin.symbol))
    );

    out.push_str(&render_state(state, "Loading details…", |detail| {
        let mut lines = String::new();

        let _ = writeln!(
            lines,
            "{:<14}{}",
            "Price",
            format_price(detail.price, detail.currency).bold()
        );
        let _ = writeln!(
            lines,
            "{:<14}{}",
            "24h Change",
            colored_change(detail.percent_change_24h)
        );
        let _ = writeln!(
            lines,
            "{:<14}{}",
            "Market Cap",
            format_amount(detail.market_cap, detail.currency).bold()
        );

        if let Some(url) = &detail.official_site_url {
            let _ = writeln!(lines, "{:<14}{}", "Official Site", url.underline());
        }

        lines
    }));

    out
}

fn colored_change(change: Option<f64>) -> String {
    match change {
        Some(change) if change >= 0.0 => format!("▲ {}", format_percent(Some(change)))
            .green()
            .to_string(),
        Some(change) => format!("▼ {}", format_percent(Some(change)))
            .red()
            .to_string(),
        None => format_percent(None),
    }
}
