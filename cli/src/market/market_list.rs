use {
    crate::{
        command_title,
        display::{fetch, json_mode, json_output},
        prelude::*,
        render::render_markets,
    },
    hfv_sdk::{filter::filter_quotes, models::MarketQuote, AppState, ViewState},
};

/// Fetch the markets listing once and print it, optionally filtered.
pub(crate) async fn list_markets(
    client: &ProxyClient,
    currency: Currency,
    query: Option<String>,
) -> AnyResult<Vec<MarketQuote>, HfvCliError> {
    command_title!("Top assets in {currency}");

    let quotes = fetch("Fetching markets...", client.markets(currency)).await?;

    let quotes = filter_quotes(&quotes, query.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    json_output(&quotes)?;

    if !json_mode() {
        print!("{}", render_listing(&quotes));
    }

    Ok(quotes)
}

/// Renders the table with the favorites a fresh dashboard starts with.
fn render_listing(quotes: &[MarketQuote]) -> String {
    let favorites = AppState::default().favorites;

    render_markets(&ViewState::Ready(quotes.to_vec()), &favorites)
}
