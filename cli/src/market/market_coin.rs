use {
    crate::{
        command_title,
        display::{fetch, json_mode, json_output},
        prelude::*,
        render::render_detail,
    },
    hfv_sdk::{models::CoinDetail, SelectedCoin, ViewState},
};

/// Fetch and print one asset. The symbol is upper-cased first.
pub(crate) async fn show_coin(
    client: &ProxyClient,
    symbol: &str,
    currency: Currency,
) -> AnyResult<CoinDetail, HfvCliError> {
    let symbol = symbol.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(HfvCliError::Any(anyhow!("Symbol must not be empty")));
    }

    command_title!("{symbol} in {currency}");

    let detail = fetch(&format!("Fetching {symbol}..."), client.coin(&symbol, currency)).await?;

    json_output(&detail)?;

    if !json_mode() {
        let coin = SelectedCoin {
            name: symbol.clone(),
            symbol,
        };

        print!(
            "{}",
            render_detail(&coin, &ViewState::Ready(detail.clone()))
        );
    }

    Ok(detail)
}
