use {
    crate::{
        command_title,
        display::{fetch, json_mode, json_output},
        prelude::*,
        render::render_global,
    },
    hfv_sdk::{models::GlobalMetrics, ViewState},
};

/// Fetch and print the global market metrics.
pub(crate) async fn show_global(
    client: &ProxyClient,
    currency: Currency,
) -> AnyResult<GlobalMetrics, HfvCliError> {
    command_title!("Global market metrics in {currency}");

    let global = fetch("Fetching global metrics...", client.global(currency)).await?;

    json_output(&global)?;

    if !json_mode() {
        print!("{}", render_global(&ViewState::Ready(global.clone()), currency));
    }

    Ok(global)
}
