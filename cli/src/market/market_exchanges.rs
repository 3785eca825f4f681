use {
    crate::{
        command_title,
        display::{fetch, json_mode, json_output},
        prelude::*,
        render::render_exchanges,
    },
    hfv_sdk::{models::ExchangeListing, ViewState},
};

/// Fetch and print the exchange listing.
pub(crate) async fn list_exchanges(
    client: &ProxyClient,
) -> AnyResult<Vec<ExchangeListing>, HfvCliError> {
    command_title!("Exchanges");

    let exchanges = fetch("Fetching exchanges...", client.exchanges()).await?;

    json_output(&exchanges)?;

    if !json_mode() {
        print!("{}", render_exchanges(&ViewState::Ready(exchanges.clone())));
    }

    Ok(exchanges)
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[tokio::test]
    async fn test_rate_limited_listing_is_an_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/cmc-exchanges")
            .with_status(503)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = ProxyClient::new(&server.url());
        let error = list_exchanges(&client).await.unwrap_err();

        assert_matches!(&error, HfvCliError::Proxy(_));
        assert!(error.to_string().ends_with("503 rate limited"));
    }
}
