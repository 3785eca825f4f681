use crate::{
    command_title,
    display::{dim, json_output, Spinner},
    item,
    notify_success,
    prelude::*,
};

#[derive(Args, Clone, Debug)]
pub(crate) struct ConfCommand {
    #[arg(
        long = "proxy-url",
        help = "Set the proxy to fetch market data from",
        value_name = "URL"
    )]
    proxy_url: Option<String>,
    #[arg(
        long = "currency",
        help = "Set the default currency (USD, GBP, EUR)",
        value_name = "CURRENCY"
    )]
    currency: Option<Currency>,
    #[arg(
        long = "refresh-secs",
        help = "Set the seconds between dashboard refreshes, 0 disables them",
        value_name = "SECS"
    )]
    refresh_secs: Option<u64>,
}

/// Handle the provided conf command. The [ConfCommand] instance is passed from
/// [crate::main].
pub(crate) async fn handle(
    ConfCommand {
        proxy_url,
        currency,
        refresh_secs,
    }: ConfCommand,
    conf_path: PathBuf,
) -> AnyResult<CliConf, HfvCliError> {
    let mut conf = CliConf::load_or_default(&conf_path)
        .await
        .map_err(HfvCliError::Any)?;

    // If all fields are None, we just want to display the current configuration.
    if proxy_url.is_none() && currency.is_none() && refresh_secs.is_none() {
        command_title!("Current HFV CLI Configuration");

        item!("Proxy URL: {}", dim(&conf.proxy_url));
        item!("Currency: {}", dim(conf.currency.code()));
        item!("Refresh: {}", dim(&describe_refresh(conf.refresh_secs)));

        json_output(&conf)?;

        return Ok(conf);
    }

    command_title!("Updating HFV CLI Configuration");

    let spinner = Spinner::start("Updating configuration...");

    conf.proxy_url = proxy_url.unwrap_or(conf.proxy_url);
    conf.currency = currency.unwrap_or(conf.currency);
    conf.refresh_secs = refresh_secs.unwrap_or(conf.refresh_secs);

    if let Err(e) = conf.save(&conf_path).await {
        spinner.error().await;

        return Err(HfvCliError::Any(e));
    }

    spinner.success().await;

    notify_success!(
        "Configuration saved to {path}",
        path = dim(&conf_path.display().to_string())
    );

    json_output(&conf)?;

    Ok(conf)
}

fn describe_refresh(refresh_secs: u64) -> String {
    match refresh_secs {
        0 => "disabled".to_string(),
        secs => format!("every {secs}s"),
    }
}
