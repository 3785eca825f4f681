//! Command line and environment configuration of the proxy.

use {
    crate::market::CMC_API_BASE,
    anyhow::{bail, Result as AnyResult},
    clap::Parser,
    hfv_toolkit::{ApiKey, ProxyContext, UpstreamClient},
    std::net::SocketAddr,
};

#[derive(Debug, Parser)]
#[command(version, about = "HFV market-data proxy")]
pub(crate) struct ProxyConf {
    #[arg(
        long = "listen",
        env = "HFV_LISTEN",
        default_value = "127.0.0.1:8080",
        help = "Address to serve the proxy functions on",
        value_name = "ADDR"
    )]
    pub(crate) listen: SocketAddr,
    #[arg(
        long = "api-key",
        env = "CMC_API_KEY",
        hide_env_values = true,
        help = "CoinMarketCap Pro API key",
        value_name = "KEY"
    )]
    pub(crate) api_key: ApiKey,
    #[arg(
        long = "upstream-url",
        env = "CMC_API_BASE",
        default_value = CMC_API_BASE,
        help = "Base URL of the upstream API",
        value_name = "URL"
    )]
    pub(crate) upstream_url: String,
    #[arg(
        long = "normalize-errors",
        env = "HFV_NORMALIZE_ERRORS",
        help = "Answer upstream failures with a JSON error object instead of the raw body"
    )]
    pub(crate) normalize_errors: bool,
}

impl ProxyConf {
    /// Builds the shared request context. Fails when the API key is blank.
    pub(crate) fn context(&self) -> AnyResult<ProxyContext> {
        if self.api_key.is_empty() {
            bail!("CMC_API_KEY must not be empty");
        }

        let upstream = UpstreamClient::new(&self.upstream_url, self.api_key.clone());

        Ok(ProxyContext::new(upstream).with_normalized_errors(self.normalize_errors))
    }
}
