pub(crate) use {
    crate::error::HfvCliError,
    anyhow::{anyhow, Result as AnyResult},
    clap::{builder::ValueParser, Args, Parser, Subcommand},
    colored::Colorize,
    hfv_sdk::{Currency, ProxyClient, ProxyError},
    serde::{Deserialize, Serialize},
    std::{
        path::PathBuf,
        sync::atomic::{AtomicBool, Ordering},
    },
};

// Where to find config file.
pub(crate) const CLI_CONF_PATH: &str = "~/.hfv/conf.toml";

/// Set once by `--json`. Display macros stay silent and commands print their
/// result as JSON instead.
pub(crate) static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Struct holding the config structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CliConf {
    #[serde(default = "default_proxy_url")]
    pub(crate) proxy_url: String,
    #[serde(default)]
    pub(crate) currency: Currency,
    /// Seconds between background refreshes of the live dashboard. `0`
    /// disables them.
    #[serde(default = "default_refresh_secs")]
    pub(crate) refresh_secs: u64,
}

impl Default for CliConf {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            currency: Currency::default(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl CliConf {
    pub(crate) async fn load_from_path(path: &PathBuf) -> AnyResult<Self> {
        let conf = tokio::fs::read_to_string(path).await?;

        Ok(toml::from_str(&conf)?)
    }

    /// Like [`CliConf::load_from_path`] but a missing file yields the
    /// defaults. A file that exists and does not parse is still an error.
    pub(crate) async fn load_or_default(path: &PathBuf) -> AnyResult<Self> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }

        Self::load_from_path(path).await
    }

    pub(crate) async fn save(&self, path: &PathBuf) -> AnyResult<()> {
        let parent_folder = path
            .parent()
            .ok_or_else(|| anyhow!("Configuration path '{}' has no parent", path.display()))?;
        let conf = toml::to_string_pretty(&self)?;

        tokio::fs::create_dir_all(parent_folder).await?;
        tokio::fs::write(path, conf).await?;

        Ok(())
    }

    pub(crate) fn client(&self) -> ProxyClient {
        ProxyClient::new(&self.proxy_url)
    }
}

/// Options every command accepts.
#[derive(Args, Clone, Debug)]
pub(crate) struct GlobalArgs {
    #[arg(
        long = "proxy",
        env = "HFV_PROXY_URL",
        help = "Proxy to fetch market data from, overrides the configuration",
        value_name = "URL",
        global = true
    )]
    pub(crate) proxy: Option<String>,
    /// Hidden argument used for testing to set the path of the configuration
    /// file.
    #[arg(
        long = "conf-path",
        hide = true,
        global = true,
        default_value = CLI_CONF_PATH,
        value_parser = ValueParser::from(expand_tilde)
    )]
    pub(crate) conf_path: PathBuf,
}

impl GlobalArgs {
    /// Loads the configuration and applies command line overrides.
    pub(crate) async fn conf(&self) -> AnyResult<CliConf, HfvCliError> {
        let mut conf = CliConf::load_or_default(&self.conf_path)
            .await
            .map_err(|e| {
                HfvCliError::Any(anyhow!(
                    "Failed to load HFV CLI configuration from {}: {e}",
                    self.conf_path.display()
                ))
            })?;

        if let Some(proxy) = &self.proxy {
            conf.proxy_url = proxy.clone();
        }

        Ok(conf)
    }
}

// == Used by clap ==

/// Expands `~/` to the user's home directory in path arguments.
pub(crate) fn expand_tilde(path: &str) -> AnyResult<PathBuf> {
    if let Some(path) = path.strip_prefix("~/") {
        match home::home_dir() {
            Some(home) => return Ok(home.join(path)),
            None => return Err(anyhow!("Could not find home directory")),
        }
    }

    Ok(path.into())
}

// == Used by serde ==

fn default_proxy_url() -> String {
    hfv_sdk::proxy_client::DEFAULT_PROXY_URL.to_string()
}

fn default_refresh_secs() -> u64 {
    hfv_sdk::DEFAULT_REFRESH_INTERVAL.as_secs()
}
