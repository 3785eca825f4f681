use {
    crate::{display::*, prelude::*},
    hfv_sdk::ProxyError,
    thiserror::Error,
};

/// Custom error definitions for the HFV CLI. Takes care of displaying
/// a pretty summary in the console.
#[derive(Debug, Error)]
pub(crate) enum HfvCliError {
    #[error("{error}{separator}\n{0}", error = "Syntax Error".red().bold(), separator = separator())]
    SyntaxError(clap::error::Error),
    #[error("{error}{separator}\n{0}", error = "IO Error".red().bold(), separator = separator())]
    IoError(std::io::Error),
    #[error("{error}{separator}\n{0}", error = "Proxy Error".red().bold(), separator = separator())]
    Proxy(#[from] ProxyError),
    #[error("{error}{separator}\n{0}", error = "Error".red().bold(), separator = separator())]
    Any(anyhow::Error),
}
