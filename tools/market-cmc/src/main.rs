#![doc = include_str!("../README.md")]

use {clap::Parser, hfv_toolkit::bootstrap};

mod conf;
mod market;

#[tokio::main]
async fn main() {
    // Values already present in the environment win over `.env`.
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let conf = conf::ProxyConf::parse();

    let ctx = match conf.context() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("{e}");

            std::process::exit(1);
        }
    };

    bootstrap!(
        conf.listen,
        ctx,
        [
            market::cmc_coin::CmcCoin,
            market::cmc_exchanges::CmcExchanges,
            market::cmc_global::CmcGlobal,
            market::cmc_markets::CmcMarkets,
        ]
    );
}
