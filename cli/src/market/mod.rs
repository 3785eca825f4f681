mod market_coin;
mod market_exchanges;
mod market_global;
mod market_list;

use {
    crate::prelude::*,
    market_coin::*,
    market_exchanges::*,
    market_global::*,
    market_list::*,
};

#[derive(Subcommand)]
pub(crate) enum MarketCommand {
    #[command(about = "List the top 100 assets by rank")]
    List {
        #[arg(
            long = "currency",
            short = 'c',
            help = "Currency to quote in (USD, GBP, EUR), defaults to the configured one",
            value_name = "CURRENCY"
        )]
        currency: Option<Currency>,
        /// Only keep assets whose name or symbol contains this text.
        #[arg(
            long = "query",
            short = 'q',
            help = "Filter by name or symbol, case-insensitive",
            value_name = "TEXT"
        )]
        query: Option<String>,
    },

    #[command(about = "Show global market metrics")]
    Global {
        #[arg(
            long = "currency",
            short = 'c',
            help = "Currency to quote in (USD, GBP, EUR), defaults to the configured one",
            value_name = "CURRENCY"
        )]
        currency: Option<Currency>,
    },

    #[command(about = "List exchanges with their 24h volume in USD")]
    Exchanges,

    #[command(about = "Show the latest quote and links of one asset")]
    Coin {
        #[arg(help = "Asset symbol, e.g. BTC", value_name = "SYMBOL")]
        symbol: String,
        #[arg(
            long = "currency",
            short = 'c',
            help = "Currency to quote in (USD, GBP, EUR), defaults to the configured one",
            value_name = "CURRENCY"
        )]
        currency: Option<Currency>,
    },
}

/// Handle the provided market command. The [MarketCommand] instance is passed
/// from [crate::main].
pub(crate) async fn handle(command: MarketCommand, conf: CliConf) -> AnyResult<(), HfvCliError> {
    let client = conf.client();

    match command {
        // == `$ hfv market list` ==
        MarketCommand::List { currency, query } => {
            list_markets(&client, currency.unwrap_or(conf.currency), query)
                .await
                .map(|_| ())
        }

        // == `$ hfv market global` ==
        MarketCommand::Global { currency } => {
            show_global(&client, currency.unwrap_or(conf.currency))
                .await
                .map(|_| ())
        }

        // == `$ hfv market exchanges` ==
        MarketCommand::Exchanges => list_exchanges(&client).await.map(|_| ()),

        // == `$ hfv market coin` ==
        MarketCommand::Coin { symbol, currency } => {
            show_coin(&client, &symbol, currency.unwrap_or(conf.currency))
                .await
                .map(|_| ())
        }
    }
}
