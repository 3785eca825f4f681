//! `hfv watch`: the live dashboard.
//!
//! The screen is redrawn whenever a view changes. Commands are read line by
//! line from stdin and turned into [`AppAction`]s for the [`Dashboard`].

use {
    crate::{
        display::{dim, json_mode},
        notify_error,
        prelude::*,
        render::render_dashboard,
    },
    hfv_sdk::{
        models::{CoinDetail, ExchangeListing, GlobalMetrics, MarketQuote},
        AppAction,
        AppState,
        BottomTab,
        Dashboard,
        MarketTab,
        Page,
        SelectedCoin,
        ViewState,
    },
    std::{io::Write, time::Duration},
    tokio::io::{AsyncBufReadExt, BufReader},
};

const HELP: &str = "\
market | portfolio | search | explore | profile   switch page
crypto | categories | nft | exchanges             switch market tab
usd | gbp | eur                                   switch currency
/<text>                                           search markets, `/` clears
open <SYMBOL> | close                             coin detail
fav <SYMBOL>                                      toggle favorite
r                                                 refresh now
q                                                 quit";

/// One line of user input.
#[derive(Debug, PartialEq)]
pub(crate) enum Input {
    Action(AppAction),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// What `--json` prints on every change.
#[derive(Serialize)]
struct Frame<'a> {
    page: Page,
    currency: Currency,
    query: &'a str,
    favorites: Vec<&'a str>,
    global: ViewState<GlobalMetrics>,
    markets: ViewState<Vec<MarketQuote>>,
    exchanges: ViewState<Vec<ExchangeListing>>,
    detail: Option<(&'a SelectedCoin, ViewState<CoinDetail>)>,
}

pub(crate) async fn watch(conf: CliConf) -> AnyResult<(), HfvCliError> {
    let refresh = (conf.refresh_secs > 0).then(|| Duration::from_secs(conf.refresh_secs));

    let state = AppState {
        currency: conf.currency,
        ..AppState::default()
    };

    let mut dashboard = Dashboard::new(conf.client(), state, refresh);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut show_help = false;

    draw(&dashboard, show_help)?;

    loop {
        let line = tokio::select! {
            _ = dashboard.changed() => None,
            line = lines.next_line() => match line.map_err(HfvCliError::IoError)? {
                Some(line) => Some(line),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        if let Some(line) = line {
            let listing = dashboard.markets();

            match parse_input(&line, listing.ready().map(Vec::as_slice)) {
                Input::Action(action) => dashboard.dispatch(action),
                Input::Help => show_help = !show_help,
                Input::Quit => break,
                Input::Empty => {}
                Input::Unknown(command) => {
                    notify_error!("Unknown command '{command}', type `help`");

                    continue;
                }
            }
        }

        draw(&dashboard, show_help)?;
    }

    Ok(())
}

fn draw(dashboard: &Dashboard, show_help: bool) -> AnyResult<(), HfvCliError> {
    let mut stdout = std::io::stdout().lock();

    if json_mode() {
        let state = dashboard.state();
        let frame = Frame {
            page: dashboard.page(),
            currency: state.currency,
            query: &state.query,
            favorites: state.favorites.iter().collect(),
            global: dashboard.global(),
            markets: dashboard.markets(),
            exchanges: dashboard.exchanges(),
            detail: dashboard.detail(),
        };

        let json = serde_json::to_string(&frame).map_err(|e| HfvCliError::Any(e.into()))?;

        return writeln!(stdout, "{json}").map_err(HfvCliError::IoError);
    }

    // Clear the screen and move the cursor home.
    let mut screen = String::from("\x1B[2J\x1B[H");

    screen.push_str(&render_dashboard(dashboard));

    if show_help {
        screen.push_str(&format!("\n{HELP}\n"));
    } else {
        screen.push_str(&format!("{}\n", dim("Type `help` for commands.")));
    }

    write!(stdout, "{screen}")
        .and_then(|_| stdout.flush())
        .map_err(HfvCliError::IoError)
}

/// Parses one command line. `listing` is the loaded markets listing, used to
/// find the display name of a coin being opened.
pub(crate) fn parse_input(line: &str, listing: Option<&[MarketQuote]>) -> Input {
    // The search text is kept verbatim.
    if let Some(query) = line.trim_start().strip_prefix('/') {
        return Input::Action(AppAction::SetQuery(query.to_string()));
    }

    let mut words = line.split_whitespace();

    let Some(command) = words.next() else {
        return Input::Empty;
    };

    let argument = words.next().map(str::to_uppercase);

    let action = match (command.to_lowercase().as_str(), argument) {
        ("q" | "quit" | "exit", _) => return Input::Quit,
        ("h" | "help" | "?", _) => return Input::Help,
        ("r" | "refresh", _) => AppAction::Refresh,
        ("market", _) => AppAction::ShowBottom(BottomTab::Market),
        ("portfolio", _) => AppAction::ShowBottom(BottomTab::Portfolio),
        ("search", _) => AppAction::ShowBottom(BottomTab::Search),
        ("explore", _) => AppAction::ShowBottom(BottomTab::Explore),
        ("profile", _) => AppAction::ShowBottom(BottomTab::Profile),
        ("crypto", _) => AppAction::ShowMarketTab(MarketTab::Crypto),
        ("categories", _) => AppAction::ShowMarketTab(MarketTab::Categories),
        ("nft", _) => AppAction::ShowMarketTab(MarketTab::Nft),
        ("exchanges", _) => AppAction::ShowMarketTab(MarketTab::Exchanges),
        ("close", _) => AppAction::CloseDetail,
        ("fav", Some(symbol)) => AppAction::ToggleFavorite(symbol),
        ("open", Some(symbol)) => {
            let name = listing
                .and_then(|quotes| quotes.iter().find(|quote| quote.symbol == symbol))
                .map(|quote| quote.name.clone())
                .unwrap_or_else(|| symbol.clone());

            AppAction::SelectCoin(SelectedCoin { symbol, name })
        }
        (other, _) => match other.parse::<Currency>() {
            Ok(currency) => AppAction::SetCurrency(currency),
            Err(_) => return Input::Unknown(line.trim().to_string()),
        },
    };

    Input::Action(action)
}
