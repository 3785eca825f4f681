mod conf;
mod display;
mod error;
mod market;
mod prelude;
mod render;
mod watch;

use crate::prelude::*;

#[derive(Parser)]
#[command(version, about = "HFV CLI")]
struct Cli {
    #[arg(
        long = "json",
        help = "Print results as JSON instead of formatted text",
        global = true
    )]
    json: bool,
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand, about = "Query market data once")]
    Market(market::MarketCommand),
    #[command(about = "Open the live market dashboard")]
    Watch,
    #[command(about = "Show or update the HFV CLI configuration")]
    Conf(conf::ConfCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with `--json` output.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Customize parsing error handling.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // These 2 are "not real errors" that are used to stop the execution
            // to display the CLI help or version.
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    println!("{}", e);

                    std::process::exit(0);
                }
                _ => (),
            }

            eprintln!(
                "{ballot} {error}",
                ballot = "✘".red().bold(),
                error = HfvCliError::SyntaxError(e)
            );

            std::process::exit(1);
        }
    };

    JSON_MODE.store(cli.json, Ordering::Relaxed);

    // Send each sub-command to the respective handler.
    let result = run(cli).await;

    // Handle any errors that occurred during command execution.
    if let Err(e) = result {
        eprintln!("{ballot} {e}", ballot = "✘".red().bold());

        std::process::exit(1);
    }
}

async fn run(Cli { global, command, .. }: Cli) -> AnyResult<(), HfvCliError> {
    match command {
        Command::Market(market) => market::handle(market, global.conf().await?).await,
        Command::Watch => {
            let conf = global.conf().await?;

            log::debug!(
                "Watching markets through '{}' in {}",
                conf.proxy_url,
                conf.currency
            );

            watch::watch(conf).await
        }
        // The conf command edits the file itself so `--proxy` does not apply.
        Command::Conf(conf) => conf::handle(conf, global.conf_path).await.map(|_| ()),
    }
}
