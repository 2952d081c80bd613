use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use teloxide::Bot;

use clima_bot::{
    ClimaConfig, CityResolver, CityStore, CptecClient, CptecTodayScraper, ForecastFetcher,
    LookupTableBuilder, ReplyService, bot, cptec, logging,
};

#[derive(Debug, Parser)]
#[command(name = "clima-bot", version, about = "CPTEC weather forecasts on Telegram")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer chat messages (default)
    Serve,
    /// Populate the city lookup table from the reference list, then exit
    Build,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        tracing::error!("{error:#}");
        eprintln!("clima-bot error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ClimaConfig::load_from_path(cli.config)?;
    logging::init(&config.logging)?;

    let store = Arc::new(
        CityStore::open(&config.store.path)
            .with_context(|| format!("Failed to open city store at {}", config.store.path))?,
    );
    let http = cptec::http_client(&config.cptec)?;
    let client = CptecClient::new(http.clone(), &config.cptec);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Build => {
            let report = LookupTableBuilder::new(client, store)
                .run()
                .await
                .context("Lookup table build aborted")?;
            println!(
                "Queried {} names, inserted {} cities",
                report.names_processed, report.cities_inserted
            );
        }
        Command::Serve => {
            let token = config.telegram_token()?;
            let resolver =
                CityResolver::new(store).with_normalized_input(config.lookup.normalize_input);
            let fetcher =
                ForecastFetcher::new(client, CptecTodayScraper::new(http, &config.cptec));
            let service = Arc::new(ReplyService::new(resolver, fetcher));

            let poll_timeout = Duration::from_secs(config.telegram.poll_timeout_seconds.into());
            bot::run(Bot::new(token), service, poll_timeout)
                .await
                .context("Telegram bot stopped")?;
        }
    }

    Ok(())
}
