use clap::Parser;
use tracing_subscriber::EnvFilter;

use tubetrack::bot::Bot;
use tubetrack::cli::{Cli, Commands};
use tubetrack::config::Config;
use tubetrack::errors::{TrackerError, TrackerResult};
use tubetrack::poller::FeedPoller;
use tubetrack::report;
use tubetrack::resolver::ChannelResolver;
use tubetrack::services::{PollService, RegistrationService};
use tubetrack::storage::{ChannelRepository, JsonRegistryStore};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> TrackerResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let store = JsonRegistryStore::new(&config.store_path);

    match cli.command {
        Commands::Add { url, alias, force } => cmd_add(&url, alias.as_deref(), force, store),
        Commands::Fetch { alias } => cmd_fetch(alias.as_deref(), store),
        Commands::List => cmd_list(store),
        Commands::Run => cmd_run(&config, store),
    }
}

fn cmd_add(
    url: &str,
    alias: Option<&str>,
    force: bool,
    store: JsonRegistryStore,
) -> TrackerResult<()> {
    let service = RegistrationService::new(store, ChannelResolver::new());

    println!("Resolving channel: {}", url);

    match service.register(url, alias, force) {
        Ok(alias) => {
            println!("Added channel with alias {} successfully!", alias);
            Ok(())
        }
        Err(TrackerError::DuplicateAlias(alias)) => {
            println!("Alias '{}' already exists. Pass --force to overwrite.", alias);
            Ok(())
        }
        Err(TrackerError::DuplicateChannel(alias)) => {
            println!("Channel already tracked under alias '{}'.", alias);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_fetch(alias: Option<&str>, store: JsonRegistryStore) -> TrackerResult<()> {
    let service = PollService::new(store, FeedPoller::new());

    println!("Checking feeds...\n");

    let results = service.check(alias)?;

    if results.is_empty() {
        println!("No channels tracked.");
        return Ok(());
    }

    println!("{}", report::render(&results));

    Ok(())
}

fn cmd_list(store: JsonRegistryStore) -> TrackerResult<()> {
    let channels = store.all_channels()?;

    if channels.is_empty() {
        println!("No channels tracked.");
        return Ok(());
    }

    println!("Tracked channels:\n");
    for (alias, channel_name) in channels {
        println!("  {} [{}]", alias, channel_name);
    }

    Ok(())
}

fn cmd_run(config: &Config, store: JsonRegistryStore) -> TrackerResult<()> {
    let api = botapi::BotApi::with_api_url(&config.api_url, &config.bot_token)
        .map_err(TrackerError::from)?;

    let registration = RegistrationService::new(store.clone(), ChannelResolver::new());
    let polling = PollService::new(store, FeedPoller::new());

    Bot::new(api, registration, polling).run()
}
