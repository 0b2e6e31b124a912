use std::{process::exit, time::Duration};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use console::Term;
use dialoguer::Input;
use indicatif::ProgressStyle;
use reqwest::Client;
use sptfybrowse::{
    config::{Config, DEFAULT_TIMEOUT, SpotifyOauth},
    http, render,
    spotify::{CredentialStore, Error, HomeFeed, SearchResults, SpotifyApi},
    tab::ActiveTab,
};
use tracing::{Instrument, Level, debug, info_span, warn};
use tracing_indicatif::{IndicatifLayer, span_ext::IndicatifSpanExt};
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Be a bit more verbose. Can be applied more than once (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Skip prompts. Fail instead of asking for credentials.
    #[arg(short, long, global = true)]
    no_interaction: bool,

    /// Seconds to wait for each request.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show categories, popular artists and new releases.
    Home {
        #[arg(long, value_enum, default_value_t = ActiveTab::All)]
        tab: ActiveTab,
    },
    /// Search albums, artists and playlists. Asks for queries if none is given.
    Search { query: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        2..=u8::MAX => Level::TRACE,
    };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .compact()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(Targets::new().with_target("sptfybrowse", filter))
        .with(indicatif_layer)
        .init();

    std::panic::set_hook(Box::new(tracing_panic::panic_hook));
    ctrlc::set_handler(handle_exit)?;

    let oauth = SpotifyOauth::resolve(args.no_interaction)?;
    let config = Config::new(oauth, Duration::from_secs(args.timeout));
    debug!("{config:?}");

    let client = http::client(config.request_timeout)?;
    let api = SpotifyApi::new(
        &client,
        &config.endpoints,
        CredentialStore::global(),
        config.request_timeout,
    );

    api.acquire(&config.oauth)
        .await
        .context("requesting spotify access token")?;

    match args.command {
        Command::Home { tab } => home(&api, tab).await,
        Command::Search { query: Some(query) } => {
            let mut results = SearchResults::default();
            search(&api, &mut results, &query).await;
            Ok(())
        }
        Command::Search { query: None } => search_interactive(&api, args.no_interaction).await,
    }
}

async fn home(api: &SpotifyApi<'_, Client>, tab: ActiveTab) -> anyhow::Result<()> {
    let span = info_span!("home");
    span.pb_set_style(&ProgressStyle::default_spinner());
    span.pb_set_message("fetching catalog");

    let mut feed = HomeFeed::default();
    api.refresh_home(&mut feed)
        .instrument(span)
        .await
        .context("fetching home feed")?;

    print!("{}", render::home(&feed, tab));

    if !feed.errors.is_empty() {
        warn!("{} sections failed to load", feed.errors.len());
    }

    Ok(())
}

async fn search(api: &SpotifyApi<'_, Client>, results: &mut SearchResults, query: &str) {
    let span = info_span!("search");
    span.pb_set_style(&ProgressStyle::default_spinner());
    span.pb_set_message("searching");

    match api.submit(results, query).instrument(span).await {
        Err(Error::EmptyQuery) => {
            warn!("nothing to search for");
            return;
        }
        Err(Error::NotReady) => {
            warn!("no access token, not searching");
            return;
        }
        // other failures are shown with the results
        Ok(()) | Err(_) => {}
    }

    print!("{}", render::search(results));
}

/// Each line entered is one search. An empty line stops.
async fn search_interactive(
    api: &SpotifyApi<'_, Client>,
    no_interaction: bool,
) -> anyhow::Result<()> {
    if no_interaction {
        return Err(anyhow::anyhow!(
            "no query given and --no-interaction was set."
        ));
    }

    let mut results = SearchResults::default();

    loop {
        let query: String = Input::new()
            .with_prompt("search artists, albums, playlists")
            .allow_empty(true)
            .interact_text()?;

        if query.trim().is_empty() {
            return Ok(());
        }

        search(api, &mut results, &query).await;
    }
}

fn handle_exit() {
    let term = Term::stdout();
    if let Err(err) = term.show_cursor() {
        warn!("failed to show cursor: {err}");
    }
    exit(1);
}
