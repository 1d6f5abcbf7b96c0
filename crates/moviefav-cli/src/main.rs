//! moviefav - search OMDb and keep a list of favourite movies.

/// Application configuration (TOML).
mod config;
/// Fixed-size page windows over lists.
mod pagination;
/// Query to result synchronization.
mod search;
/// Terminal UI components.
mod tui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_KEY_ENV, AppConfig, mask_key, resolve_config_path, resolve_log_path};
use crate::pagination::{PageNav, Paginator};
use crate::tui::run_browser;
use crate::tui::state::DUPLICATE_NOTICE;
use moviefav_api::omdb::{MovieSummary, OmdbApi, OmdbClient, SearchParams};
use moviefav_db::{AddOutcome, FavouritesStore, open_db};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse search results and favourites in the TUI.
    Browse,
    /// Run one OMDb search and print a page of results.
    Search(SearchArgs),
    /// Manage persisted favourites.
    Favourites(FavouritesCommand),
    /// Show or edit the configuration.
    Config(ConfigCommand),
    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search term.
    #[arg(long)]
    query: String,

    /// Page to print (1-based, 5 results per page).
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Restrict to one result type.
    #[arg(long = "type", value_parser = ["movie", "series", "episode"])]
    media_type: Option<String>,

    /// Restrict to a release year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `favourites` subcommand.
#[derive(clap::Args)]
struct FavouritesCommand {
    /// Favourites subcommand to run.
    #[command(subcommand)]
    command: FavouritesSubcommands,
}

/// Available favourites subcommands.
#[derive(Subcommand)]
enum FavouritesSubcommands {
    /// Print a page of favourites.
    List {
        /// Page to print (1-based, 5 favourites per page).
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Look a movie up and add it to favourites.
    Add {
        /// Search term the movie appears under.
        #[arg(long)]
        query: String,
        /// IMDb identifier of the movie to add.
        #[arg(long)]
        imdb_id: String,
    },
    /// Remove a movie from favourites.
    Remove {
        /// IMDb identifier of the movie to remove.
        #[arg(long)]
        imdb_id: String,
    },
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Store the OMDb API key.
    SetKey {
        /// API key.
        key: String,
    },
}

/// Builds an OMDb client from the config file and environment.
///
/// # Errors
///
/// Returns an error if no API key is available, `base_url` is invalid, or
/// the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(dir: Option<&PathBuf>) -> Result<OmdbClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let api_key = config
        .effective_api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!("OMDb API key is required: set {API_KEY_ENV} or run `moviefav config set-key`")
        })?;

    let mut builder = OmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(ref base_url) = config.omdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid omdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build OMDb client")
}

/// Opens the database and loads favourites.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or read.
fn load_favourites(dir: Option<&PathBuf>) -> Result<FavouritesStore> {
    let conn = open_db(dir).context("failed to open database")?;
    FavouritesStore::hydrate(conn).context("failed to load favourites")
}

/// Prints one page of `movies`.
///
/// # Errors
///
/// Returns an error if `page` is outside the list's page range.
fn print_page(movies: &[MovieSummary], page: usize) -> Result<()> {
    let mut pager = Paginator::default();
    let controls = pager.controls(movies.len());
    if !controls.pages().contains(&page) {
        bail!(
            "page {page} is out of range (1..={})",
            controls.total_pages
        );
    }
    pager.apply(PageNav::Jump(page), movies.len());

    tracing::info!(
        "Page {}/{} ({} entries, {} per page)",
        pager.current_page(),
        controls.total_pages,
        movies.len(),
        pager.page_size()
    );
    tracing::info!("imdbID\t\tYear\tType\tTitle");
    for movie in pager.slice(movies) {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.imdb_id,
            movie.year,
            movie.media_type.as_deref().unwrap_or("-"),
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client, database, or TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let client = build_omdb_client(dir)?;
    let favourites = load_favourites(dir)?;

    tracing::info!(favourites = favourites.len(), "launching browser");
    run_browser(Arc::new(client), favourites)
        .await
        .context("movie browser TUI failed")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build, the request fails, or the
/// page is out of range.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_omdb_client(dir)?;

    let mut params = SearchParams::new(&args.query);
    if let Some(ref media_type) = args.media_type {
        params = params.media_type(media_type);
    }
    if let Some(year) = args.year {
        params = params.year(year);
    }

    let response = client
        .search(&params)
        .await
        .context("OMDb search request failed")?;

    let Some(movies) = response.search.as_ref().filter(|list| !list.is_empty()) else {
        tracing::info!(
            "No results: {}",
            response.error.as_deref().unwrap_or("nothing matched")
        );
        return Ok(());
    };

    if let Some(total) = response.total_results() {
        tracing::info!("Total matches on OMDb: {total}");
    }
    print_page(movies, args.page)
}

/// Runs the `favourites list` subcommand.
///
/// # Errors
///
/// Returns an error if the database fails or the page is out of range.
#[instrument(skip_all)]
fn run_favourites_list(page: usize, dir: Option<&PathBuf>) -> Result<()> {
    let store = load_favourites(dir)?;

    if store.is_empty() {
        tracing::info!("No favourites yet.");
        return Ok(());
    }

    print_page(store.items(), page)
}

/// Runs the `favourites add` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails, the movie is not among the results,
/// it is already a favourite, or the write fails.
#[instrument(skip_all)]
async fn run_favourites_add(query: &str, imdb_id: &str, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_omdb_client(dir)?;
    let mut store = load_favourites(dir)?;

    let response = client
        .search(&SearchParams::new(query))
        .await
        .context("OMDb search request failed")?;

    let movie = response
        .search
        .unwrap_or_default()
        .into_iter()
        .find(|m| m.imdb_id == imdb_id)
        .with_context(|| format!("{imdb_id} is not among the results for \"{query}\""))?;

    let title = movie.title.clone();
    match store.add(movie).context("failed to save favourites")? {
        AddOutcome::Added => {
            tracing::info!("Added {imdb_id} {title} ({} favourites)", store.len());
            Ok(())
        }
        AddOutcome::Duplicate => bail!(DUPLICATE_NOTICE),
    }
}

/// Runs the `favourites remove` subcommand.
///
/// # Errors
///
/// Returns an error if the database fails.
#[instrument(skip_all)]
fn run_favourites_remove(imdb_id: &str, dir: Option<&PathBuf>) -> Result<()> {
    let mut store = load_favourites(dir)?;

    let removed = store
        .remove(imdb_id)
        .context("failed to save favourites")?;
    if removed == 0 {
        tracing::info!("{imdb_id} is not in favourites.");
    } else {
        tracing::info!("Removed {imdb_id} ({} favourites)", store.len());
    }

    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let env_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let source = if env_key.is_some() {
        API_KEY_ENV
    } else {
        "config"
    };

    tracing::info!("Config file: {}", config_path.display());
    match config.effective_api_key(env_key) {
        Some(key) => tracing::info!("API key: {} (from {source})", mask_key(&key)),
        None => tracing::info!("API key: (not set)"),
    }
    tracing::info!(
        "Base URL: {}",
        config
            .omdb
            .base_url
            .as_deref()
            .unwrap_or(moviefav_api::omdb::DEFAULT_BASE_URL)
    );

    Ok(())
}

/// Runs the `config set-key` subcommand.
///
/// # Errors
///
/// Returns an error if the key is blank or the config cannot be written.
#[instrument(skip_all)]
fn run_config_set_key(key: &str, dir: Option<&PathBuf>) -> Result<()> {
    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    config.omdb.api_key = Some(String::from(key.trim()));
    config.save(&config_path).context("failed to save config")?;

    tracing::info!("API key saved to {}", config_path.display());
    Ok(())
}

/// Writes the completion script for `shell` to stdout.
fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = String::from(cmd.get_name());
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Opens the TUI log file in append mode.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be opened.
fn open_log_file(dir: Option<&PathBuf>) -> Result<File> {
    let path = resolve_log_path(dir).context("failed to resolve log path")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Installs the global subscriber. Logs go to `log_file` when given,
/// otherwise to stdout.
fn init_tracing(log_file: Option<File>) {
    let ansi = log_file.is_none();
    let writer = log_file.map_or_else(
        || BoxMakeWriter::new(std::io::stdout),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_ref();

    // The TUI owns the terminal, so its logs go to a file.
    let log_file = if matches!(cli.command, Commands::Browse) {
        Some(open_log_file(dir)?)
    } else {
        None
    };
    init_tracing(log_file);

    match cli.command {
        Commands::Browse => run_browse(dir).await,
        Commands::Search(ref args) => run_search(args, dir).await,
        Commands::Favourites(ref fav) => match fav.command {
            FavouritesSubcommands::List { page } => run_favourites_list(page, dir),
            FavouritesSubcommands::Add {
                ref query,
                ref imdb_id,
            } => run_favourites_add(query, imdb_id, dir).await,
            FavouritesSubcommands::Remove { ref imdb_id } => run_favourites_remove(imdb_id, dir),
        },
        Commands::Config(ref cfg) => match cfg.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::SetKey { ref key } => run_config_set_key(key, dir),
        },
        Commands::Completions { shell } => {
            run_completions(shell);
            Ok(())
        }
    }
}
