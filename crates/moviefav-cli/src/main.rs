//! moviefav - terminal movie search and favorites manager backed by OMDB.

/// Application state controller.
mod app;
/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use moviefav_api::omdb::{LocalMovieApi, MovieDetail, OmdbClient};
use moviefav_store::{KeyValueStore, SqliteStore, open_store};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::App;
use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Write logs to this file (the TUI logs nothing otherwise).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Subcommand to run (default: `tui`).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive terminal UI.
    Tui,
    /// Search OMDB by title.
    Search(SearchArgs),
    /// Show the full record of an IMDb id.
    Details(DetailsArgs),
    /// Manage saved favorites.
    Favorites(FavoritesCommand),
    /// Show or toggle the colour theme.
    Theme(ThemeCommand),
    /// Manage the configuration file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for (e.g. "Inception").
    term: String,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb id (e.g. "tt1375666").
    id: String,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List saved favorites.
    List,
    /// Look up an IMDb id and save it.
    Add(DetailsArgs),
    /// Remove a saved favorite.
    Remove(DetailsArgs),
    /// Remove every favorite.
    Clear(ClearArgs),
}

/// Arguments for the `favorites clear` subcommand.
#[derive(clap::Args)]
struct ClearArgs {
    /// Confirm removal of all favorites.
    #[arg(long)]
    yes: bool,
}

/// Arguments for the `theme` subcommand.
#[derive(clap::Args)]
struct ThemeCommand {
    /// Theme subcommand to run (default: show).
    #[command(subcommand)]
    command: Option<ThemeSubcommands>,
}

/// Available theme subcommands.
#[derive(Subcommand)]
enum ThemeSubcommands {
    /// Switch between light and dark.
    Toggle,
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
    /// Store the OMDB API key in config.toml.
    SetApiKey(SetApiKeyArgs),
    /// Show the config file location and whether a key is configured.
    Show,
}

/// Arguments for the `config set-api-key` subcommand.
#[derive(clap::Args)]
struct SetApiKeyArgs {
    /// OMDB API key.
    key: String,
}

/// Builds the OMDB client from config and the environment.
///
/// Returns `None` when no usable key or endpoint is configured, so the
/// caller can run without API access.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Option<OmdbClient> {
    let Some(api_key) = config
        .omdb
        .effective_api_key(std::env::var(API_KEY_ENV).ok())
    else {
        tracing::warn!("No OMDB API key configured; searches are disabled");
        return None;
    };

    let mut builder = OmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    match config.omdb.base_url() {
        Ok(Some(base_url)) => builder = builder.base_url(base_url),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Invalid OMDB endpoint; searches are disabled");
            return None;
        }
    }

    match builder.build() {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "OMDB client unavailable; searches are disabled");
            None
        }
    }
}

/// Loads config, opens the store and constructs the controller.
///
/// # Errors
///
/// Returns an error if the config cannot be parsed or the database cannot
/// be opened.
fn build_app(dir: Option<&PathBuf>) -> Result<App<OmdbClient, SqliteStore>> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let api = build_omdb_client(&config);
    let store = open_store(dir).context("failed to open database")?;
    Ok(App::new(api, store))
}

/// Turns the controller's error banner into a command failure.
fn check_error<A: LocalMovieApi, S: KeyValueStore>(app: &App<A, S>) -> Result<()> {
    if let Some(message) = &app.session().error_message {
        bail!("{message}");
    }
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the search fails validation or the request fails.
#[instrument(skip_all)]
async fn run_search<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    args: &SearchArgs,
) -> Result<()> {
    app.request_search(&args.term).await;
    check_error(app)?;

    let session = app.session();
    tracing::info!(
        "Search results for \"{}\" ({} found)",
        session.search_term,
        session.search_results.len()
    );
    tracing::info!("Fav\timdbID\t\tYear\tType\tTitle");
    for movie in &session.search_results {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            if app.is_favorite(&movie.imdb_id) { "*" } else { "" },
            movie.imdb_id,
            movie.year,
            movie.media_type,
            movie.title,
        );
    }
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_details<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    args: &DetailsArgs,
) -> Result<()> {
    app.request_details(&args.id).await;
    check_error(app)?;

    if let Some(movie) = &app.session().selected_movie {
        log_detail(movie, app.is_favorite(&movie.imdb_id));
    }
    Ok(())
}

/// Logs the present fields of a detail record.
fn log_detail(movie: &MovieDetail, is_favorite: bool) {
    tracing::info!("{} ({}) [{}]", movie.title, movie.year, movie.media_type.label());
    let fields = [
        ("Rated", &movie.rated),
        ("Released", &movie.released),
        ("Runtime", &movie.runtime),
        ("Genre", &movie.genre),
        ("Director", &movie.director),
        ("Writer", &movie.writer),
        ("Actors", &movie.actors),
        ("Plot", &movie.plot),
        ("Language", &movie.language),
        ("Country", &movie.country),
        ("Awards", &movie.awards),
        ("IMDb", &movie.imdb_rating),
        ("Votes", &movie.imdb_votes),
        ("Metascore", &movie.metascore),
        ("Box Office", &movie.box_office),
        ("Seasons", &movie.total_seasons),
        ("Poster", &movie.poster),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            tracing::info!("  {name}: {value}");
        }
    }
    if let Some(tomatoes) = movie.rotten_tomatoes() {
        tracing::info!("  Rotten Tomatoes: {tomatoes}");
    }
    tracing::info!("  Favorite: {}", if is_favorite { "yes" } else { "no" });
}

/// Runs the `favorites list` subcommand.
#[instrument(skip_all)]
fn run_favorites_list<A: LocalMovieApi, S: KeyValueStore>(app: &App<A, S>) {
    let favorites = app.favorites();
    if favorites.is_empty() {
        tracing::info!("No favorite movies yet.");
        return;
    }

    tracing::info!("Favorites ({}):", favorites.len());
    tracing::info!("imdbID\t\tYear\tType\tTitle");
    for movie in favorites {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.imdb_id,
            movie.year,
            movie.media_type,
            movie.title
        );
    }
}

/// Runs the `favorites add` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails.
#[instrument(skip_all)]
async fn run_favorites_add<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    args: &DetailsArgs,
) -> Result<()> {
    let id = args.id.trim();
    if app.is_favorite(id) {
        tracing::info!("{id} is already in favorites");
        return Ok(());
    }

    app.request_details(id).await;
    check_error(app)?;
    app.toggle_selected_favorite();

    if let Some(movie) = &app.session().selected_movie {
        tracing::info!("Added {} ({}) to favorites", movie.title, movie.year);
    }
    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if `id` is not a saved favorite.
#[instrument(skip_all)]
fn run_favorites_remove<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    args: &DetailsArgs,
) -> Result<()> {
    let id = args.id.trim();
    let Some(movie) = app.favorites().iter().find(|m| m.imdb_id == id).cloned() else {
        bail!("{id} is not in favorites");
    };

    app.toggle_favorite(&movie);
    tracing::info!("Removed {} ({}) from favorites", movie.title, movie.year);
    Ok(())
}

/// Runs the `favorites clear` subcommand.
///
/// # Errors
///
/// Returns an error if `--yes` was not given.
#[instrument(skip_all)]
fn run_favorites_clear<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    args: &ClearArgs,
) -> Result<()> {
    if !args.yes {
        bail!("refusing to remove all favorites without --yes");
    }
    let removed = app.clear_favorites();
    tracing::info!("Removed {removed} favorite(s)");
    Ok(())
}

/// Runs the `theme` subcommand.
#[instrument(skip_all)]
fn run_theme<A: LocalMovieApi, S: KeyValueStore>(app: &mut App<A, S>, cmd: &ThemeCommand) {
    let is_dark_mode = match cmd.command {
        Some(ThemeSubcommands::Toggle) => app.toggle_theme(),
        None => app.session().is_dark_mode,
    };
    tracing::info!("Theme: {}", if is_dark_mode { "dark" } else { "light" });
}

/// Runs the `config set-api-key` subcommand.
///
/// # Errors
///
/// Returns an error if the key is blank or the config cannot be written.
#[instrument(skip_all)]
fn run_config_set_api_key(dir: Option<&PathBuf>, args: &SetApiKeyArgs) -> Result<()> {
    let key = args.key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    config.omdb.api_key = Some(String::from(key));
    config.save(&config_path).context("failed to save config")?;

    tracing::info!("Saved API key to {}", config_path.display());
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

    let source = if std::env::var(API_KEY_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        API_KEY_ENV
    } else if config.omdb.effective_api_key(None).is_some() {
        "config.toml"
    } else {
        "not configured"
    };
    tracing::info!("Config file: {}", config_path.display());
    tracing::info!("API key: {source}");
    tracing::info!(
        "Base URL: {}",
        config
            .omdb
            .base_url
            .as_deref()
            .unwrap_or("http://www.omdbapi.com/ (default)")
    );
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// With `log_file`, output goes to that file without ANSI colours. The
/// interactive UI otherwise logs nothing so the screen stays intact.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let (writer, ansi, default_filter) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false, "info")
        }
        None if interactive => (BoxMakeWriter::new(io::sink), false, "off"),
        None => (BoxMakeWriter::new(io::stdout), true, "info"),
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
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

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if setup or subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    init_tracing(cli.log_file.as_deref(), matches!(command, Commands::Tui))?;
    let dir = cli.dir.as_ref();

    match command {
        Commands::Tui => {
            let mut app = build_app(dir)?;
            tui::run_app(&mut app).await.context("TUI failed")
        }
        Commands::Search(args) => run_search(&mut build_app(dir)?, &args).await,
        Commands::Details(args) => run_details(&mut build_app(dir)?, &args).await,
        Commands::Favorites(fav) => {
            let mut app = build_app(dir)?;
            match fav.command {
                FavoritesSubcommands::List => {
                    run_favorites_list(&app);
                    Ok(())
                }
                FavoritesSubcommands::Add(args) => run_favorites_add(&mut app, &args).await,
                FavoritesSubcommands::Remove(args) => run_favorites_remove(&mut app, &args),
                FavoritesSubcommands::Clear(args) => run_favorites_clear(&mut app, &args),
            }
        }
        Commands::Theme(cmd) => {
            run_theme(&mut build_app(dir)?, &cmd);
            Ok(())
        }
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::SetApiKey(args) => run_config_set_api_key(dir, &args),
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}
