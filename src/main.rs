use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sourcekit::config::Config;
use sourcekit::models::{Anime, Chapter, Episode, Manga, MediaPage};
use sourcekit::preferences::{apply_preference, PreferenceStore};
use sourcekit::registry::{SourceKind, SourceRegistry};
use sourcekit::SourceError;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "sourcekit")]
#[command(about = "Browse anime and manga sites through their source adapters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in sources
    Sources,
    /// Popular listing
    Popular {
        source: String,
        /// Number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Latest updates listing
    Latest {
        source: String,
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Search by text and filters
    Search {
        source: String,
        /// Text query (optional)
        query: Option<String>,
        /// Filter state as key=value, see `filters`
        #[arg(short = 'f', long = "filter")]
        filters: Vec<String>,
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Details for an item URL returned by a listing
    Details { source: String, url: String },
    /// Episodes of an anime
    Episodes { source: String, url: String },
    /// Playable videos of an episode
    Videos { source: String, url: String },
    /// Chapters of a manga
    Chapters { source: String, url: String },
    /// Page images of a chapter
    Pages { source: String, url: String },
    /// Show a source's filters
    Filters { source: String },
    /// Show or change a source's preferences
    Prefs {
        source: String,
        /// Preference as key=value; sets take comma-separated values
        #[arg(long = "set")]
        set: Vec<String>,
    },
}

#[derive(Serialize)]
struct PrefsView<'a, T: Serialize> {
    screen: &'a [sourcekit::preferences::Preference],
    values: T,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let config = Config::load(&cli.config).with_context(|| format!("loading {}", cli.config))?;
    let store = Arc::new(PreferenceStore::load(&config.preferences.path)?);
    let registry = SourceRegistry::new(&config, store)?;
    debug!("Loaded configuration from {}", cli.config);

    match cli.command {
        Commands::Sources => print_json(&registry.list())?,
        Commands::Popular { source, pages } => run_listing(&registry, &source, Listing::Popular, pages).await?,
        Commands::Latest { source, pages } => run_listing(&registry, &source, Listing::Latest, pages).await?,
        Commands::Search {
            source,
            query,
            filters,
            pages,
        } => {
            let query = query.unwrap_or_default();
            run_listing(&registry, &source, Listing::Search { query: &query, filters: &filters }, pages).await?
        }
        Commands::Details { source, url } => match kind(&registry, &source)? {
            SourceKind::Anime => {
                let details = registry.get_anime(&source)?.details(&Anime::new(url, "")).await?;
                print_json(&details)?
            }
            SourceKind::Manga => {
                let details = registry.get_manga(&source)?.details(&Manga::new(url, "")).await?;
                print_json(&details)?
            }
        },
        Commands::Episodes { source, url } => {
            let episodes = registry.get_anime(&source)?.episodes(&Anime::new(url, "")).await?;
            print_json(&episodes)?
        }
        Commands::Videos { source, url } => {
            let videos = registry.get_anime(&source)?.videos(&Episode::new(url, "", 0.0)).await?;
            print_json(&videos)?
        }
        Commands::Chapters { source, url } => {
            let chapters = registry.get_manga(&source)?.chapters(&Manga::new(url, "")).await?;
            print_json(&chapters)?
        }
        Commands::Pages { source, url } => {
            let pages = registry.get_manga(&source)?.pages(&Chapter::new(url, "", 0.0)).await?;
            print_json(&pages)?
        }
        Commands::Filters { source } => match kind(&registry, &source)? {
            SourceKind::Anime => print_json(&registry.get_anime(&source)?.filters())?,
            SourceKind::Manga => print_json(&registry.get_manga(&source)?.filters())?,
        },
        Commands::Prefs { source, set } => {
            let screen = match kind(&registry, &source)? {
                SourceKind::Anime => registry.get_anime(&source)?.preference_screen(),
                SourceKind::Manga => registry.get_manga(&source)?.preference_screen(),
            };
            let prefs = registry.preferences().for_source(&source);
            for arg in &set {
                apply_preference(&screen, &prefs, arg)?;
                info!("Updated {} preference {}", source, arg);
            }
            print_json(&PrefsView {
                screen: &screen,
                values: prefs.entries(),
            })?
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("sourcekit={}", level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kind(registry: &SourceRegistry, source: &str) -> Result<SourceKind> {
    Ok(registry
        .kind_of(source)
        .ok_or_else(|| SourceError::unknown_source(source))?)
}

#[derive(Clone, Copy)]
enum Listing<'a> {
    Popular,
    Latest,
    Search { query: &'a str, filters: &'a [String] },
}

/// Fetches up to `pages` pages, stopping early when the site reports no more.
async fn run_listing(registry: &SourceRegistry, source: &str, listing: Listing<'_>, pages: u32) -> Result<()> {
    match kind(registry, source)? {
        SourceKind::Anime => {
            let anime = registry.get_anime(source)?;
            let mut filters = anime.filters();
            if let Listing::Search { filters: args, .. } = listing {
                for arg in args {
                    filters.apply(arg)?;
                }
            }
            let mut out = MediaPage::empty();
            for page in 1..=pages.max(1) {
                let result = match listing {
                    Listing::Popular => anime.popular(page).await?,
                    Listing::Latest => anime.latest(page).await?,
                    Listing::Search { query, .. } => anime.search(page, query, &filters).await?,
                };
                out.items.extend(result.items);
                out.has_next_page = result.has_next_page;
                if !out.has_next_page {
                    break;
                }
            }
            info!("{} items from {}", out.items.len(), source);
            print_json(&out)
        }
        SourceKind::Manga => {
            let manga = registry.get_manga(source)?;
            let mut filters = manga.filters();
            if let Listing::Search { filters: args, .. } = listing {
                for arg in args {
                    filters.apply(arg)?;
                }
            }
            let mut out = MediaPage::empty();
            for page in 1..=pages.max(1) {
                let result = match listing {
                    Listing::Popular => manga.popular(page).await?,
                    Listing::Latest => manga.latest(page).await?,
                    Listing::Search { query, .. } => manga.search(page, query, &filters).await?,
                };
                out.items.extend(result.items);
                out.has_next_page = result.has_next_page;
                if !out.has_next_page {
                    break;
                }
            }
            info!("{} items from {}", out.items.len(), source);
            print_json(&out)
        }
    }
}
