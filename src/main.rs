use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use houseplans::core::{
    catalog::{Catalog, CatalogLoader, DEFAULT_CATALOG_PATH},
    favorites::{FAVORITES_KEY, FavoritesObserver, FavoritesStore},
    filter::FilterState,
    store::{LocalStore, SqliteStore},
};
use houseplans::models::{FavoritesEntry, PlanId};
use houseplans::session::{DEFAULT_DEBOUNCE_WINDOW, Session, SessionConfig, SessionDriver, Signal};
use houseplans::ui::{TerminalObserver, TerminalPresenter, parse_signal, print_favorites};

#[derive(Parser)]
#[command(name = "houseplans")]
#[command(about = "Browse, filter and save house plans from a static catalog")]
struct Cli {
    /// Path to the catalog document
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CATALOG_PATH)]
    catalog: PathBuf,

    /// Path to the local favorites store
    #[arg(long, value_name = "FILE", default_value = "favorites.db")]
    store: PathBuf,

    /// Name of the favorites slot in the store
    #[arg(long, default_value = FAVORITES_KEY)]
    favorites_key: String,

    /// Quiet period before a checkbox or search change redraws, in `browse` mode
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_WINDOW.as_millis() as u64)]
    debounce_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List plans matching a filter query string, e.g. "bedrooms=3,4%2B&style=Modern"
    Filter {
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,
    },
    /// Free-text search over title, style, type, bedrooms and id
    Search {
        text: String,
        /// Extra filters as a query string
        #[arg(long, value_name = "QUERY", default_value = "")]
        filter: String,
    },
    /// Read filter commands from stdin, one per line (+style Modern, -style Modern,
    /// x style Modern, q farm, clear, fav 12, quit)
    Browse {
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,
    },
    /// Manage saved plans
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "houseplans=debug" } else { "houseplans=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig {
        catalog_path: args.catalog,
        favorites_key: args.favorites_key,
        debounce_window: Duration::from_millis(args.debounce_ms),
    };
    tracing::debug!(?config, store = ?args.store, "starting");

    let observer = Arc::new(TerminalObserver);
    let loader = CatalogLoader::new(&config.catalog_path);
    let presenter = TerminalPresenter::new(args.verbose);

    // Browsing only needs favorites to mark cards, so it carries on without the file.
    let storage = match &args.command {
        Command::Favorites { .. } => LocalStore::Sqlite(SqliteStore::open(&args.store).await?),
        _ => {
            let (storage, error) = LocalStore::open_or_memory(&args.store).await;
            if let Some(e) = error {
                observer.storage_failed(&e);
            }
            storage
        }
    };
    let mut favorites = FavoritesStore::with_key(storage, &config.favorites_key);
    favorites.set_observer(observer);

    match args.command {
        Command::Filter { query } => {
            Session::start(&loader, &query, favorites, presenter).await;
        }
        Command::Search { text, filter } => {
            let mut state = FilterState::from_navigable_state(&filter);
            state.set_query(&text);
            Session::start(&loader, &state.to_navigable_state(), favorites, presenter).await;
        }
        Command::Browse { query } => {
            let session = Session::start(&loader, &query, favorites, presenter).await;
            let catalog = loader.load().await.catalog.clone();
            let (tx, rx) = mpsc::channel(32);
            let reader = tokio::spawn(read_signals(tx, catalog));
            SessionDriver::new(session, rx, config.debounce_window).run().await;
            reader.await??;
        }
        Command::Favorites { action } => match action {
            FavoritesAction::List => print_favorites(&favorites.list().await),
            FavoritesAction::Add { id } => {
                let load = loader.load().await;
                match load.catalog.lookup(&id) {
                    Some(plan) => {
                        if !favorites.add(FavoritesEntry::from(plan)).await {
                            println!("Plan {} is already saved", plan.id);
                        }
                    }
                    None => anyhow::bail!("No plan with id {} in {:?}", id, loader.path()),
                }
            }
            FavoritesAction::Remove { id } => {
                let id = match loader.load().await.catalog.lookup(&id) {
                    Some(plan) => plan.id.clone(),
                    None => saved_id(&favorites, &id).await,
                };
                favorites.remove(&id).await;
            }
            FavoritesAction::Toggle { id } => {
                let load = loader.load().await.clone();
                let Some(id) = load.catalog.lookup(&id).map(|plan| plan.id.clone()) else {
                    anyhow::bail!("No plan with id {} in {:?}", id, loader.path());
                };
                let mut session = Session::new(load, FilterState::new(), favorites, presenter);
                session.handle(Signal::FavoriteToggled(id)).await;
            }
            FavoritesAction::Clear => favorites.clear().await,
        },
    }

    Ok(())
}

/// Id of a saved favorite typed as `raw`, in whichever form it was saved.
async fn saved_id(favorites: &FavoritesStore<LocalStore>, raw: &str) -> PlanId {
    let raw = raw.trim();
    favorites
        .list()
        .await
        .into_iter()
        .map(|entry| entry.id)
        .find(|id| id.to_string() == raw)
        .unwrap_or_else(|| {
            let Ok(id) = raw.parse::<PlanId>();
            id
        })
}

async fn read_signals(signals: mpsc::Sender<Signal>, catalog: Catalog) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        match parse_signal(line, &catalog) {
            Some(signal) => {
                if signals.send(signal).await.is_err() {
                    break;
                }
            }
            None => eprintln!("Unrecognized command: {}", line),
        }
    }
    Ok(())
}
