use clap::Parser;
use quotebox_core::{Config, PopupSession, ZenQuotesSource};
use quotebox_store::KvStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod popup;

#[derive(Parser)]
#[command(name = "quotebox")]
#[command(
    version,
    about = "A few inspirational quotes an hour, and a place to keep the good ones",
    long_about = None
)]
struct Cli {
    /// Config file (default: <config dir>/quotebox/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, global = true, env = "QUOTEBOX_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open an interactive quote session (default)
    Popup,
    /// Manage favorite quotes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Show how many quotes are left this hour
    Status,
}

#[derive(clap::Subcommand)]
enum FavoritesAction {
    /// List saved favorites
    List,
    /// Remove a favorite (exact text, e.g. "text - author")
    Remove { quote: String },
    /// Remove all favorites
    Clear {
        /// Confirm clearing every favorite
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't get mixed into the quote output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotebox=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let session = open_session(&config, cli.db.clone())?;

    match cli.command.unwrap_or(Commands::Popup) {
        Commands::Popup => popup::run_popup(session).await?,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => popup::print_favorites(&session.favorites().await?),
            FavoritesAction::Remove { quote } => {
                let remaining = session.delete_favorite(&quote).await?;
                popup::print_favorites(&remaining);
            }
            FavoritesAction::Clear { yes } => {
                if session.clear_favorites(yes).await? {
                    println!("Cleared all favorite quotes.");
                } else {
                    println!("Not clearing favorites without --yes.");
                }
            }
        },
        Commands::Status => {
            let usage = session.usage().await?;
            println!(
                "{} of {} quotes used this hour, {} left.",
                usage.used,
                usage.limit,
                usage.remaining()
            );
            if usage.remaining() == 0 {
                if let Some(minutes) = usage.minutes_until_slot {
                    println!("Next quote available in {} minutes.", minutes);
                }
            }
        }
    }

    Ok(())
}

fn open_session(config: &Config, db_override: Option<PathBuf>) -> anyhow::Result<PopupSession> {
    let db_path = match db_override {
        Some(path) => path,
        None => config.db_path()?,
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Using database at {}", db_path.display());
    let store = Arc::new(KvStore::new(&db_path)?);
    let source = ZenQuotesSource::new(&config.api)?;

    Ok(PopupSession::new(Box::new(source), store, config))
}
