//! Fun Facts command-line client.
//!
//! Browses, shares and votes on facts kept in a hosted PostgREST store.
//! Every subcommand except `categories` needs the store URL and access key,
//! from flags or the environment.

mod shell;
mod view;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::Result;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use funfacts_feed::{
    Candidate, Category, CategoryFilter, FactFeed, FactId, Notifier, SubmitOutcome, VoteCounter,
};
use funfacts_store::{API_KEY_ENV, REQUEST_TIMEOUT_ENV, STORE_URL_ENV, StoreClient, StoreConfig};

/// CLI for the Fun Facts feed.
#[derive(Parser)]
#[command(name = "funfacts", about = "Browse, share and vote on fun facts")]
struct Cli {
    /// Base URL of the hosted store (e.g., https://abcd.supabase.co)
    #[arg(long, env = STORE_URL_ENV, global = true)]
    store_url: Option<String>,

    /// Store access key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = REQUEST_TIMEOUT_ENV, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the feed, most interesting first
    List {
        /// Category to show, or "all"
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        category: CategoryFilter,
    },
    /// Share a new fact
    Submit {
        /// The fact itself (at most 200 characters)
        #[arg(long)]
        text: String,
        /// Link to a trustworthy source (http or https)
        #[arg(long)]
        source: String,
        /// Category the fact belongs to
        #[arg(long)]
        category: String,
    },
    /// Vote on a fact
    Vote {
        /// Fact id
        id: FactId,
        /// Counter to bump: interesting, mindblowing or false
        counter: VoteCounter,
        /// Feed to load the fact from, or "all"
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        category: CategoryFilter,
    },
    /// List the known categories
    Categories,
    /// Interactive feed view
    Shell {
        /// Category to start with, or "all"
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        category: CategoryFilter,
    },
}

/// Parse a filter name, accepting only "all" or a registered category.
pub(crate) fn parse_filter(s: &str) -> Result<CategoryFilter, String> {
    let filter: CategoryFilter = s.parse().unwrap_or_default();
    match filter.category() {
        Some(name) if Category::find(name).is_none() => Err(format!(
            "unknown category '{}' (expected all, {})",
            name,
            Category::names().collect::<Vec<_>>().join(", ")
        )),
        _ => Ok(filter),
    }
}

/// Notifier that prints to the terminal.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{} {}", "!".red().bold(), message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "funfacts=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Categories => {
            println!("{}", view::render_categories());
            Ok(())
        }
        Commands::List { ref category } => {
            let feed = connect(&cli)?;
            feed.refresh(category.clone())
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("{}", view::render_feed(&feed.snapshot().await));
            Ok(())
        }
        Commands::Submit {
            ref text,
            ref source,
            ref category,
        } => {
            let feed = connect(&cli)?;
            let candidate = Candidate::new(text, source, category);
            match feed
                .submit(&candidate)
                .await
                .map_err(|e| miette::miette!("{}", e))?
            {
                SubmitOutcome::Posted(fact) => println!("{}", view::render_fact(&fact, false)),
                SubmitOutcome::Rejected(reason) => debug!(%reason, "candidate rejected"),
            }
            Ok(())
        }
        Commands::Vote {
            id,
            counter,
            ref category,
        } => {
            let feed = connect(&cli)?;
            feed.refresh(category.clone())
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            let fact = feed
                .vote(id, counter)
                .await
                .map_err(|e| miette::miette!("{}", e))?;
            println!("{}", view::render_fact(&fact, false));
            Ok(())
        }
        Commands::Shell { ref category } => {
            let feed = connect(&cli)?;
            shell::run(feed, category.clone()).await
        }
    }
}

/// Build a feed over the configured store.
fn connect(cli: &Cli) -> Result<FactFeed<StoreClient>> {
    let url = cli
        .store_url
        .as_deref()
        .ok_or_else(|| miette::miette!("{} is not set (or pass --store-url)", STORE_URL_ENV))?;
    let key = cli
        .api_key
        .as_deref()
        .ok_or_else(|| miette::miette!("{} is not set (or pass --api-key)", API_KEY_ENV))?;

    let mut config = StoreConfig::new(url, key).map_err(|e| miette::miette!("{}", e))?;
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    let client = StoreClient::new(config).map_err(|e| miette::miette!("{}", e))?;
    debug!(config = ?client.config(), "connecting to store");
    Ok(FactFeed::with_notifier(client, Arc::new(TerminalNotifier)))
}
