//! Quotesync client - browse, add, import, export, and sync a locally
//! persisted quote collection against a remote data source.

mod app;
mod config;
mod error;
mod remote;
mod storage;
mod sync;
mod transfer;

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::Config;
use crate::error::AppError;
use crate::sync::Scheduler;

#[derive(Parser)]
#[command(name = "quotesync", version, about = "Quote manager with periodic server sync")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a random quote, optionally filtered by category
    Show {
        /// Category to filter by (persisted as the new default filter)
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a new quote
    Add {
        /// Quote text
        text: String,
        /// Category label
        category: String,
    },
    /// List quotes, optionally filtered by category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// List the distinct categories
    Categories,
    /// Export the collection as pretty-printed JSON
    Export {
        /// Output path (defaults to quotes-YYYY-MM-DD.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// File containing a JSON array of {"text", "category"} objects
        file: PathBuf,
    },
    /// Run one sync cycle against the server
    Sync {
        /// Record ids whose local version should be kept when conflicted
        #[arg(long = "keep-local", value_name = "ID")]
        keep_local: Vec<String>,
    },
    /// Sync periodically until interrupted
    Watch,
    /// Delete all saved quotes and reset to the samples
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotesync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().map_err(AppError::Config)?;

    let cli = Cli::parse();
    let mut app = App::open(&config)?;

    match cli.command {
        Command::Show { category } => {
            match app.random_quote(category.as_deref())? {
                Some(quote) => println!("\"{}\" - ({})", quote.text, quote.category),
                None => println!("No quotes available in this category yet!"),
            }
            if let Some(last) = app.session.last_viewed() {
                println!("Last viewed (session): \"{}\" - ({})", last.text, last.category);
            }
        }
        Command::Add { text, category } => {
            let record = app.add_quote(&text, &category)?;
            println!("Added \"{}\" to {}.", record.text, record.category);
            // Fire-and-forget; failures are logged, never fatal.
            app.remote.post_record(&record).await;
        }
        Command::List { category } => {
            let quotes = app.store.filtered(category.as_deref());
            if quotes.is_empty() {
                println!("No quotes available in this category yet!");
            }
            for quote in quotes {
                println!("\"{}\" - ({})", quote.text, quote.category);
            }
        }
        Command::Categories => {
            for category in app.store.categories() {
                println!("{category}");
            }
        }
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(transfer::export_file_name(Utc::now())));
            transfer::export_to_file(&app.store, &path)?;
            println!("Exported {} quotes to {}.", app.store.len(), path.display());
        }
        Command::Import { file } => match transfer::import_from_file(&mut app.store, &file) {
            Ok(summary) => {
                app.gateway.save_store(&app.store)?;
                println!(
                    "Imported {} items. {} new quotes added (duplicates skipped).",
                    summary.valid, summary.added
                );
            }
            Err(AppError::Engine(quotesync_engine::Error::NoValidItems)) => {
                println!(
                    "No valid quote objects found in file. Each item must have \"text\" and \"category\" strings."
                );
            }
            Err(err) => return Err(err.into()),
        },
        Command::Sync { keep_local } => match app.sync_once().await? {
            Some(outcome) => {
                if outcome.conflicts.is_empty() {
                    println!("Synced with server. No conflicts. {} new.", outcome.added);
                } else {
                    println!(
                        "{} conflict(s) detected. Server versions applied (default).",
                        outcome.conflicts.len()
                    );
                    for (position, conflict) in outcome.conflicts.iter().enumerate() {
                        println!("Conflict #{}:", position + 1);
                        println!(
                            "  Server: \"{}\" - ({})",
                            conflict.server.text, conflict.server.category
                        );
                        println!(
                            "  Local:  \"{}\" - ({})",
                            conflict.local.text, conflict.local.category
                        );
                    }
                    if keep_local.is_empty() {
                        println!("Re-run with --keep-local <ID> to keep a local version.");
                    } else {
                        let applied = app.apply_resolutions(&keep_local)?;
                        println!("Resolutions applied to {applied} conflict(s).");
                    }
                }
                println!("Last sync: {}", outcome.synced_at.to_rfc3339());
            }
            None => match app.gateway.last_sync_at() {
                Some(at) => println!(
                    "Server unreachable; sync skipped. Last sync: {}",
                    at.to_rfc3339()
                ),
                None => println!("Server unreachable; sync skipped."),
            },
        },
        Command::Watch => {
            let interval = config.sync_interval;
            println!(
                "Syncing every {}s against {}. Press Ctrl-C to stop.",
                interval.as_secs(),
                config.server_url
            );
            let mut scheduler = Scheduler::start(app, interval);
            tokio::signal::ctrl_c().await?;
            scheduler.stop();
            println!("Stopped.");
        }
        Command::Reset { yes } => {
            if yes || confirm("This will delete all saved quotes and reset to defaults. Proceed?")? {
                app.reset()?;
                println!("Quotes reset to defaults.");
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
