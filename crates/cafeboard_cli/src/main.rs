//! Headless command-line probe for the card store.
//!
//! # Responsibility
//! - Verify `cafeboard_core` linkage (`ping`).
//! - Inspect and extend a SQLite-backed card collection without a browser.

use cafeboard_core::db::open_db;
use cafeboard_core::{
    core_version, default_log_level, init_logging, ping, BoardConfig, CardDraft, CardStore,
    SqliteKeyValueStorage,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cafeboard")]
#[command(about = "Inspect and seed a cafe card board store")]
struct Args {
    /// SQLite file holding the card collection
    #[arg(long, default_value = "cafeboard.sqlite3")]
    db: PathBuf,

    /// JSON board config (storage key, default keywords, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage and version
    Ping,
    /// List stored cards
    List {
        /// Print the stored records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append a card with explicit coordinates
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        keywords: Option<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = match &args.config {
        Some(path) => BoardConfig::load(path).map_err(|err| err.to_string())?,
        None => BoardConfig::default(),
    };

    if let Command::Ping = args.command {
        println!("cafeboard_core ping={}", ping());
        println!("cafeboard_core version={}", core_version());
        return Ok(());
    }

    let conn = open_db(&args.db).map_err(|err| err.to_string())?;
    let storage = match config.storage_quota_bytes {
        Some(quota) => SqliteKeyValueStorage::with_quota(&conn, quota),
        None => SqliteKeyValueStorage::new(&conn),
    };
    let store = CardStore::new(storage, config.storage_key.clone());

    match args.command {
        Command::Ping => Ok(()),
        Command::List { json } => {
            let cards = store.load_all();
            if json {
                let rendered =
                    serde_json::to_string_pretty(&cards).map_err(|err| err.to_string())?;
                println!("{rendered}");
            } else {
                for (index, card) in cards.iter().enumerate() {
                    println!(
                        "{index:>3}  {}  ({:.4}, {:.4})  {}",
                        card.name, card.latitude, card.longitude, card.keywords
                    );
                }
                println!("{} card(s) under `{}`", cards.len(), store.key());
            }
            Ok(())
        }
        Command::Add {
            name,
            description,
            image_url,
            lat,
            lng,
            keywords,
        } => {
            let record = CardDraft {
                name: Some(name),
                description: Some(description),
                image_url: Some(image_url),
                latitude: Some(lat),
                longitude: Some(lng),
                keywords,
            }
            .with_defaults(&config.default_keywords)
            .validate()
            .map_err(|err| err.to_string())?;

            let total = store.append(&record).map_err(|err| err.to_string())?;
            info!("event=cli_add module=cli status=ok entries={total}");
            println!("stored card #{total}");
            Ok(())
        }
    }
}
