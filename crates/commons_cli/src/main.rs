//! Command-line entry point for the category store.
//!
//! # Responsibility
//! - Open (and migrate) a category database file.
//! - Drive record/find/recent/reset use-cases for local inspection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commons_core::db::{open_db, schema};
use commons_core::{
    core_version, default_log_level, init_logging, now_epoch_ms, CategoryDao, CategoryService,
    SqliteChannel,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Inspect and update the recently used categories database.
#[derive(Parser, Debug)]
#[command(name = "commons_cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the category database file.
    #[arg(short, long, env = "COMMONS_DB_PATH", default_value = ".commons/categories.db")]
    db_path: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "COMMONS_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record one use of a category (creates it when missing).
    Use {
        /// Category name.
        name: String,
    },
    /// Show the stored usage record of a category.
    Find {
        /// Category name.
        name: String,
    },
    /// List recently used category names, newest first.
    Recent {
        /// Maximum number of names to print. Zero or less prints nothing.
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Drop and recreate the categories table.
    Reset {
        /// Confirm that every stored category may be discarded.
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Print the core crate version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    if let Commands::Version = cli.command {
        println!("commons_core version={}", core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db_path)
        .with_context(|| format!("failed to open `{}`", cli.db_path.display()))?;
    let service = CategoryService::new(CategoryDao::new(SqliteChannel::new(&conn)));

    match &cli.command {
        Commands::Use { name } => {
            let category = service
                .record_use(name, now_epoch_ms())
                .with_context(|| format!("failed to record use of `{name}`"))?;
            println!("{}\ttimes_used={}", category.name, category.times_used);
        }
        Commands::Find { name } => match service.find(name)? {
            Some(category) => println!(
                "{}\tlast_used={}\ttimes_used={}\tid={}",
                category.name,
                category.last_used,
                category.times_used,
                category
                    .id
                    .map_or_else(|| "-".to_string(), |id| id.to_string())
            ),
            None => println!("not found: {name}"),
        },
        Commands::Recent { limit } => {
            for name in service.recent_category_names(*limit)? {
                println!("{name}");
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("reset discards every stored category; pass --yes to confirm");
            }
            schema::reset(&conn)?;
            println!("categories table reset");
        }
        Commands::Version => {}
    }

    Ok(())
}
