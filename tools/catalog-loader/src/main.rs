//! Catalog loader: seeds the ingredient and tag tables of a fresh database.
//!
//! # Usage
//!
//! ```bash
//! # Import ingredients from CSV with a `name,measurement_unit` header
//! cargo run -p catalog-loader -- ingredients --file data/ingredients.csv
//!
//! # A JSON array of {"name", "measurement_unit"} objects also works
//! cargo run -p catalog-loader -- ingredients --file data/ingredients.json
//!
//! # Seed the default tag set
//! cargo run -p catalog-loader -- tags
//! ```
//!
//! Both imports are skipped when the target table already has rows.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;

use foodgram_recipes::domain::types::ImportOutcome;
use foodgram_recipes::infra::db::DbCatalogRepository;
use foodgram_recipes::usecase::catalog::{ImportIngredientsUseCase, ImportTagsUseCase, default_tags};

mod records;

#[derive(Parser)]
#[command(about = "Seed the recipe catalog")]
struct Args {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import ingredients from a CSV or JSON file
    Ingredients {
        #[arg(long)]
        file: PathBuf,
    },
    /// Seed the default tags
    Tags,
}

#[tokio::main]
async fn main() -> Result<()> {
    foodgram_core::tracing::init_tracing();
    let args = Args::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;
    let catalog = DbCatalogRepository { db };

    let outcome = match args.command {
        Command::Ingredients { file } => {
            let records = records::read_ingredients(&file)?;
            ImportIngredientsUseCase { catalog }
                .execute(records)
                .await
                .context("ingredient import failed")?
        }
        Command::Tags => ImportTagsUseCase { catalog }
            .execute(default_tags())
            .await
            .context("tag import failed")?,
    };

    match outcome {
        ImportOutcome::Imported(n) => tracing::info!(rows = n, "catalog import done"),
        ImportOutcome::Skipped => tracing::info!("catalog already populated, nothing imported"),
    }
    Ok(())
}
