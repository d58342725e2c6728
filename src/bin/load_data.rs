//! Seeds the ingredient and tag catalogs from CSV files.
//!
//! ```bash
//! load_data ingredients data/ingredients.csv
//! load_data tags data/tags.csv
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use foodgram::forms::catalog::{UploadIngredientsForm, UploadTagsForm};
use foodgram::repository::{DieselRepository, IngredientWriter, TagWriter};

#[derive(Parser)]
#[command(name = "load_data")]
#[command(about = "Load ingredients or tags from a CSV file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Catalog,

    /// SQLite database file (defaults to `DATABASE_URL`, then `app.db`)
    #[arg(long, env = "DATABASE_URL", default_value = "app.db")]
    database_url: String,
}

#[derive(Subcommand)]
enum Catalog {
    /// Rows of `name,measurement_unit`
    Ingredients {
        #[arg(value_name = "CSV")]
        path: PathBuf,
    },
    /// Rows of `name,color,slug`
    Tags {
        #[arg(value_name = "CSV")]
        path: PathBuf,
    },
}

fn open(path: &Path) -> File {
    match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Failed to open {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match establish_connection_pool(&cli.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let result = match &cli.command {
        Catalog::Ingredients { path } => UploadIngredientsForm::new(open(path))
            .into_new_ingredients()
            .map_err(|e| e.to_string())
            .and_then(|rows| {
                let total = rows.len();
                repo.create_ingredients(&rows)
                    .map(|inserted| (total, inserted))
                    .map_err(|e| e.to_string())
            }),
        Catalog::Tags { path } => UploadTagsForm::new(open(path))
            .into_new_tags()
            .map_err(|e| e.to_string())
            .and_then(|rows| {
                let total = rows.len();
                repo.create_tags(&rows)
                    .map(|inserted| (total, inserted))
                    .map_err(|e| e.to_string())
            }),
    };

    match result {
        Ok((total, inserted)) => {
            log::info!(
                "Loaded {inserted} new rows, skipped {} existing",
                total.saturating_sub(inserted)
            );
        }
        Err(e) => {
            log::error!("Failed to load catalog: {e}");
            process::exit(1);
        }
    }
}
