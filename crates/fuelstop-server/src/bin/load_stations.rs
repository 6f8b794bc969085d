//! Import the station price CSV into the SQLite station table.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use fuelstop_server::config::Config;
use fuelstop_server::import::read_price_csv;
use fuelstop_server::persistence::{self, stations};

#[derive(Parser, Debug)]
#[command(name = "load_stations")]
#[command(about = "Load truck stop fuel prices into the station database")]
struct Args {
    /// Price CSV with OPIS id, name, address, price and coordinates
    #[arg(long, default_value = "data/fuel_prices_processed.csv")]
    csv: PathBuf,

    /// Database path (defaults to FUELSTOP_DB_PATH)
    #[arg(long)]
    db: Option<String>,

    /// Delete existing stations before importing
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("load_stations=info".parse()?)
                .add_directive("fuelstop_server=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let db_path = args.db.unwrap_or(config.database_path);

    let file = File::open(&args.csv)
        .with_context(|| format!("failed to open {}", args.csv.display()))?;
    let import = read_price_csv(file)?;

    let db = persistence::init_database(&db_path, config.database_max_connections).await?;
    if args.replace {
        let removed = stations::clear_stations(db.pool()).await?;
        tracing::info!("Removed {} existing stations", removed);
    }

    let inserted = stations::insert_stations(db.pool(), &import.stations).await?;
    tracing::info!(
        "Imported {}: {} rows read, {} merged, {} skipped without coordinates, {} stations inserted",
        args.csv.display(),
        import.rows_read,
        import.rows_merged,
        import.rows_skipped,
        inserted
    );

    Ok(())
}
