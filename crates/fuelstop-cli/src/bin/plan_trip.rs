//! Plan a trip against a running fuel stop server and print the fuel plan.

use clap::{Parser, Subcommand};
use fuelstop_cli::{format_prices, format_trip, FuelStopClient};
use fuelstop_core::LatLng;

/// Query the fuel stop server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Fuel stop server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List station fuel prices
    Prices {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Plan a trip between two coordinates
    Route {
        #[arg(long, allow_hyphen_values = true)]
        start_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        start_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        finish_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        finish_lng: f64,
    },
    /// Plan a trip between two place names
    RouteByName {
        /// e.g. "New York, NY"
        #[arg(long)]
        start: String,
        #[arg(long)]
        finish: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = FuelStopClient::new(&args.url);

    match args.command {
        Command::Prices { limit } => {
            let records = client.fuel_prices(limit)?;
            println!("Retrieved {} fuel prices:", records.len());
            print!("{}", format_prices(&records));
        }
        Command::Route {
            start_lat,
            start_lng,
            finish_lat,
            finish_lng,
        } => {
            let trip = client.route(
                LatLng {
                    lat: start_lat,
                    lng: start_lng,
                },
                LatLng {
                    lat: finish_lat,
                    lng: finish_lng,
                },
            )?;
            print!("{}", format_trip(&trip));
        }
        Command::RouteByName { start, finish } => {
            let trip = client.route_by_name(&start, &finish)?;
            print!("{}", format_trip(&trip));
        }
    }

    Ok(())
}
