//! Station price CSV parsing for the `load_stations` importer.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::str::FromStr;

use crate::persistence::NewStation;

/// Decimal places kept when averaging duplicate prices.
const PRICE_SCALE: u32 = 3;

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "OPIS Truckstop ID")]
    opis_id: String,
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Rack ID", default)]
    rack_id: String,
    #[serde(rename = "Retail Price")]
    retail_price: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

/// Stations ready to insert plus counters for the import summary.
#[derive(Debug, Default)]
pub struct PriceImport {
    pub stations: Vec<NewStation>,
    pub rows_read: usize,
    /// Rows without usable coordinates
    pub rows_skipped: usize,
    /// Rows folded into an earlier row with the same OPIS id
    pub rows_merged: usize,
}

struct Pending {
    station: NewStation,
    price_sum: Decimal,
    price_count: u32,
}

/// Read the price CSV, skipping rows without coordinates and merging rows
/// that share an OPIS id.
///
/// Merged stations keep the first row's text fields and coordinates; their
/// price is the mean of all merged prices, rounded to three decimals.
pub fn read_price_csv<R: io::Read>(reader: R) -> Result<PriceImport> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut import = PriceImport::default();
    let mut pending: Vec<Pending> = Vec::new();
    let mut by_opis_id: HashMap<String, usize> = HashMap::new();

    for (line, row) in csv_reader.deserialize::<PriceRow>().enumerate() {
        // Header is line 1
        let row = row.with_context(|| format!("invalid CSV row at line {}", line + 2))?;
        import.rows_read += 1;

        let (Some(lat), Some(lon)) = (row.latitude, row.longitude) else {
            tracing::debug!("Skipping station {} without coordinates", row.opis_id);
            import.rows_skipped += 1;
            continue;
        };
        if !lat.is_finite() || !lon.is_finite() {
            import.rows_skipped += 1;
            continue;
        }

        let price = Decimal::from_str(&row.retail_price).with_context(|| {
            format!(
                "invalid retail price {:?} for station {}",
                row.retail_price, row.opis_id
            )
        })?;

        if let Some(&idx) = by_opis_id.get(&row.opis_id) {
            let entry = &mut pending[idx];
            entry.price_sum += price;
            entry.price_count += 1;
            import.rows_merged += 1;
            continue;
        }

        by_opis_id.insert(row.opis_id.clone(), pending.len());
        pending.push(Pending {
            station: NewStation {
                opis_id: row.opis_id,
                name: row.name,
                address: row.address,
                city: row.city,
                state: row.state,
                rack_id: row.rack_id,
                price,
                lat,
                lon,
            },
            price_sum: price,
            price_count: 1,
        });
    }

    import.stations = pending
        .into_iter()
        .map(|entry| {
            let mut station = entry.station;
            if entry.price_count > 1 {
                station.price = (entry.price_sum / Decimal::from(entry.price_count))
                    .round_dp(PRICE_SCALE);
            }
            station
        })
        .collect();

    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,latitude,longitude\n";

    #[test]
    fn merges_duplicates_and_skips_missing_coordinates() {
        let csv = format!(
            "{HEADER}\
             7,WOODSHED OF BIG CABIN,\"I-44, EXIT 283 & US-69\",Big Cabin,OK,307,3.00733333,36.53,-95.22\n\
             7,WOODSHED DUPLICATE,Elsewhere,Vinita,OK,308,3.10,36.60,-95.10\n\
             7,WOODSHED DUPLICATE,Elsewhere,Vinita,OK,308,3.20,36.60,-95.10\n\
             12,NO COORDS,\"I-40, EXIT 1\",Nowhere,TX,1,3.50,,\n\
             44,KWIK TRIP,\"I-94, EXIT 143\",Tomah,WI,282,3.259,43.98,-90.50\n"
        );
        let import = read_price_csv(csv.as_bytes()).unwrap();

        assert_eq!(import.rows_read, 5);
        assert_eq!(import.rows_skipped, 1);
        assert_eq!(import.rows_merged, 2);
        assert_eq!(import.stations.len(), 2);

        let woodshed = &import.stations[0];
        assert_eq!(woodshed.opis_id, "7");
        assert_eq!(woodshed.name, "WOODSHED OF BIG CABIN");
        assert_eq!(woodshed.city, "Big Cabin");
        assert_eq!(woodshed.price, Decimal::from_str("3.102").unwrap());
        assert!((woodshed.lat - 36.53).abs() < 1e-9);

        let kwik = &import.stations[1];
        assert_eq!(kwik.price, Decimal::from_str("3.259").unwrap());
    }

    #[test]
    fn bad_price_reports_station() {
        let csv = format!("{HEADER}9,BROKEN,Addr,City,ST,1,n/a,30.0,-97.0\n");
        let err = read_price_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("station 9"));
    }
}
