//! Station persistence operations.

use anyhow::{Context, Result};
use chrono::Utc;
use fuelstop_core::models::StationRecord;
use fuelstop_core::{BoundingBox, BoxError, Station, StationStore};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;

/// A station row to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStation {
    pub opis_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: String,
    pub price: Decimal,
    pub lat: f64,
    pub lon: f64,
}

/// Insert stations in a single transaction. Returns the number inserted.
pub async fn insert_stations(pool: &SqlitePool, stations: &[NewStation]) -> Result<u64> {
    let loaded_at = Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    for station in stations {
        let result = sqlx::query(
            r#"
            INSERT INTO stations (opis_id, name, address, city, state, rack_id, retail_price, latitude, longitude, loaded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&station.opis_id)
        .bind(&station.name)
        .bind(&station.address)
        .bind(&station.city)
        .bind(&station.state)
        .bind(&station.rack_id)
        .bind(station.price.to_string())
        .bind(station.lat)
        .bind(station.lon)
        .bind(&loaded_at)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

/// Remove every station.
pub async fn clear_stations(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM stations").execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn count_stations(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// First `limit` stations by id.
pub async fn list_stations(pool: &SqlitePool, limit: i64) -> Result<Vec<StationRecord>> {
    let rows = sqlx::query_as::<_, StationRow>(
        "SELECT id, opis_id, name, address, city, state, rack_id, retail_price, latitude, longitude
         FROM stations ORDER BY id LIMIT ?1",
    )
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

/// Stations inside `bbox`, bounds inclusive.
pub async fn stations_in_box(pool: &SqlitePool, bbox: &BoundingBox) -> Result<Vec<Station>> {
    let rows = sqlx::query_as::<_, StationRow>(
        "SELECT id, opis_id, name, address, city, state, rack_id, retail_price, latitude, longitude
         FROM stations
         WHERE latitude BETWEEN ?1 AND ?2 AND longitude BETWEEN ?3 AND ?4",
    )
    .bind(bbox.min_lat)
    .bind(bbox.max_lat)
    .bind(bbox.min_lon)
    .bind(bbox.max_lon)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| StationRecord::try_from(r).map(|record| record.to_station()))
        .collect()
}

/// `StationStore` backed by the SQLite `stations` table.
#[derive(Clone)]
pub struct SqliteStationStore {
    pool: SqlitePool,
}

impl SqliteStationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StationStore for SqliteStationStore {
    async fn range_query(&self, bbox: &BoundingBox) -> Result<Vec<Station>, BoxError> {
        Ok(stations_in_box(&self.pool, bbox).await?)
    }
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct StationRow {
    id: i64,
    opis_id: String,
    name: String,
    address: String,
    city: String,
    state: String,
    rack_id: String,
    retail_price: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<StationRow> for StationRecord {
    type Error = anyhow::Error;

    fn try_from(row: StationRow) -> Result<Self> {
        let price = Decimal::from_str(&row.retail_price)
            .with_context(|| format!("station {} has invalid price {:?}", row.id, row.retail_price))?;

        Ok(StationRecord {
            id: row.id,
            opis_id: row.opis_id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            rack_id: row.rack_id,
            price,
            lat: row.latitude,
            lon: row.longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;

    fn new_station(opis_id: &str, price: &str, lat: f64, lon: f64) -> NewStation {
        NewStation {
            opis_id: opis_id.to_string(),
            name: format!("Stop {opis_id}"),
            address: "I-40, EXIT 76".to_string(),
            city: "Amarillo".to_string(),
            state: "TX".to_string(),
            rack_id: "307".to_string(),
            price: Decimal::from_str(price).unwrap(),
            lat,
            lon,
        }
    }

    #[tokio::test]
    async fn insert_list_and_count() {
        let db = init_database(":memory:", 1).await.unwrap();
        let inserted = insert_stations(
            db.pool(),
            &[
                new_station("1", "3.459", 35.2, -101.8),
                new_station("2", "3.199", 35.3, -101.7),
            ],
        )
        .await
        .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(count_stations(db.pool()).await.unwrap(), 2);

        let listed = list_stations(db.pool(), 1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].opis_id, "1");
        assert_eq!(listed[0].price, Decimal::from_str("3.459").unwrap());
    }

    #[tokio::test]
    async fn range_query_is_inclusive_box() {
        let db = init_database(":memory:", 1).await.unwrap();
        insert_stations(
            db.pool(),
            &[
                new_station("in", "3.00", 35.0, -101.0),
                new_station("edge", "3.00", 35.5, -101.0),
                new_station("out", "3.00", 36.0, -101.0),
            ],
        )
        .await
        .unwrap();

        let store = SqliteStationStore::new(db.pool().clone());
        let bbox = BoundingBox {
            min_lat: 34.5,
            max_lat: 35.5,
            min_lon: -101.5,
            max_lon: -100.5,
        };
        let mut names: Vec<String> = store
            .range_query(&bbox)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Stop edge".to_string(), "Stop in".to_string()]);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let db = init_database(":memory:", 1).await.unwrap();
        insert_stations(db.pool(), &[new_station("1", "3.00", 35.0, -101.0)])
            .await
            .unwrap();
        assert_eq!(clear_stations(db.pool()).await.unwrap(), 1);
        assert_eq!(count_stations(db.pool()).await.unwrap(), 0);
    }
}
