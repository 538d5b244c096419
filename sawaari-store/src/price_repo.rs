use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sawaari_catalog::pricing::{RoutePrice, RoutePriceRepository};
use sawaari_core::{Error, Result};

use crate::storage_err;

pub struct PgRoutePriceRepository {
    pool: PgPool,
}

impl PgRoutePriceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoutePriceRow {
    id: Uuid,
    route_id: Uuid,
    departure_time: String,
    base_price_upper: i32,
    base_price_lower: i32,
    surge_multiplier: f64,
    effective_date: NaiveDate,
    expiry_date: NaiveDate,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<RoutePriceRow> for RoutePrice {
    fn from(row: RoutePriceRow) -> Self {
        RoutePrice {
            id: row.id,
            route_id: row.route_id,
            departure_time: row.departure_time,
            base_price_upper: row.base_price_upper,
            base_price_lower: row.base_price_lower,
            surge_multiplier: row.surge_multiplier,
            effective_date: row.effective_date,
            expiry_date: row.expiry_date,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

const PRICE_COLUMNS: &str = "id, route_id, departure_time, base_price_upper, base_price_lower, \
     surge_multiplier, effective_date, expiry_date, is_active, created_at";

#[async_trait]
impl RoutePriceRepository for PgRoutePriceRepository {
    async fn insert(&self, price: &RoutePrice) -> Result<()> {
        sqlx::query(
            "INSERT INTO route_prices (id, route_id, departure_time, base_price_upper, \
             base_price_lower, surge_multiplier, effective_date, expiry_date, is_active, \
             created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(price.id)
        .bind(price.route_id)
        .bind(&price.departure_time)
        .bind(price.base_price_upper)
        .bind(price.base_price_lower)
        .bind(price.surge_multiplier)
        .bind(price.effective_date)
        .bind(price.expiry_date)
        .bind(price.is_active)
        .bind(price.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn find_active(
        &self,
        route_id: Uuid,
        departure_time: &str,
        date: NaiveDate,
    ) -> Result<Option<RoutePrice>> {
        // With overlapping windows the latest effective date wins.
        let row = sqlx::query_as::<_, RoutePriceRow>(&format!(
            "SELECT {} FROM route_prices
             WHERE route_id = $1 AND departure_time = $2 AND is_active
               AND effective_date <= $3 AND expiry_date >= $3
             ORDER BY effective_date DESC, created_at DESC
             LIMIT 1",
            PRICE_COLUMNS
        ))
        .bind(route_id)
        .bind(departure_time)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(RoutePrice::from))
    }

    async fn list_for_route(&self, route_id: Uuid) -> Result<Vec<RoutePrice>> {
        let rows = sqlx::query_as::<_, RoutePriceRow>(&format!(
            "SELECT {} FROM route_prices
             WHERE route_id = $1
             ORDER BY departure_time, effective_date",
            PRICE_COLUMNS
        ))
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(RoutePrice::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM route_prices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Pricing record not found".to_owned()));
        }
        Ok(())
    }
}
