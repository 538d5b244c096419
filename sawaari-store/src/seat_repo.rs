use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sawaari_catalog::inventory::{Seat, SeatRepository};
use sawaari_core::{Error, Result};

use crate::{map_insert_err, storage_err};

pub struct PgSeatRepository {
    pool: PgPool,
}

impl PgSeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SeatRow {
    route_id: Uuid,
    departure_time: String,
    seat_id: String,
    deck: String,
    seat_row: i32,
    seat_column: String,
    base_price: i32,
    current_price: i32,
    category: String,
    status: String,
    is_blocked: bool,
    blocked_reason: Option<String>,
    blocked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SeatRow> for Seat {
    type Error = Error;

    fn try_from(row: SeatRow) -> Result<Seat> {
        Ok(Seat {
            route_id: row.route_id,
            departure_time: row.departure_time,
            seat_id: row.seat_id,
            deck: row.deck.parse()?,
            row: row.seat_row,
            column: row.seat_column,
            base_price: row.base_price,
            current_price: row.current_price,
            category: row.category.parse()?,
            status: row.status.parse()?,
            is_blocked: row.is_blocked,
            blocked_reason: row.blocked_reason,
            blocked_until: row.blocked_until,
            created_at: row.created_at,
        })
    }
}

const SEAT_COLUMNS: &str = "route_id, departure_time, seat_id, deck, seat_row, seat_column, \
     base_price, current_price, category, status, is_blocked, blocked_reason, \
     blocked_until, created_at";

#[async_trait]
impl SeatRepository for PgSeatRepository {
    async fn insert(&self, seat: &Seat) -> Result<()> {
        sqlx::query(
            "INSERT INTO seats (route_id, departure_time, seat_id, deck, seat_row, \
             seat_column, base_price, current_price, category, status, is_blocked, \
             blocked_reason, blocked_until, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(seat.route_id)
        .bind(&seat.departure_time)
        .bind(&seat.seat_id)
        .bind(seat.deck.to_string())
        .bind(seat.row)
        .bind(&seat.column)
        .bind(seat.base_price)
        .bind(seat.current_price)
        .bind(seat.category.to_string())
        .bind(seat.status.to_string())
        .bind(seat.is_blocked)
        .bind(&seat.blocked_reason)
        .bind(seat.blocked_until)
        .bind(seat.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, "Seat already exists for this slot"))?;
        Ok(())
    }

    async fn find(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_id: &str,
    ) -> Result<Option<Seat>> {
        let row = sqlx::query_as::<_, SeatRow>(&format!(
            "SELECT {} FROM seats
             WHERE route_id = $1 AND departure_time = $2 AND seat_id = $3",
            SEAT_COLUMNS
        ))
        .bind(route_id)
        .bind(departure_time)
        .bind(seat_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(Seat::try_from).transpose()
    }

    async fn list_slot(&self, route_id: Uuid, departure_time: &str) -> Result<Vec<Seat>> {
        let rows = sqlx::query_as::<_, SeatRow>(&format!(
            "SELECT {} FROM seats
             WHERE route_id = $1 AND departure_time = $2
             ORDER BY deck, seat_row, seat_column",
            SEAT_COLUMNS
        ))
        .bind(route_id)
        .bind(departure_time)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(Seat::try_from).collect()
    }

    async fn save(&self, seat: &Seat) -> Result<()> {
        let result = sqlx::query(
            "UPDATE seats
             SET deck = $4, seat_row = $5, seat_column = $6, base_price = $7, \
             current_price = $8, category = $9, status = $10, is_blocked = $11, \
             blocked_reason = $12, blocked_until = $13
             WHERE route_id = $1 AND departure_time = $2 AND seat_id = $3",
        )
        .bind(seat.route_id)
        .bind(&seat.departure_time)
        .bind(&seat.seat_id)
        .bind(seat.deck.to_string())
        .bind(seat.row)
        .bind(&seat.column)
        .bind(seat.base_price)
        .bind(seat.current_price)
        .bind(seat.category.to_string())
        .bind(seat.status.to_string())
        .bind(seat.is_blocked)
        .bind(&seat.blocked_reason)
        .bind(seat.blocked_until)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Seat not found: {}", seat.seat_id)));
        }
        Ok(())
    }
}
