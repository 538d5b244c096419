use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sawaari_booking::models::{Booking, PaymentStatus};
use sawaari_booking::repository::BookingRepository;
use sawaari_core::notify::StoredAsset;
use sawaari_core::{Error, Result};
use sawaari_shared::contact::ContactDetails;

use crate::{map_insert_err, storage_err};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    tracking_code: String,
    guest_id: Uuid,
    departure_city: String,
    destination_city: String,
    departure_date: NaiveDate,
    departure_time: String,
    passengers: i32,
    selected_seats: Vec<String>,
    total_amount: i32,
    payment_status: String,
    contact_name: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    proof_url: Option<String>,
    proof_handle: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = Error;

    fn try_from(row: BookingRow) -> Result<Booking> {
        let contact = match (row.contact_name, row.contact_phone, row.contact_email) {
            (Some(name), Some(phone), Some(email)) => Some(ContactDetails {
                name,
                phone,
                email,
            }),
            _ => None,
        };
        let proof = match (row.proof_url, row.proof_handle) {
            (Some(url), Some(handle)) => Some(StoredAsset { url, handle }),
            _ => None,
        };

        Ok(Booking {
            id: row.id,
            tracking_code: row.tracking_code,
            guest_id: row.guest_id,
            departure_city: row.departure_city,
            destination_city: row.destination_city,
            departure_date: row.departure_date,
            departure_time: row.departure_time,
            passengers: row.passengers,
            selected_seats: row.selected_seats,
            total_amount: row.total_amount,
            payment_status: row.payment_status.parse()?,
            contact,
            proof,
            created_at: row.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, tracking_code, guest_id, departure_city, destination_city, \
     departure_date, departure_time, passengers, selected_seats, total_amount, \
     payment_status, contact_name, contact_phone, contact_email, proof_url, \
     proof_handle, created_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            "INSERT INTO bookings (id, tracking_code, guest_id, departure_city, \
             destination_city, departure_date, departure_time, passengers, selected_seats, \
             total_amount, payment_status, contact_name, contact_phone, contact_email, \
             proof_url, proof_handle, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(booking.id)
        .bind(&booking.tracking_code)
        .bind(booking.guest_id)
        .bind(&booking.departure_city)
        .bind(&booking.destination_city)
        .bind(booking.departure_date)
        .bind(&booking.departure_time)
        .bind(booking.passengers)
        .bind(&booking.selected_seats)
        .bind(booking.total_amount)
        .bind(booking.payment_status.to_string())
        .bind(booking.contact.as_ref().map(|c| c.name.clone()))
        .bind(booking.contact.as_ref().map(|c| c.phone.clone()))
        .bind(booking.contact.as_ref().map(|c| c.email.clone()))
        .bind(booking.proof.as_ref().map(|p| p.url.clone()))
        .bind(booking.proof.as_ref().map(|p| p.handle.clone()))
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, "Tracking code already in use"))?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_by_code(&self, tracking_code: &str) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE tracking_code = $1",
            BOOKING_COLUMNS
        ))
        .bind(tracking_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(Booking::try_from).transpose()
    }

    async fn save(&self, booking: &Booking) -> Result<()> {
        let result = sqlx::query(
            "UPDATE bookings
             SET selected_seats = $2, total_amount = $3, payment_status = $4, \
             contact_name = $5, contact_phone = $6, contact_email = $7, \
             proof_url = $8, proof_handle = $9
             WHERE id = $1",
        )
        .bind(booking.id)
        .bind(&booking.selected_seats)
        .bind(booking.total_amount)
        .bind(booking.payment_status.to_string())
        .bind(booking.contact.as_ref().map(|c| c.name.clone()))
        .bind(booking.contact.as_ref().map(|c| c.phone.clone()))
        .bind(booking.contact.as_ref().map(|c| c.email.clone()))
        .bind(booking.proof.as_ref().map(|p| p.url.clone()))
        .bind(booking.proof.as_ref().map(|p| p.handle.clone()))
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Booking not found".to_owned()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "DELETE FROM bookings WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_paid_for_slot(
        &self,
        destination: &str,
        date: NaiveDate,
        departure_time: &str,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings
             WHERE destination_city = $1 AND departure_date = $2 \
               AND departure_time = $3 AND payment_status = $4",
            BOOKING_COLUMNS
        ))
        .bind(destination)
        .bind(date)
        .bind(departure_time)
        .bind(PaymentStatus::Paid.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.into_iter().map(Booking::try_from).collect()
    }
}
