//! HashMap-backed booking repository for tests and database-less runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use sawaari_core::{Error, Result};

use crate::models::{Booking, PaymentStatus};
use crate::repository::BookingRepository;

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        if bookings
            .values()
            .any(|b| b.tracking_code == booking.tracking_code)
        {
            return Err(Error::Conflict(format!(
                "Tracking code already in use: {}",
                booking.tracking_code
            )));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn find_by_code(&self, tracking_code: &str) -> Result<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.tracking_code == tracking_code)
            .cloned())
    }

    async fn save(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        if !bookings.contains_key(&booking.id) {
            return Err(Error::NotFound("Booking not found".to_owned()));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Booking>> {
        Ok(self.bookings.write().await.remove(&id))
    }

    async fn list_all(&self) -> Result<Vec<Booking>> {
        let mut all: Vec<Booking> = self.bookings.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_paid_for_slot(
        &self,
        destination: &str,
        date: NaiveDate,
        departure_time: &str,
    ) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| {
                b.payment_status == PaymentStatus::Paid
                    && b.destination_city == destination
                    && b.departure_date == date
                    && b.departure_time == departure_time
            })
            .cloned()
            .collect())
    }
}
