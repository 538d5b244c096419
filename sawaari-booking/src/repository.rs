use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use sawaari_core::Result;

use crate::models::Booking;

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with `Conflict` when the tracking code is already taken;
    /// the persistence layer enforces code uniqueness.
    async fn insert(&self, booking: &Booking) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<Booking>>;

    async fn find_by_code(&self, tracking_code: &str) -> Result<Option<Booking>>;

    /// Full-row update keyed by id. `NotFound` if missing.
    async fn save(&self, booking: &Booking) -> Result<()>;

    /// Hard delete; returns the removed booking so the caller can clean
    /// up the external proof asset.
    async fn delete(&self, id: Uuid) -> Result<Option<Booking>>;

    /// All bookings, newest first, for the admin dashboard.
    async fn list_all(&self) -> Result<Vec<Booking>>;

    /// Paid bookings for a (destination, travel date, departure time)
    /// slot. Occupancy derives from these alone.
    async fn list_paid_for_slot(
        &self,
        destination: &str,
        date: NaiveDate,
        departure_time: &str,
    ) -> Result<Vec<Booking>>;
}
