use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use sawaari_core::{Error, Result};

use crate::layout::{SeatLayout, LAYOUT_BLOCK_REASON};

/// Physical seating level in the coach.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Deck {
    Upper,
    Lower,
}

impl Deck {
    pub fn initial(&self) -> char {
        match self {
            Deck::Upper => 'U',
            Deck::Lower => 'L',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Deck::Upper => "Upper",
            Deck::Lower => "Lower",
        }
    }
}

/// Stored seat state. `Occupied` is additionally derived from paid
/// bookings at query time; the stored value never transitions there on
/// its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Occupied,
    Blocked,
    Maintenance,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatCategory {
    Standard,
    Premium,
    Accessible,
}

impl std::str::FromStr for Deck {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Upper" => Ok(Deck::Upper),
            "Lower" => Ok(Deck::Lower),
            other => Err(Error::Storage(format!("Unknown deck: {}", other))),
        }
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Occupied => "occupied",
            SeatStatus::Blocked => "blocked",
            SeatStatus::Maintenance => "maintenance",
        }
    }
}

impl std::str::FromStr for SeatStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "available" => Ok(SeatStatus::Available),
            "occupied" => Ok(SeatStatus::Occupied),
            "blocked" => Ok(SeatStatus::Blocked),
            "maintenance" => Ok(SeatStatus::Maintenance),
            other => Err(Error::Storage(format!("Unknown seat status: {}", other))),
        }
    }
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SeatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatCategory::Standard => "standard",
            SeatCategory::Premium => "premium",
            SeatCategory::Accessible => "accessible",
        }
    }
}

impl std::str::FromStr for SeatCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(SeatCategory::Standard),
            "premium" => Ok(SeatCategory::Premium),
            "accessible" => Ok(SeatCategory::Accessible),
            other => Err(Error::Storage(format!("Unknown seat category: {}", other))),
        }
    }
}

impl std::fmt::Display for SeatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One seat of one (route, departure time) slot. Uniquely keyed by
/// `(route_id, departure_time, seat_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub route_id: Uuid,
    pub departure_time: String,
    pub seat_id: String,
    pub deck: Deck,
    pub row: i32,
    pub column: String,
    /// Price in paise as seeded from the layout. Kept untouched by admin
    /// price edits so a later reset stays possible.
    pub base_price: i32,
    /// Price in paise actually charged when no route-level override applies.
    pub current_price: i32,
    pub category: SeatCategory,
    pub status: SeatStatus,
    pub is_blocked: bool,
    pub blocked_reason: Option<String>,
    pub blocked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for seat data access
#[async_trait]
pub trait SeatRepository: Send + Sync {
    /// Fails with `Conflict` when the compound key already exists.
    async fn insert(&self, seat: &Seat) -> Result<()>;

    async fn find(&self, route_id: Uuid, departure_time: &str, seat_id: &str)
        -> Result<Option<Seat>>;

    async fn list_slot(&self, route_id: Uuid, departure_time: &str) -> Result<Vec<Seat>>;

    /// Full-row update keyed by the compound key. `NotFound` if missing.
    async fn save(&self, seat: &Seat) -> Result<()>;
}

/// Per-deck base prices in paise, passed in explicitly per seeding call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeckPrices {
    pub upper: i32,
    pub lower: i32,
}

impl DeckPrices {
    pub fn for_deck(&self, deck: Deck) -> i32 {
        match deck {
            Deck::Upper => self.upper,
            Deck::Lower => self.lower,
        }
    }
}

/// Outcome of a slot seeding run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SlotSeedReport {
    pub created: usize,
    pub refreshed: usize,
}

/// Seat inventory operations for one slot at a time.
pub struct SeatInventory {
    seats: Arc<dyn SeatRepository>,
}

impl SeatInventory {
    pub fn new(seats: Arc<dyn SeatRepository>) -> Self {
        Self { seats }
    }

    /// Seed a (route, departure time) slot from the fixed deck layout.
    ///
    /// Existence-guarded: missing seats are created (layout pre-blocked
    /// positions start out Blocked with the default reason); seats that
    /// already exist only get their layout-declared fields refreshed
    /// (deck/row/column/base price). Status, block flags, and admin-edited
    /// current prices survive re-runs.
    pub async fn initialize_slot(
        &self,
        route_id: Uuid,
        departure_time: &str,
        layout: &SeatLayout,
        prices: DeckPrices,
    ) -> Result<SlotSeedReport> {
        if prices.upper <= 0 || prices.lower <= 0 {
            return Err(Error::InvalidInput(
                "Deck base prices must be positive".to_owned(),
            ));
        }

        let mut report = SlotSeedReport {
            created: 0,
            refreshed: 0,
        };

        for position in layout.positions() {
            let base_price = prices.for_deck(position.deck);

            match self
                .seats
                .find(route_id, departure_time, &position.seat_id)
                .await?
            {
                None => {
                    let seat = Seat {
                        route_id,
                        departure_time: departure_time.to_owned(),
                        seat_id: position.seat_id.clone(),
                        deck: position.deck,
                        row: position.row,
                        column: position.column.clone(),
                        base_price,
                        current_price: base_price,
                        category: SeatCategory::Standard,
                        status: if position.pre_blocked {
                            SeatStatus::Blocked
                        } else {
                            SeatStatus::Available
                        },
                        is_blocked: position.pre_blocked,
                        blocked_reason: position
                            .pre_blocked
                            .then(|| LAYOUT_BLOCK_REASON.to_owned()),
                        blocked_until: None,
                        created_at: Utc::now(),
                    };
                    self.seats.insert(&seat).await?;
                    report.created += 1;
                }
                Some(mut existing) => {
                    existing.deck = position.deck;
                    existing.row = position.row;
                    existing.column = position.column.clone();
                    existing.base_price = base_price;
                    self.seats.save(&existing).await?;
                    report.refreshed += 1;
                }
            }
        }

        tracing::info!(
            %route_id,
            departure_time,
            created = report.created,
            refreshed = report.refreshed,
            "Seat slot seeded"
        );
        Ok(report)
    }

    /// Mark a seat blocked. Always succeeds for an existing seat; a seat
    /// with a confirmed booking can still be blocked, which only affects
    /// future availability computation.
    pub async fn block_seat(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_id: &str,
        reason: &str,
        until: Option<DateTime<Utc>>,
    ) -> Result<Seat> {
        let mut seat = self.require(route_id, departure_time, seat_id).await?;

        seat.is_blocked = true;
        seat.status = SeatStatus::Blocked;
        seat.blocked_reason = Some(reason.to_owned());
        seat.blocked_until = until;
        self.seats.save(&seat).await?;
        Ok(seat)
    }

    /// Clear a block. Idempotent: unblocking an available seat is a no-op
    /// success.
    pub async fn unblock_seat(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_id: &str,
    ) -> Result<Seat> {
        let mut seat = self.require(route_id, departure_time, seat_id).await?;

        seat.is_blocked = false;
        seat.status = SeatStatus::Available;
        seat.blocked_reason = None;
        seat.blocked_until = None;
        self.seats.save(&seat).await?;
        Ok(seat)
    }

    /// Block many seats in one call. Unknown seat ids are silently
    /// skipped; returns the number actually modified.
    pub async fn bulk_block(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_ids: &[String],
        reason: &str,
        until: Option<DateTime<Utc>>,
    ) -> Result<usize> {
        let mut modified = 0;
        for seat_id in seat_ids {
            match self.seats.find(route_id, departure_time, seat_id).await? {
                Some(mut seat) => {
                    seat.is_blocked = true;
                    seat.status = SeatStatus::Blocked;
                    seat.blocked_reason = Some(reason.to_owned());
                    seat.blocked_until = until;
                    self.seats.save(&seat).await?;
                    modified += 1;
                }
                None => continue,
            }
        }
        Ok(modified)
    }

    /// Overwrite the current price only; the seeded base price stays so a
    /// later reset is possible.
    pub async fn set_price(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_id: &str,
        new_price: i32,
    ) -> Result<Seat> {
        if new_price <= 0 {
            return Err(Error::InvalidInput("Price must be positive".to_owned()));
        }

        let mut seat = self.require(route_id, departure_time, seat_id).await?;
        seat.current_price = new_price;
        self.seats.save(&seat).await?;
        Ok(seat)
    }

    pub async fn list_slot(&self, route_id: Uuid, departure_time: &str) -> Result<Vec<Seat>> {
        self.seats.list_slot(route_id, departure_time).await
    }

    async fn require(
        &self,
        route_id: Uuid,
        departure_time: &str,
        seat_id: &str,
    ) -> Result<Seat> {
        self.seats
            .find(route_id, departure_time, seat_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Seat not found: {}", seat_id)))
    }
}
