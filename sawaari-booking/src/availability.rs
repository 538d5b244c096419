use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use sawaari_catalog::inventory::{Seat, SeatRepository, SeatStatus};
use sawaari_catalog::pricing::PricingEngine;
use sawaari_catalog::routes::RouteRepository;
use sawaari_core::Result;

use crate::repository::BookingRepository;

/// One seat in the canonical read model the booking UI consumes.
#[derive(Debug, Clone, Serialize)]
pub struct SeatMapEntry {
    pub seat_id: String,
    pub deck: sawaari_catalog::inventory::Deck,
    pub row: i32,
    pub column: String,
    pub status: SeatStatus,
    pub is_blocked: bool,
    pub blocked_reason: Option<String>,
    pub blocked_until: Option<DateTime<Utc>>,
    /// Resolved selling price in paise. Present even for blocked seats.
    pub price: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatMap {
    pub route_id: Uuid,
    pub departure_time: String,
    pub travel_date: NaiveDate,
    pub total_seats: usize,
    pub seats: Vec<SeatMapEntry>,
}

/// Computes which seats are taken and merges inventory state with paid
/// occupancy into the seat map.
///
/// Occupancy counts Paid bookings only: Pending and Processing bookings
/// do not block seats, so two customers can hold the "same" seat until
/// one of them is verified. Conflicts surface at admin verification,
/// which happens one booking at a time.
pub struct AvailabilityResolver {
    bookings: Arc<dyn BookingRepository>,
    routes: Arc<dyn RouteRepository>,
    seats: Arc<dyn SeatRepository>,
    pricing: Arc<PricingEngine>,
}

impl AvailabilityResolver {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        routes: Arc<dyn RouteRepository>,
        seats: Arc<dyn SeatRepository>,
        pricing: Arc<PricingEngine>,
    ) -> Self {
        Self {
            bookings,
            routes,
            seats,
            pricing,
        }
    }

    /// Seat identifiers occupied for a (destination, travel date,
    /// departure time) slot, drawn from Paid bookings only.
    pub async fn occupied_seats(
        &self,
        destination: &str,
        date: NaiveDate,
        departure_time: &str,
    ) -> Result<Vec<String>> {
        let paid = self
            .bookings
            .list_paid_for_slot(destination, date, departure_time)
            .await?;

        let mut seen = HashSet::new();
        let mut occupied = Vec::new();
        for booking in paid {
            for seat_id in booking.selected_seats {
                if seen.insert(seat_id.clone()) {
                    occupied.push(seat_id);
                }
            }
        }
        Ok(occupied)
    }

    /// The merged seat map for a slot. Unknown routes yield an empty map
    /// rather than an error so the booking page can render a default
    /// state; a pricing lookup failure falls back to the stored seat
    /// price.
    pub async fn seat_map(
        &self,
        route_id: Uuid,
        departure_time: &str,
        travel_date: NaiveDate,
    ) -> Result<SeatMap> {
        let route = match self.routes.find(route_id).await? {
            Some(route) => route,
            None => {
                tracing::warn!(%route_id, "Seat map requested for unknown route");
                return Ok(SeatMap {
                    route_id,
                    departure_time: departure_time.to_owned(),
                    travel_date,
                    total_seats: 0,
                    seats: Vec::new(),
                });
            }
        };

        let occupied: HashSet<String> = self
            .occupied_seats(&route.destination, travel_date, departure_time)
            .await?
            .into_iter()
            .collect();

        let inventory = self.seats.list_slot(route_id, departure_time).await?;

        let mut entries = Vec::with_capacity(inventory.len());
        for seat in inventory {
            let price = match self
                .pricing
                .resolve(
                    route_id,
                    departure_time,
                    seat.deck,
                    travel_date,
                    seat.current_price,
                )
                .await
            {
                Ok(price) => price,
                Err(e) => {
                    tracing::warn!(seat_id = %seat.seat_id, error = %e, "Price resolution failed, using stored price");
                    seat.current_price
                }
            };

            entries.push(SeatMapEntry {
                status: derive_status(&seat, &occupied),
                seat_id: seat.seat_id,
                deck: seat.deck,
                row: seat.row,
                column: seat.column,
                is_blocked: seat.is_blocked,
                blocked_reason: seat.blocked_reason,
                blocked_until: seat.blocked_until,
                price,
            });
        }

        Ok(SeatMap {
            route_id,
            departure_time: departure_time.to_owned(),
            travel_date,
            total_seats: entries.len(),
            seats: entries,
        })
    }
}

/// Blocks win over everything; occupancy is derived from paid bookings
/// at query time, never stored.
fn derive_status(seat: &Seat, occupied: &HashSet<String>) -> SeatStatus {
    if seat.is_blocked {
        return SeatStatus::Blocked;
    }
    if seat.status == SeatStatus::Maintenance {
        return SeatStatus::Maintenance;
    }
    if occupied.contains(&seat.seat_id) {
        return SeatStatus::Occupied;
    }
    SeatStatus::Available
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawaari_catalog::inventory::{DeckPrices, SeatInventory};
    use sawaari_catalog::layout::SeatLayout;
    use sawaari_catalog::memory::{
        InMemoryRoutePriceRepository, InMemoryRouteRepository, InMemorySeatRepository,
    };
    use sawaari_catalog::pricing::NewRoutePrice;
    use sawaari_catalog::routes::RouteCatalog;
    use sawaari_core::identity::SessionIssuer;
    use sawaari_core::notify::{LogMailer, MemoryAssetStore, StoredAsset};
    use sawaari_shared::contact::ContactDetails;

    use crate::lifecycle::{BookingService, InitiateBooking};
    use crate::memory::InMemoryBookingRepository;
    use crate::models::{PaymentStatus, ProviderInfo};

    const TIME: &str = "07:00 AM";

    struct Fixture {
        service: BookingService,
        resolver: AvailabilityResolver,
        inventory: SeatInventory,
        pricing: Arc<PricingEngine>,
        route_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let routes = Arc::new(InMemoryRouteRepository::new());
        let seats = Arc::new(InMemorySeatRepository::new());
        let prices = Arc::new(InMemoryRoutePriceRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let pricing = Arc::new(PricingEngine::new(prices));

        let route = RouteCatalog::new(routes.clone())
            .add_route(
                "Dehradun",
                "Jaipur",
                vec![TIME.to_owned(), "11:00 AM".to_owned()],
            )
            .await
            .unwrap();

        let inventory = SeatInventory::new(seats.clone());
        inventory
            .initialize_slot(
                route.id,
                TIME,
                &SeatLayout::standard(),
                DeckPrices {
                    upper: 59900,
                    lower: 69900,
                },
            )
            .await
            .unwrap();

        let service = BookingService::new(
            bookings.clone(),
            routes.clone(),
            seats.clone(),
            pricing.clone(),
            SessionIssuer::new("test-secret", 3600),
            Arc::new(LogMailer),
            Arc::new(MemoryAssetStore::new()),
            "admin@example.com".to_owned(),
            ProviderInfo {
                name: "Sawaari Travels".to_owned(),
                phone: "9000000000".to_owned(),
                email: "support@example.com".to_owned(),
            },
        );

        let resolver =
            AvailabilityResolver::new(bookings, routes, seats, pricing.clone());

        Fixture {
            service,
            resolver,
            inventory,
            pricing,
            route_id: route.id,
        }
    }

    fn travel_date() -> NaiveDate {
        "2025-12-30".parse().unwrap()
    }

    async fn booked_session(fx: &Fixture) -> (Uuid, Uuid) {
        let initiated = fx
            .service
            .initiate(InitiateBooking {
                departure_city: "Dehradun".to_owned(),
                destination_city: "Jaipur".to_owned(),
                departure_date: travel_date(),
                departure_time: TIME.to_owned(),
                passengers: 2,
            })
            .await
            .unwrap();
        let guest = SessionIssuer::new("test-secret", 3600)
            .verify(&initiated.session_token)
            .unwrap();
        (initiated.booking_id, guest)
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Asha Rawat".to_owned(),
            phone: "9876543210".to_owned(),
            email: "asha@example.com".to_owned(),
        }
    }

    #[tokio::test]
    async fn occupancy_appears_only_after_the_paid_verdict() {
        let fx = fixture().await;
        let (booking_id, guest) = booked_session(&fx).await;

        fx.service
            .select_seats(
                booking_id,
                guest,
                vec!["U-A1".to_owned(), "U-B1".to_owned()],
                119800,
            )
            .await
            .unwrap();

        // Pending: nothing occupied.
        assert!(fx
            .resolver
            .occupied_seats("Jaipur", travel_date(), TIME)
            .await
            .unwrap()
            .is_empty());

        fx.service
            .submit_proof(
                booking_id,
                guest,
                contact(),
                StoredAsset {
                    url: "memory://proofs/p".to_owned(),
                    handle: "p".to_owned(),
                },
            )
            .await
            .unwrap();

        // Processing still does not occupy.
        assert!(fx
            .resolver
            .occupied_seats("Jaipur", travel_date(), TIME)
            .await
            .unwrap()
            .is_empty());

        fx.service
            .verify(booking_id, PaymentStatus::Paid)
            .await
            .unwrap();

        let occupied = fx
            .resolver
            .occupied_seats("Jaipur", travel_date(), TIME)
            .await
            .unwrap();
        assert_eq!(occupied, vec!["U-A1".to_owned(), "U-B1".to_owned()]);

        // A different slot on the same day stays clear.
        assert!(fx
            .resolver
            .occupied_seats("Jaipur", travel_date(), "11:00 AM")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn cancelled_bookings_never_occupy() {
        let fx = fixture().await;
        let (booking_id, guest) = booked_session(&fx).await;

        fx.service
            .select_seats(booking_id, guest, vec!["L-B2".to_owned()], 69900)
            .await
            .unwrap();
        fx.service
            .verify(booking_id, PaymentStatus::Cancelled)
            .await
            .unwrap();

        assert!(fx
            .resolver
            .occupied_seats("Jaipur", travel_date(), TIME)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn seat_map_merges_occupancy_blocks_and_prices() {
        let fx = fixture().await;
        let (booking_id, guest) = booked_session(&fx).await;

        fx.service
            .select_seats(booking_id, guest, vec!["U-A1".to_owned()], 59900)
            .await
            .unwrap();
        fx.service
            .verify(booking_id, PaymentStatus::Paid)
            .await
            .unwrap();

        fx.inventory
            .block_seat(fx.route_id, TIME, "U-B1", "Maintenance", None)
            .await
            .unwrap();

        let map = fx
            .resolver
            .seat_map(fx.route_id, TIME, travel_date())
            .await
            .unwrap();
        assert_eq!(map.total_seats, 32);

        let by_id = |id: &str| map.seats.iter().find(|s| s.seat_id == id).unwrap();

        assert_eq!(by_id("U-A1").status, SeatStatus::Occupied);
        assert_eq!(by_id("U-B1").status, SeatStatus::Blocked);
        assert_eq!(by_id("U-B1").blocked_reason.as_deref(), Some("Maintenance"));
        // Blocked seats keep a resolvable price.
        assert_eq!(by_id("U-B1").price, 59900);
        assert_eq!(by_id("U-C1").status, SeatStatus::Available);
        // Layout pre-blocked seat.
        assert_eq!(by_id("U-A2").status, SeatStatus::Blocked);
    }

    #[tokio::test]
    async fn seat_map_prices_reflect_an_active_override() {
        let fx = fixture().await;
        fx.pricing
            .create_override(NewRoutePrice {
                route_id: fx.route_id,
                departure_time: TIME.to_owned(),
                base_price_upper: 50000,
                base_price_lower: 60000,
                surge_multiplier: 1.5,
                effective_date: "2025-12-01".parse().unwrap(),
                expiry_date: "2025-12-31".parse().unwrap(),
            })
            .await
            .unwrap();

        let map = fx
            .resolver
            .seat_map(fx.route_id, TIME, travel_date())
            .await
            .unwrap();
        let upper = map.seats.iter().find(|s| s.seat_id == "U-A1").unwrap();
        assert_eq!(upper.price, 75000);
        let lower = map.seats.iter().find(|s| s.seat_id == "L-A1").unwrap();
        assert_eq!(lower.price, 90000);
    }

    #[tokio::test]
    async fn unknown_route_yields_an_empty_map() {
        let fx = fixture().await;
        let map = fx
            .resolver
            .seat_map(Uuid::new_v4(), TIME, travel_date())
            .await
            .unwrap();
        assert_eq!(map.total_seats, 0);
        assert!(map.seats.is_empty());
    }
}
