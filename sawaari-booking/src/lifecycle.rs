use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use sawaari_catalog::inventory::SeatRepository;
use sawaari_catalog::pricing::PricingEngine;
use sawaari_catalog::routes::RouteRepository;
use sawaari_core::identity::{new_tracking_code, SessionIssuer};
use sawaari_core::notify::{AssetStore, Mailer, Notification, StoredAsset};
use sawaari_core::{Error, Result};
use sawaari_shared::contact::{is_valid_phone, ContactDetails};
use sawaari_shared::money::format_paise;

use crate::models::{Booking, PaymentStatus, ProviderInfo, TrackingView};
use crate::repository::BookingRepository;

// Tracking-code collisions are regenerated; the unique index is the
// final backstop when the retry budget runs out.
const TRACKING_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct InitiateBooking {
    pub departure_city: String,
    pub destination_city: String,
    pub departure_date: NaiveDate,
    pub departure_time: String,
    pub passengers: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiatedBooking {
    pub booking_id: Uuid,
    pub session_token: String,
    pub tracking_code: String,
}

/// Drives one reservation from initiation through seat selection, proof
/// submission, and the admin verdict. Mail side effects are fire and
/// forget: a delivery failure never rolls back the state change that
/// triggered it.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    routes: Arc<dyn RouteRepository>,
    seats: Arc<dyn SeatRepository>,
    pricing: Arc<PricingEngine>,
    sessions: SessionIssuer,
    mailer: Arc<dyn Mailer>,
    assets: Arc<dyn AssetStore>,
    admin_email: String,
    provider: ProviderInfo,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        routes: Arc<dyn RouteRepository>,
        seats: Arc<dyn SeatRepository>,
        pricing: Arc<PricingEngine>,
        sessions: SessionIssuer,
        mailer: Arc<dyn Mailer>,
        assets: Arc<dyn AssetStore>,
        admin_email: String,
        provider: ProviderInfo,
    ) -> Self {
        Self {
            bookings,
            routes,
            seats,
            pricing,
            sessions,
            mailer,
            assets,
            admin_email,
            provider,
        }
    }

    /// Create a Pending booking with no seats, a fresh unique tracking
    /// code, and a session credential scoped to this booking only.
    pub async fn initiate(&self, input: InitiateBooking) -> Result<InitiatedBooking> {
        if input.departure_city.trim().is_empty()
            || input.destination_city.trim().is_empty()
            || input.departure_time.trim().is_empty()
        {
            return Err(Error::InvalidInput(
                "Departure city, destination city, and time are required".to_owned(),
            ));
        }
        if input.passengers < 1 {
            return Err(Error::InvalidInput(
                "Passenger count must be at least one".to_owned(),
            ));
        }

        let guest_id = Uuid::new_v4();
        let booking_id = Uuid::new_v4();

        let mut last_err = None;
        for _ in 0..TRACKING_CODE_ATTEMPTS {
            let booking = Booking {
                id: booking_id,
                tracking_code: new_tracking_code(),
                guest_id,
                departure_city: input.departure_city.trim().to_owned(),
                destination_city: input.destination_city.trim().to_owned(),
                departure_date: input.departure_date,
                departure_time: input.departure_time.trim().to_owned(),
                passengers: input.passengers,
                selected_seats: Vec::new(),
                total_amount: 0,
                payment_status: PaymentStatus::Pending,
                contact: None,
                proof: None,
                created_at: Utc::now(),
            };

            match self.bookings.insert(&booking).await {
                Ok(()) => {
                    let session_token = self.sessions.issue(guest_id)?;
                    tracing::info!(
                        booking_id = %booking.id,
                        tracking_code = %booking.tracking_code,
                        "Booking initiated"
                    );
                    return Ok(InitiatedBooking {
                        booking_id: booking.id,
                        session_token,
                        tracking_code: booking.tracking_code,
                    });
                }
                Err(Error::Conflict(msg)) => {
                    tracing::warn!(%msg, "Tracking code collision, regenerating");
                    last_err = Some(Error::Conflict(msg));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            Error::Conflict("Could not allocate a unique tracking code".to_owned())
        }))
    }

    /// Overwrite the booking's seat selection with a fresh price
    /// snapshot. Every seat is priced server-side at this instant; the
    /// quoted client total must agree. The booking stays Pending;
    /// advancing to Processing happens only at proof submission.
    ///
    /// No occupancy or block check happens here: selection does not
    /// reserve, and conflicts surface only at admin verification.
    pub async fn select_seats(
        &self,
        booking_id: Uuid,
        guest: Uuid,
        seat_ids: Vec<String>,
        client_total: i32,
    ) -> Result<Booking> {
        if seat_ids.is_empty() {
            return Err(Error::InvalidInput("No seats selected".to_owned()));
        }
        let distinct: HashSet<&str> = seat_ids.iter().map(String::as_str).collect();
        if distinct.len() != seat_ids.len() {
            return Err(Error::InvalidInput(
                "Seat selection contains duplicates".to_owned(),
            ));
        }

        let mut booking = self.require(booking_id).await?;
        self.require_owner(&booking, guest)?;

        let route = self
            .routes
            .find_active_pair(&booking.departure_city, &booking.destination_city)
            .await?
            .ok_or_else(|| Error::NotFound("No active route for this trip".to_owned()))?;

        let mut total = 0i32;
        for seat_id in &seat_ids {
            let seat = self
                .seats
                .find(route.id, &booking.departure_time, seat_id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("Seat not found: {}", seat_id)))?;

            total += self
                .pricing
                .resolve(
                    route.id,
                    &booking.departure_time,
                    seat.deck,
                    booking.departure_date,
                    seat.current_price,
                )
                .await?;
        }

        if total != client_total {
            return Err(Error::InvalidInput(format!(
                "Quoted total {} does not match the current price {}",
                format_paise(client_total),
                format_paise(total)
            )));
        }

        booking.selected_seats = seat_ids;
        booking.total_amount = total;
        self.bookings.save(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            total_amount = booking.total_amount,
            seats = booking.selected_seats.len(),
            "Seats and amount updated"
        );
        Ok(booking)
    }

    /// Attach contact details and the uploaded proof asset, moving the
    /// booking to Processing. Re-submission while Processing overwrites
    /// both and stays Processing. The caller uploads the asset first and
    /// deletes it again if this returns an error.
    pub async fn submit_proof(
        &self,
        booking_id: Uuid,
        guest: Uuid,
        contact: ContactDetails,
        proof: StoredAsset,
    ) -> Result<Booking> {
        if !is_valid_phone(&contact.phone) {
            return Err(Error::InvalidInput(
                "Phone number must be exactly 10 digits".to_owned(),
            ));
        }

        let mut booking = self.require(booking_id).await?;
        self.require_owner(&booking, guest)?;

        if !booking.payment_status.accepts_proof() {
            return Err(Error::Conflict(
                "Booking has already received a verdict".to_owned(),
            ));
        }

        booking.payment_status = PaymentStatus::Processing;
        booking.contact = Some(contact);
        booking.proof = Some(proof);
        self.bookings.save(&booking).await?;

        if let Err(e) = self.mailer.send(self.admin_proof_mail(&booking)).await {
            tracing::warn!(booking_id = %booking.id, error = %e, "Admin notification failed");
        }

        tracing::info!(
            booking_id = %booking.id,
            tracking_code = %booking.tracking_code,
            "Payment proof submitted"
        );
        Ok(booking)
    }

    /// Admin verdict. Only Paid or Cancelled are accepted; the status is
    /// set unconditionally, so an admin may confirm a Pending booking
    /// whose proof arrived out of band.
    pub async fn verify(&self, booking_id: Uuid, verdict: PaymentStatus) -> Result<Booking> {
        if !verdict.is_verdict() {
            return Err(Error::InvalidInput("Invalid status provided".to_owned()));
        }

        let mut booking = self.require(booking_id).await?;
        booking.payment_status = verdict;
        self.bookings.save(&booking).await?;

        if let Some(mail) = self.customer_verdict_mail(&booking) {
            if let Err(e) = self.mailer.send(mail).await {
                tracing::warn!(booking_id = %booking.id, error = %e, "Customer notification failed");
            }
        }

        tracing::info!(booking_id = %booking.id, status = ?booking.payment_status, "Booking verified");
        Ok(booking)
    }

    /// Hard delete plus best-effort cleanup of the external proof asset.
    pub async fn remove(&self, booking_id: Uuid) -> Result<()> {
        let removed = self
            .bookings
            .delete(booking_id)
            .await?
            .ok_or_else(|| Error::NotFound("Booking not found".to_owned()))?;

        if let Some(proof) = &removed.proof {
            if let Err(e) = self.assets.delete(&proof.handle).await {
                tracing::warn!(booking_id = %removed.id, error = %e, "Proof asset cleanup failed");
            }
        }

        tracing::info!(booking_id = %removed.id, "Booking deleted");
        Ok(())
    }

    /// Public status lookup by tracking code.
    pub async fn track_by_code(&self, tracking_code: &str) -> Result<TrackingView> {
        let booking = self
            .bookings
            .find_by_code(tracking_code)
            .await?
            .ok_or_else(|| Error::NotFound("Tracking number not found".to_owned()))?;

        Ok(TrackingView {
            tracking_code: booking.tracking_code.clone(),
            status: booking.payment_status,
            amount: booking.total_amount,
            amount_display: format_paise(booking.total_amount),
            route: format!("{} → {}", booking.departure_city, booking.destination_city),
            travel_date: booking.departure_date,
            departure_time: booking.departure_time.clone(),
            seats: booking.selected_seats.clone(),
            contact: booking.contact.clone(),
            provider: self.provider.clone(),
        })
    }

    /// Look up the tracking code for a booking id.
    pub async fn tracking_code_of(&self, booking_id: Uuid) -> Result<String> {
        Ok(self.require(booking_id).await?.tracking_code)
    }

    /// All bookings for the admin dashboard, newest first.
    pub async fn list_all(&self) -> Result<Vec<Booking>> {
        self.bookings.list_all().await
    }

    async fn require(&self, booking_id: Uuid) -> Result<Booking> {
        self.bookings
            .find(booking_id)
            .await?
            .ok_or_else(|| Error::NotFound("Booking not found".to_owned()))
    }

    fn require_owner(&self, booking: &Booking, guest: Uuid) -> Result<()> {
        if booking.guest_id != guest {
            return Err(Error::Forbidden(
                "Booking does not belong to this session".to_owned(),
            ));
        }
        Ok(())
    }

    fn admin_proof_mail(&self, booking: &Booking) -> Notification {
        let contact = booking.contact.as_ref();
        let proof_url = booking
            .proof
            .as_ref()
            .map(|p| p.url.as_str())
            .unwrap_or("(missing)");

        Notification {
            to: self.admin_email.clone(),
            subject: format!(
                "ACTION REQUIRED: Payment verification for booking {}",
                booking.tracking_code
            ),
            body: format!(
                "A payment proof screenshot has been uploaded.\n\
                 Tracking code: {}\n\
                 Booking id: {}\n\
                 Customer: {} ({}, {})\n\
                 Trip: {} to {} on {} at {}\n\
                 Seats: {}\n\
                 Amount: {}\n\
                 Proof: {}\n\n\
                 Please verify the payment in the admin dashboard.",
                booking.tracking_code,
                booking.id,
                contact.map(|c| c.name.as_str()).unwrap_or("-"),
                contact.map(|c| c.phone.as_str()).unwrap_or("-"),
                contact.map(|c| c.email.as_str()).unwrap_or("-"),
                booking.departure_city,
                booking.destination_city,
                booking.departure_date,
                booking.departure_time,
                booking.selected_seats.join(", "),
                format_paise(booking.total_amount),
                proof_url,
            ),
        }
    }

    fn customer_verdict_mail(&self, booking: &Booking) -> Option<Notification> {
        let contact = booking.contact.as_ref()?;

        let (subject, outcome) = match booking.payment_status {
            PaymentStatus::Paid => (
                format!("Your e-ticket {} is confirmed", booking.tracking_code),
                "Your payment has been verified and your seats are confirmed.",
            ),
            PaymentStatus::Cancelled => (
                format!("Booking {} has been cancelled", booking.tracking_code),
                "Your booking could not be confirmed and has been cancelled.",
            ),
            _ => return None,
        };

        Some(Notification {
            to: contact.email.clone(),
            subject,
            body: format!(
                "Hello {},\n\n{}\n\n\
                 Trip: {} to {} on {} at {}\n\
                 Seats: {}\n\
                 Amount: {}\n\
                 Tracking code: {}\n\n\
                 {} · {}",
                contact.name,
                outcome,
                booking.departure_city,
                booking.destination_city,
                booking.departure_date,
                booking.departure_time,
                booking.selected_seats.join(", "),
                format_paise(booking.total_amount),
                booking.tracking_code,
                self.provider.name,
                self.provider.phone,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sawaari_catalog::inventory::{DeckPrices, SeatInventory};
    use sawaari_catalog::layout::SeatLayout;
    use sawaari_catalog::memory::{
        InMemoryRoutePriceRepository, InMemoryRouteRepository, InMemorySeatRepository,
    };
    use sawaari_core::notify::{LogMailer, MemoryAssetStore, ProofImage};
    use crate::memory::InMemoryBookingRepository;

    const TIME: &str = "07:00 AM";

    struct Fixture {
        service: BookingService,
        inventory: SeatInventory,
        assets: Arc<MemoryAssetStore>,
        route_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let routes = Arc::new(InMemoryRouteRepository::new());
        let seats = Arc::new(InMemorySeatRepository::new());
        let prices = Arc::new(InMemoryRoutePriceRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let assets = Arc::new(MemoryAssetStore::new());

        let catalog = sawaari_catalog::routes::RouteCatalog::new(routes.clone());
        let route = catalog
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
            bookings,
            routes,
            seats,
            Arc::new(PricingEngine::new(prices)),
            SessionIssuer::new("test-secret", 3600),
            Arc::new(LogMailer),
            assets.clone(),
            "admin@example.com".to_owned(),
            ProviderInfo {
                name: "Sawaari Travels".to_owned(),
                phone: "9000000000".to_owned(),
                email: "support@example.com".to_owned(),
            },
        );

        Fixture {
            service,
            inventory,
            assets,
            route_id: route.id,
        }
    }

    fn initiate_input() -> InitiateBooking {
        InitiateBooking {
            departure_city: "Dehradun".to_owned(),
            destination_city: "Jaipur".to_owned(),
            departure_date: "2025-12-30".parse().unwrap(),
            departure_time: TIME.to_owned(),
            passengers: 2,
        }
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Asha Rawat".to_owned(),
            phone: "9876543210".to_owned(),
            email: "asha@example.com".to_owned(),
        }
    }

    async fn initiate_and_verify_session(fx: &Fixture) -> (Uuid, Uuid, String) {
        let initiated = fx.service.initiate(initiate_input()).await.unwrap();
        let guest = SessionIssuer::new("test-secret", 3600)
            .verify(&initiated.session_token)
            .unwrap();
        (initiated.booking_id, guest, initiated.tracking_code)
    }

    #[tokio::test]
    async fn initiate_round_trips_pending_through_tracking() {
        let fx = fixture().await;
        let initiated = fx.service.initiate(initiate_input()).await.unwrap();

        assert_eq!(initiated.tracking_code.len(), 8);

        let view = fx
            .service
            .track_by_code(&initiated.tracking_code)
            .await
            .unwrap();
        assert_eq!(view.status, PaymentStatus::Pending);
        assert_eq!(view.amount, 0);
        assert_eq!(view.route, "Dehradun → Jaipur");
    }

    #[tokio::test]
    async fn initiate_validates_inputs() {
        let fx = fixture().await;

        let mut input = initiate_input();
        input.passengers = 0;
        assert!(matches!(
            fx.service.initiate(input).await,
            Err(Error::InvalidInput(_))
        ));

        let mut input = initiate_input();
        input.departure_city = "  ".to_owned();
        assert!(matches!(
            fx.service.initiate(input).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn tracking_codes_are_unique_across_bookings() {
        let fx = fixture().await;
        let mut codes = std::collections::HashSet::new();
        for _ in 0..25 {
            let initiated = fx.service.initiate(initiate_input()).await.unwrap();
            assert!(codes.insert(initiated.tracking_code));
        }
    }

    #[tokio::test]
    async fn select_seats_snapshots_the_server_price() {
        let fx = fixture().await;
        let (booking_id, guest, _) = initiate_and_verify_session(&fx).await;

        let booking = fx
            .service
            .select_seats(
                booking_id,
                guest,
                vec!["U-A1".to_owned(), "U-B1".to_owned()],
                119800,
            )
            .await
            .unwrap();

        assert_eq!(booking.total_amount, 119800);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);

        // A later price edit must not change the stored snapshot.
        fx.inventory
            .set_price(fx.route_id, TIME, "U-A1", 99900)
            .await
            .unwrap();
        let view = fx
            .service
            .track_by_code(&booking.tracking_code)
            .await
            .unwrap();
        assert_eq!(view.amount, 119800);
    }

    #[tokio::test]
    async fn select_seats_overwrites_rather_than_appends() {
        let fx = fixture().await;
        let (booking_id, guest, _) = initiate_and_verify_session(&fx).await;

        fx.service
            .select_seats(
                booking_id,
                guest,
                vec!["U-A1".to_owned(), "U-B1".to_owned()],
                119800,
            )
            .await
            .unwrap();

        let booking = fx
            .service
            .select_seats(booking_id, guest, vec!["L-B2".to_owned()], 69900)
            .await
            .unwrap();
        assert_eq!(booking.selected_seats, vec!["L-B2"]);
        assert_eq!(booking.total_amount, 69900);
    }

    #[tokio::test]
    async fn select_seats_rejects_bad_requests() {
        let fx = fixture().await;
        let (booking_id, guest, _) = initiate_and_verify_session(&fx).await;

        assert!(matches!(
            fx.service.select_seats(booking_id, guest, vec![], 0).await,
            Err(Error::InvalidInput(_))
        ));

        assert!(matches!(
            fx.service
                .select_seats(
                    booking_id,
                    guest,
                    vec!["U-A1".to_owned(), "U-A1".to_owned()],
                    119800
                )
                .await,
            Err(Error::InvalidInput(_))
        ));

        assert!(matches!(
            fx.service
                .select_seats(booking_id, Uuid::new_v4(), vec!["U-A1".to_owned()], 59900)
                .await,
            Err(Error::Forbidden(_))
        ));

        assert!(matches!(
            fx.service
                .select_seats(booking_id, guest, vec!["Z-99".to_owned()], 59900)
                .await,
            Err(Error::NotFound(_))
        ));

        // Stale quote: client total disagrees with the server price.
        assert!(matches!(
            fx.service
                .select_seats(booking_id, guest, vec!["U-A1".to_owned()], 100)
                .await,
            Err(Error::InvalidInput(_))
        ));

        assert!(matches!(
            fx.service
                .select_seats(Uuid::new_v4(), guest, vec!["U-A1".to_owned()], 59900)
                .await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn submit_proof_moves_to_processing_and_is_repeatable() {
        let fx = fixture().await;
        let (booking_id, guest, code) = initiate_and_verify_session(&fx).await;
        fx.service
            .select_seats(booking_id, guest, vec!["U-A1".to_owned()], 59900)
            .await
            .unwrap();

        let proof = fx
            .assets
            .upload(
                ProofImage {
                    bytes: vec![0xFF, 0xD8],
                    content_type: "image/jpeg".to_owned(),
                },
                "proof",
            )
            .await
            .unwrap();

        let booking = fx
            .service
            .submit_proof(booking_id, guest, contact(), proof)
            .await
            .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Processing);

        // Re-submission overwrites contact and proof, stays Processing.
        let second_proof = fx
            .assets
            .upload(
                ProofImage {
                    bytes: vec![0xFF, 0xD9],
                    content_type: "image/jpeg".to_owned(),
                },
                "proof",
            )
            .await
            .unwrap();
        let mut updated_contact = contact();
        updated_contact.phone = "9123456789".to_owned();

        let booking = fx
            .service
            .submit_proof(booking_id, guest, updated_contact, second_proof.clone())
            .await
            .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Processing);
        assert_eq!(booking.contact.as_ref().unwrap().phone, "9123456789");
        assert_eq!(booking.proof.as_ref().unwrap(), &second_proof);

        let view = fx.service.track_by_code(&code).await.unwrap();
        assert_eq!(view.status, PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn submit_proof_validates_phone_and_session() {
        let fx = fixture().await;
        let (booking_id, guest, _) = initiate_and_verify_session(&fx).await;

        let proof = StoredAsset {
            url: "memory://proofs/x".to_owned(),
            handle: "x".to_owned(),
        };

        let mut bad_phone = contact();
        bad_phone.phone = "12345".to_owned();
        assert!(matches!(
            fx.service
                .submit_proof(booking_id, guest, bad_phone, proof.clone())
                .await,
            Err(Error::InvalidInput(_))
        ));

        assert!(matches!(
            fx.service
                .submit_proof(booking_id, Uuid::new_v4(), contact(), proof.clone())
                .await,
            Err(Error::Forbidden(_))
        ));

        assert!(matches!(
            fx.service
                .submit_proof(Uuid::new_v4(), guest, contact(), proof)
                .await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn verify_rejects_non_verdict_statuses_without_mutation() {
        let fx = fixture().await;
        let (booking_id, _, code) = initiate_and_verify_session(&fx).await;

        for status in [PaymentStatus::Pending, PaymentStatus::Processing] {
            assert!(matches!(
                fx.service.verify(booking_id, status).await,
                Err(Error::InvalidInput(_))
            ));
        }

        let view = fx.service.track_by_code(&code).await.unwrap();
        assert_eq!(view.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn verify_may_jump_straight_from_pending() {
        let fx = fixture().await;
        let (booking_id, _, code) = initiate_and_verify_session(&fx).await;

        fx.service
            .verify(booking_id, PaymentStatus::Paid)
            .await
            .unwrap();

        let view = fx.service.track_by_code(&code).await.unwrap();
        assert_eq!(view.status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn proof_is_rejected_after_a_verdict() {
        let fx = fixture().await;
        let (booking_id, guest, _) = initiate_and_verify_session(&fx).await;

        fx.service
            .verify(booking_id, PaymentStatus::Cancelled)
            .await
            .unwrap();

        let proof = StoredAsset {
            url: "memory://proofs/x".to_owned(),
            handle: "x".to_owned(),
        };
        assert!(matches!(
            fx.service
                .submit_proof(booking_id, guest, contact(), proof)
                .await,
            Err(Error::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn remove_deletes_booking_and_proof_asset() {
        let fx = fixture().await;
        let (booking_id, guest, code) = initiate_and_verify_session(&fx).await;
        fx.service
            .select_seats(booking_id, guest, vec!["U-A1".to_owned()], 59900)
            .await
            .unwrap();

        let proof = fx
            .assets
            .upload(
                ProofImage {
                    bytes: vec![1],
                    content_type: "image/png".to_owned(),
                },
                "proof",
            )
            .await
            .unwrap();
        fx.service
            .submit_proof(booking_id, guest, contact(), proof)
            .await
            .unwrap();
        assert_eq!(fx.assets.stored_count(), 1);

        fx.service.remove(booking_id).await.unwrap();
        assert_eq!(fx.assets.stored_count(), 0);
        assert!(matches!(
            fx.service.track_by_code(&code).await,
            Err(Error::NotFound(_))
        ));

        assert!(matches!(
            fx.service.remove(booking_id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn tracking_code_lookup_by_id() {
        let fx = fixture().await;
        let (booking_id, _, code) = initiate_and_verify_session(&fx).await;

        assert_eq!(fx.service.tracking_code_of(booking_id).await.unwrap(), code);
        assert!(matches!(
            fx.service.tracking_code_of(Uuid::new_v4()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn admin_listing_is_newest_first() {
        let fx = fixture().await;
        let first = fx.service.initiate(initiate_input()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = fx.service.initiate(initiate_input()).await.unwrap();

        let all = fx.service.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.booking_id);
        assert_eq!(all[1].id, first.booking_id);
    }
}
