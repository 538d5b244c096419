use std::sync::Arc;

use sawaari_booking::availability::AvailabilityResolver;
use sawaari_booking::lifecycle::BookingService;
use sawaari_catalog::inventory::{DeckPrices, SeatInventory};
use sawaari_catalog::pricing::PricingEngine;
use sawaari_catalog::routes::{RouteCatalog, RouteRepository};
use sawaari_core::identity::SessionIssuer;
use sawaari_core::notify::AssetStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RouteCatalog>,
    pub inventory: Arc<SeatInventory>,
    pub pricing: Arc<PricingEngine>,
    pub bookings: Arc<BookingService>,
    pub availability: Arc<AvailabilityResolver>,
    pub routes: Arc<dyn RouteRepository>,
    pub sessions: SessionIssuer,
    pub assets: Arc<dyn AssetStore>,
    pub admin_token: String,
    /// Default per-deck seat prices used when seeding a slot; read from
    /// configuration per request.
    pub deck_prices: DeckPrices,
    pub allowed_origins: Vec<String>,
}
