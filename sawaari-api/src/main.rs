use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sawaari_api::{app, AppState};
use sawaari_booking::availability::AvailabilityResolver;
use sawaari_booking::lifecycle::BookingService;
use sawaari_booking::models::ProviderInfo;
use sawaari_booking::repository::BookingRepository;
use sawaari_catalog::inventory::{DeckPrices, SeatInventory, SeatRepository};
use sawaari_catalog::pricing::{PricingEngine, RoutePriceRepository};
use sawaari_catalog::routes::{RouteCatalog, RouteRepository};
use sawaari_core::identity::SessionIssuer;
use sawaari_core::notify::{AssetStore, LogMailer, Mailer, MemoryAssetStore};
use sawaari_store::assets::HttpAssetStore;
use sawaari_store::booking_repo::PgBookingRepository;
use sawaari_store::mailer::SmtpMailer;
use sawaari_store::price_repo::PgRoutePriceRepository;
use sawaari_store::route_repo::PgRouteRepository;
use sawaari_store::seat_repo::PgSeatRepository;
use sawaari_store::DbClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sawaari_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sawaari_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Sawaari API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let route_repo: Arc<dyn RouteRepository> = Arc::new(PgRouteRepository::new(db.pool.clone()));
    let seat_repo: Arc<dyn SeatRepository> = Arc::new(PgSeatRepository::new(db.pool.clone()));
    let price_repo: Arc<dyn RoutePriceRepository> =
        Arc::new(PgRoutePriceRepository::new(db.pool.clone()));
    let booking_repo: Arc<dyn BookingRepository> =
        Arc::new(PgBookingRepository::new(db.pool.clone()));

    let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config(&config.mail) {
        Ok(Some(smtp)) => Arc::new(smtp),
        Ok(None) => {
            tracing::warn!("No SMTP host configured, notifications are log-only");
            Arc::new(LogMailer)
        }
        Err(e) => {
            tracing::warn!(error = %e, "SMTP setup failed, notifications are log-only");
            Arc::new(LogMailer)
        }
    };

    let assets: Arc<dyn AssetStore> = match HttpAssetStore::from_config(&config.assets) {
        Some(store) => Arc::new(store),
        None => {
            tracing::warn!("No asset store configured, proof uploads stay in memory");
            Arc::new(MemoryAssetStore::new())
        }
    };

    let sessions = SessionIssuer::new(&config.auth.jwt_secret, config.auth.session_ttl_seconds);
    let pricing = Arc::new(PricingEngine::new(price_repo));
    let provider = ProviderInfo {
        name: config.provider.name.clone(),
        phone: config.provider.phone.clone(),
        email: config.provider.email.clone(),
    };

    let bookings = Arc::new(BookingService::new(
        booking_repo.clone(),
        route_repo.clone(),
        seat_repo.clone(),
        pricing.clone(),
        sessions.clone(),
        mailer,
        assets.clone(),
        config.admin.email.clone(),
        provider,
    ));

    let availability = Arc::new(AvailabilityResolver::new(
        booking_repo,
        route_repo.clone(),
        seat_repo.clone(),
        pricing.clone(),
    ));

    let state = AppState {
        catalog: Arc::new(RouteCatalog::new(route_repo.clone())),
        inventory: Arc::new(SeatInventory::new(seat_repo)),
        pricing,
        bookings,
        availability,
        routes: route_repo,
        sessions,
        assets,
        admin_token: config.admin.token.clone(),
        deck_prices: DeckPrices {
            upper: config.pricing.base_price_upper,
            lower: config.pricing.base_price_lower,
        },
        allowed_origins: config.cors.allowed_origins.clone(),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
