use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sawaari_booking::availability::SeatMap;
use sawaari_booking::models::{Booking, PaymentStatus};
use sawaari_catalog::inventory::Seat;
use sawaari_catalog::layout::SeatLayout;
use sawaari_catalog::pricing::{NewRoutePrice, RoutePrice};
use sawaari_catalog::routes::{Route, RouteRepository};
use sawaari_core::Error;

use crate::error::{invalid, ApiError};
use crate::middleware::auth::admin_auth_middleware;
use crate::state::AppState;

/// Admin surface. Every route here sits behind the shared-secret header
/// check.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Bookings
        .route("/api/admin/bookings", get(list_bookings))
        .route("/api/admin/bookings/{id}/verify", put(verify_booking))
        .route("/api/admin/bookings/{id}", delete(delete_booking))
        // Routes
        .route("/api/admin/routes", post(add_route))
        .route(
            "/api/admin/routes/{id}",
            put(update_route_times).delete(deactivate_route),
        )
        // Seats
        .route("/api/admin/seats/route/{route_id}", get(seats_for_route))
        .route("/api/admin/seats/initialize", post(initialize_seats))
        .route("/api/admin/seats/block", put(block_seat))
        .route("/api/admin/seats/unblock", put(unblock_seat))
        .route("/api/admin/seats/bulk-block", put(bulk_block_seats))
        .route("/api/admin/seats/price", put(set_seat_price))
        // Pricing
        .route("/api/admin/pricing/route/{route_id}", get(list_pricing))
        .route("/api/admin/pricing", post(create_pricing))
        .route("/api/admin/pricing/{id}", delete(delete_pricing))
        .route_layer(middleware::from_fn_with_state(
            state,
            admin_auth_middleware,
        ))
}

// ----------------------------------------------------------------------
// Bookings
// ----------------------------------------------------------------------

async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.list_all().await?))
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    status: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

async fn verify_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status: PaymentStatus = req
        .status
        .parse()
        .map_err(|_| invalid("Invalid status provided"))?;

    let booking = state.bookings.verify(id, status).await?;

    Ok(Json(MessageResponse {
        message: format!(
            "Booking {} status updated to {}",
            booking.id, booking.payment_status
        ),
    }))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.bookings.remove(id).await?;
    Ok(Json(MessageResponse {
        message: format!("Booking {} and associated data deleted", id),
    }))
}

// ----------------------------------------------------------------------
// Routes
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AddRouteRequest {
    departure: String,
    destination: String,
    available_times: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    message: String,
    route: Route,
}

async fn add_route(
    State(state): State<AppState>,
    Json(req): Json<AddRouteRequest>,
) -> Result<(StatusCode, Json<RouteResponse>), ApiError> {
    let route = state
        .catalog
        .add_route(&req.departure, &req.destination, req.available_times)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RouteResponse {
            message: "New route added successfully".to_owned(),
            route,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct UpdateTimesRequest {
    available_times: Vec<String>,
}

async fn update_route_times(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTimesRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let route = state.catalog.update_times(id, req.available_times).await?;
    Ok(Json(RouteResponse {
        message: "Route timings updated successfully".to_owned(),
        route,
    }))
}

async fn deactivate_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.deactivate(id).await?;
    Ok(Json(MessageResponse {
        message: "Route successfully deactivated".to_owned(),
    }))
}

// ----------------------------------------------------------------------
// Seats
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SlotQuery {
    departure_time: String,
    departure_date: NaiveDate,
}

async fn seats_for_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SeatMap>, ApiError> {
    let map = state
        .availability
        .seat_map(route_id, &query.departure_time, query.departure_date)
        .await?;
    Ok(Json(map))
}

#[derive(Debug, Deserialize)]
struct InitializeSeatsRequest {
    route_id: Uuid,
    /// Seed only this slot when present; all of the route's times
    /// otherwise.
    departure_time: Option<String>,
}

#[derive(Debug, Serialize)]
struct InitializeSeatsResponse {
    message: String,
    created: usize,
    refreshed: usize,
}

async fn initialize_seats(
    State(state): State<AppState>,
    Json(req): Json<InitializeSeatsRequest>,
) -> Result<Json<InitializeSeatsResponse>, ApiError> {
    let route = state
        .routes
        .find(req.route_id)
        .await?
        .ok_or_else(|| ApiError(Error::NotFound("Route not found".to_owned())))?;

    let times = match req.departure_time {
        Some(time) => vec![time],
        None => route.available_times.clone(),
    };

    let layout = SeatLayout::standard();
    let mut created = 0;
    let mut refreshed = 0;
    for time in &times {
        let report = state
            .inventory
            .initialize_slot(route.id, time, &layout, state.deck_prices)
            .await?;
        created += report.created;
        refreshed += report.refreshed;
    }

    Ok(Json(InitializeSeatsResponse {
        message: format!("Seats initialized for {} slot(s)", times.len()),
        created,
        refreshed,
    }))
}

#[derive(Debug, Deserialize)]
struct BlockSeatRequest {
    route_id: Uuid,
    departure_time: String,
    seat_id: String,
    reason: String,
    until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct SeatResponse {
    message: String,
    seat: Seat,
}

async fn block_seat(
    State(state): State<AppState>,
    Json(req): Json<BlockSeatRequest>,
) -> Result<Json<SeatResponse>, ApiError> {
    let seat = state
        .inventory
        .block_seat(
            req.route_id,
            &req.departure_time,
            &req.seat_id,
            &req.reason,
            req.until,
        )
        .await?;
    Ok(Json(SeatResponse {
        message: format!("Seat {} blocked", seat.seat_id),
        seat,
    }))
}

#[derive(Debug, Deserialize)]
struct UnblockSeatRequest {
    route_id: Uuid,
    departure_time: String,
    seat_id: String,
}

async fn unblock_seat(
    State(state): State<AppState>,
    Json(req): Json<UnblockSeatRequest>,
) -> Result<Json<SeatResponse>, ApiError> {
    let seat = state
        .inventory
        .unblock_seat(req.route_id, &req.departure_time, &req.seat_id)
        .await?;
    Ok(Json(SeatResponse {
        message: format!("Seat {} unblocked", seat.seat_id),
        seat,
    }))
}

#[derive(Debug, Deserialize)]
struct BulkBlockRequest {
    route_id: Uuid,
    departure_time: String,
    seat_ids: Vec<String>,
    reason: String,
    until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct BulkBlockResponse {
    message: String,
    modified: usize,
}

async fn bulk_block_seats(
    State(state): State<AppState>,
    Json(req): Json<BulkBlockRequest>,
) -> Result<Json<BulkBlockResponse>, ApiError> {
    let modified = state
        .inventory
        .bulk_block(
            req.route_id,
            &req.departure_time,
            &req.seat_ids,
            &req.reason,
            req.until,
        )
        .await?;
    Ok(Json(BulkBlockResponse {
        message: format!("{} seat(s) blocked", modified),
        modified,
    }))
}

#[derive(Debug, Deserialize)]
struct SetPriceRequest {
    route_id: Uuid,
    departure_time: String,
    seat_id: String,
    new_price: i32,
}

async fn set_seat_price(
    State(state): State<AppState>,
    Json(req): Json<SetPriceRequest>,
) -> Result<Json<SeatResponse>, ApiError> {
    let seat = state
        .inventory
        .set_price(
            req.route_id,
            &req.departure_time,
            &req.seat_id,
            req.new_price,
        )
        .await?;
    Ok(Json(SeatResponse {
        message: format!("Seat {} price updated", seat.seat_id),
        seat,
    }))
}

// ----------------------------------------------------------------------
// Pricing
// ----------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PricingListResponse {
    pricing: Vec<RoutePrice>,
}

async fn list_pricing(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<PricingListResponse>, ApiError> {
    Ok(Json(PricingListResponse {
        pricing: state.pricing.list_for_route(route_id).await?,
    }))
}

#[derive(Debug, Serialize)]
struct PricingResponse {
    message: String,
    price: RoutePrice,
}

async fn create_pricing(
    State(state): State<AppState>,
    Json(req): Json<NewRoutePrice>,
) -> Result<(StatusCode, Json<PricingResponse>), ApiError> {
    let price = state.pricing.create_override(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(PricingResponse {
            message: "Pricing record created".to_owned(),
            price,
        }),
    ))
}

async fn delete_pricing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.pricing.remove_override(id).await?;
    Ok(Json(MessageResponse {
        message: "Pricing record deleted".to_owned(),
    }))
}
