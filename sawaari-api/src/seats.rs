use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sawaari_booking::availability::SeatMap;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/seats/occupied", get(occupied_seats))
        .route("/api/seats/availability/{route_id}", get(seat_availability))
}

#[derive(Debug, Deserialize)]
struct OccupiedQuery {
    destination: String,
    date: NaiveDate,
    time: String,
}

#[derive(Debug, Serialize)]
struct OccupiedResponse {
    occupied_seats: Vec<String>,
}

/// Seats taken for a slot, derived from Paid bookings only.
async fn occupied_seats(
    State(state): State<AppState>,
    Query(query): Query<OccupiedQuery>,
) -> Result<Json<OccupiedResponse>, ApiError> {
    let occupied = state
        .availability
        .occupied_seats(&query.destination, query.date, &query.time)
        .await?;

    Ok(Json(OccupiedResponse {
        occupied_seats: occupied,
    }))
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    departure_time: String,
    departure_date: NaiveDate,
}

/// The merged seat map the seat-selection page renders.
async fn seat_availability(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<SeatMap>, ApiError> {
    let map = state
        .availability
        .seat_map(route_id, &query.departure_time, query.departure_date)
        .await?;
    Ok(Json(map))
}
