use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sawaari_booking::lifecycle::InitiateBooking;
use sawaari_booking::models::{Booking, TrackingView};
use sawaari_core::notify::{AssetStore, ProofImage};
use sawaari_shared::contact::ContactDetails;

use crate::error::{invalid, ApiError};
use crate::middleware::auth::session_guest;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings/initiate", post(initiate_booking))
        .route("/api/bookings/{id}/seats", put(update_seats))
        .route("/api/bookings/{id}/submit", post(submit_proof))
        .route("/api/bookings/status/{ts}", get(track_booking))
        .route("/api/bookings/{id}/ts", get(tracking_code))
}

#[derive(Debug, Deserialize)]
struct InitiateRequest {
    departure_city: String,
    destination_city: String,
    departure_date: NaiveDate,
    departure_time: String,
    passengers: i32,
}

#[derive(Debug, Serialize)]
struct InitiateResponse {
    message: String,
    booking_id: Uuid,
    user_token: String,
    tracking_code: String,
}

async fn initiate_booking(
    State(state): State<AppState>,
    Json(req): Json<InitiateRequest>,
) -> Result<(StatusCode, Json<InitiateResponse>), ApiError> {
    let initiated = state
        .bookings
        .initiate(InitiateBooking {
            departure_city: req.departure_city,
            destination_city: req.destination_city,
            departure_date: req.departure_date,
            departure_time: req.departure_time,
            passengers: req.passengers,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InitiateResponse {
            message: "Booking initiated. Please select seats.".to_owned(),
            booking_id: initiated.booking_id,
            user_token: initiated.session_token,
            tracking_code: initiated.tracking_code,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct UpdateSeatsRequest {
    selected_seats: Vec<String>,
    total_amount: i32,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    message: String,
    booking: Booking,
}

async fn update_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateSeatsRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let guest = session_guest(&state, &headers)?;

    let booking = state
        .bookings
        .select_seats(id, guest, req.selected_seats, req.total_amount)
        .await?;

    Ok(Json(BookingResponse {
        message: "Seats and amount updated successfully".to_owned(),
        booking,
    }))
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    message: String,
    booking_id: Uuid,
    tracking_code: String,
}

/// Multipart submission: contact fields plus the payment screenshot.
/// The image is uploaded to the asset store first; if the booking
/// validation then fails, the upload is rolled back so no orphaned
/// assets accumulate.
async fn submit_proof(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    let guest = session_guest(&state, &headers)?;

    let mut name = None;
    let mut phone = None;
    let mut email = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid(&format!("Malformed multipart body: {}", e)))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("user_name") => name = Some(read_text(field).await?),
            Some("user_phone") => phone = Some(read_text(field).await?),
            Some("user_email") => email = Some(read_text(field).await?),
            Some("screenshot") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| invalid(&format!("Could not read screenshot: {}", e)))?;
                image = Some(ProofImage {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
            _ => continue,
        }
    }

    let image = image.ok_or_else(|| invalid("Missing payment screenshot file"))?;
    if image.bytes.is_empty() {
        return Err(invalid("Missing payment screenshot file"));
    }
    let contact = ContactDetails {
        name: name.ok_or_else(|| invalid("Missing user_name"))?,
        phone: phone.ok_or_else(|| invalid("Missing user_phone"))?,
        email: email.ok_or_else(|| invalid("Missing user_email"))?,
    };

    // Upload first, then validate against the booking; delete the
    // upload again if the submission is rejected.
    let asset = state.assets.upload(image, &id.to_string()).await?;

    match state
        .bookings
        .submit_proof(id, guest, contact, asset.clone())
        .await
    {
        Ok(booking) => Ok(Json(SubmitResponse {
            message: "Submission successful! Your payment is under verification.".to_owned(),
            booking_id: booking.id,
            tracking_code: booking.tracking_code,
        })),
        Err(e) => {
            if let Err(cleanup) = state.assets.delete(&asset.handle).await {
                tracing::warn!(error = %cleanup, "Orphaned proof cleanup failed");
            }
            Err(e.into())
        }
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| invalid(&format!("Malformed multipart field: {}", e)))
}

async fn track_booking(
    State(state): State<AppState>,
    Path(ts): Path<String>,
) -> Result<Json<TrackingView>, ApiError> {
    Ok(Json(state.bookings.track_by_code(&ts).await?))
}

#[derive(Debug, Serialize)]
struct TrackingCodeResponse {
    tracking_code: String,
}

async fn tracking_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackingCodeResponse>, ApiError> {
    Ok(Json(TrackingCodeResponse {
        tracking_code: state.bookings.tracking_code_of(id).await?,
    }))
}
