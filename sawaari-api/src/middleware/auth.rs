use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{forbidden, ApiError};
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
pub const USER_TOKEN_HEADER: &str = "x-user-token";

/// Gate for the admin surface: a static shared-secret header, compared
/// against the configured token.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(token) if token == state.admin_token => Ok(next.run(req).await),
        _ => Err(forbidden("Admin access denied")),
    }
}

/// Resolve the per-booking guest id from the session token header.
/// Handlers still compare it against the booking row they load.
pub fn session_guest(state: &AppState, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let token = headers
        .get(USER_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| forbidden("No session token provided"))?;

    Ok(state.sessions.verify(token)?)
}
