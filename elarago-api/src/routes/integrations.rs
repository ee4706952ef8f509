/// Integration stub endpoints
///
/// Placeholders for integrations that are not built yet; each returns a
/// fixed "stub" payload.
///
/// # Endpoints
///
/// - `GET /integrations/calendar/connect`
/// - `GET /integrations/health/connect`

use axum::Json;
use serde::Serialize;

/// Stub response payload
#[derive(Debug, Serialize)]
pub struct StubResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Calendar integration stub
pub async fn connect_calendar() -> Json<StubResponse> {
    Json(StubResponse {
        status: "stub",
        message: "Google Calendar OAuth flow placeholder.",
    })
}

/// Health-data integration stub
pub async fn connect_health() -> Json<StubResponse> {
    Json(StubResponse {
        status: "stub",
        message: "Health integration placeholder.",
    })
}
