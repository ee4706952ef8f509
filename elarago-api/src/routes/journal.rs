/// Journal endpoints
///
/// # Endpoints
///
/// - `GET /api/journal` - list the caller's entries, newest first
/// - `POST /api/journal` - create an entry
///
/// Stress is validated to the 0..=10 range.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDate;
use elarago_shared::{
    auth::AuthContext,
    models::journal::{CreateJournalEntry, JournalEntry},
};
use serde::Deserialize;
use validator::Validate;

/// Journal entry request body
#[derive(Debug, Deserialize, Validate)]
pub struct JournalEntryRequest {
    /// Date the entry is for
    pub entry_date: NaiveDate,

    /// Mood label
    #[serde(default)]
    pub mood: Option<String>,

    /// Stress level
    #[validate(range(min = 0, max = 10, message = "Stress must be between 0 and 10"))]
    #[serde(default)]
    pub stress: i32,

    #[serde(default)]
    pub gratitude: Option<String>,

    #[serde(default)]
    pub highlight: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl From<JournalEntryRequest> for CreateJournalEntry {
    fn from(req: JournalEntryRequest) -> Self {
        CreateJournalEntry {
            entry_date: req.entry_date,
            mood: req.mood,
            stress: req.stress,
            gratitude: req.gratitude,
            highlight: req.highlight,
            notes: req.notes,
        }
    }
}

/// Lists the caller's journal entries
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<JournalEntry>>> {
    let entries = JournalEntry::list_for(&state.db, auth.user_id).await?;
    Ok(Json(entries))
}

/// Creates a journal entry for the caller
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<JournalEntryRequest>,
) -> ApiResult<(StatusCode, Json<JournalEntry>)> {
    req.validate()?;

    let entry = JournalEntry::create(&state.db, auth.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
