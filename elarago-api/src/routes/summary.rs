/// Dashboard summary endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/summary
/// ```
///
/// # Response
///
/// ```json
/// {
///   "Tasks Due Today": 2,
///   "Habits Completed This Week": 9,
///   "Goals In Progress": 3,
///   "Avg. Stress Level": 4.0
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use chrono::Utc;
use elarago_shared::{auth::AuthContext, summary::{dashboard_summary, DashboardSummary}};

/// Summary handler
///
/// Computes the four dashboard metrics for the caller as of today (UTC).
pub async fn summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardSummary>> {
    let today = Utc::now().date_naive();
    let summary = dashboard_summary(&state.db, auth.user_id, today).await?;

    Ok(Json(summary))
}
