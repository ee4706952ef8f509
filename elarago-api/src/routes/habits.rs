/// Habit collection endpoints
///
/// # Endpoints
///
/// - `GET /api/habits` - list the caller's habits
/// - `POST /api/habits` - create a habit (day flags default to unchecked)
/// - `PUT /api/habits/:id` - update a habit (silent no-op for foreign ids)
/// - `DELETE /api/habits/:id` - delete a habit (same semantics)

use crate::{app::AppState, error::ApiResult, routes::OkResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use elarago_shared::{
    auth::AuthContext,
    models::habit::{CreateHabit, Habit, UpdateHabit},
};
use uuid::Uuid;

/// Lists the caller's habits
pub async fn list_habits(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Habit>>> {
    let habits = Habit::list_for(&state.db, auth.user_id).await?;
    Ok(Json(habits))
}

/// Creates a habit for the caller
pub async fn create_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateHabit>,
) -> ApiResult<(StatusCode, Json<Habit>)> {
    let habit = Habit::create(&state.db, auth.user_id, data).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

/// Updates one of the caller's habits
pub async fn update_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateHabit>,
) -> ApiResult<Json<OkResponse>> {
    Habit::update(&state.db, auth.user_id, id, data).await?;
    Ok(Json(OkResponse::ok()))
}

/// Deletes one of the caller's habits
pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    Habit::delete(&state.db, auth.user_id, id).await?;
    Ok(Json(OkResponse::ok()))
}
