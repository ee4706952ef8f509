/// Goal collection endpoints
///
/// # Endpoints
///
/// - `GET /api/goals` - list the caller's goals
/// - `POST /api/goals` - create a goal
/// - `PUT /api/goals/:id` - update a goal (silent no-op for foreign ids)
/// - `DELETE /api/goals/:id` - delete a goal (same semantics)
///
/// Progress is validated to the 0..=100 range before any row is written.

use crate::{app::AppState, error::ApiResult, routes::OkResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use elarago_shared::{
    auth::AuthContext,
    models::goal::{CreateGoal, Goal},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Goal request body (create and update share the shape)
#[derive(Debug, Deserialize, Validate)]
pub struct GoalRequest {
    /// Goal text
    #[validate(length(min = 1, message = "Goal text is required"))]
    pub goal: String,

    /// Free-text action steps
    #[serde(default)]
    pub action_steps: Option<String>,

    /// Progress percentage
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    #[serde(default)]
    pub progress: i32,
}

impl From<GoalRequest> for CreateGoal {
    fn from(req: GoalRequest) -> Self {
        CreateGoal {
            goal: req.goal,
            action_steps: req.action_steps,
            progress: req.progress,
        }
    }
}

/// Lists the caller's goals
pub async fn list_goals(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = Goal::list_for(&state.db, auth.user_id).await?;
    Ok(Json(goals))
}

/// Creates a goal for the caller
pub async fn create_goal(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<GoalRequest>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    req.validate()?;

    let goal = Goal::create(&state.db, auth.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// Updates one of the caller's goals
pub async fn update_goal(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<GoalRequest>,
) -> ApiResult<Json<OkResponse>> {
    req.validate()?;

    Goal::update(&state.db, auth.user_id, id, req.into()).await?;
    Ok(Json(OkResponse::ok()))
}

/// Deletes one of the caller's goals
pub async fn delete_goal(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    Goal::delete(&state.db, auth.user_id, id).await?;
    Ok(Json(OkResponse::ok()))
}
