/// Task collection endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks` - list the caller's tasks, most urgent first
/// - `POST /api/tasks` - create a task
/// - `PUT /api/tasks/:id` - update a task (silent no-op for foreign ids)
/// - `DELETE /api/tasks/:id` - delete a task (same semantics)

use crate::{app::AppState, error::ApiResult, routes::OkResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use elarago_shared::{
    auth::AuthContext,
    models::task::{CreateTask, Task, UpdateTask},
};
use uuid::Uuid;

/// Lists the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_for(&state.db, auth.user_id).await?;
    Ok(Json(tasks))
}

/// Creates a task for the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(data): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = Task::create(&state.db, auth.user_id, data).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Updates one of the caller's tasks
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTask>,
) -> ApiResult<Json<OkResponse>> {
    Task::update(&state.db, auth.user_id, id, data).await?;
    Ok(Json(OkResponse::ok()))
}

/// Deletes one of the caller's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    Task::delete(&state.db, auth.user_id, id).await?;
    Ok(Json(OkResponse::ok()))
}
