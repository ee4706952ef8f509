/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /signup` - create an account and a session
/// - `POST /login` - verify credentials and get a session
///
/// Emails are normalized to lowercase before storage and lookup, so signup
/// and login are case-insensitive on the email. A duplicate signup email
/// answers 409 and issues no session.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use elarago_shared::{
    auth::{password, session},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Response for both signup and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// User ID
    pub user_id: String,

    /// Bearer session token (30 days)
    pub session_token: String,
}

/// Signup handler
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: email already registered (no session is created)
/// - `500 Internal Server Error`: server error
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();
    let password_hash = password::hash_password(&req.password)?;

    // A duplicate email surfaces as a unique constraint violation and maps
    // to 409 before any session is issued.
    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
        },
    )
    .await?;

    let session_token = session::create_session_token(user.id, state.session_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user_id: user.id.to_string(),
            session_token,
        }),
    ))
}

/// Login handler
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `401 Unauthorized`: unknown email or wrong password
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate()?;

    let email = req.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let session_token = session::create_session_token(user.id, state.session_secret())?;

    Ok(Json(SessionResponse {
        user_id: user.id.to_string(),
        session_token,
    }))
}
