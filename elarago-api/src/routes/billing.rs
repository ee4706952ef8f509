/// Billing endpoints
///
/// # Endpoints
///
/// - `GET /billing` - plan status view (plan, renewal formatted for display)
/// - `POST /checkout/6month` - hosted checkout session for the paid plan
/// - `POST /billing/portal` - self-service billing portal session
/// - `GET /checkout/success`, `GET /checkout/cancel` - redirect landings
///
/// Checkout and portal lazily provision the provider customer record: if the
/// user has no stored customer reference, one is created and persisted before
/// the session request. Missing billing configuration answers 503; provider
/// call failures answer 502.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use elarago_shared::{
    auth::AuthContext,
    billing::provider::StripeClient,
    models::user::{Plan, User},
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;

/// Billing status response
#[derive(Debug, Serialize)]
pub struct BillingStatusResponse {
    /// Account email
    pub email: String,

    /// Current plan
    pub plan: Plan,

    /// Renewal timestamp formatted for display (UTC), when known
    pub renewal: Option<String>,
}

/// Session initiation response
#[derive(Debug, Serialize)]
pub struct SessionUrlResponse {
    /// Provider-hosted page to redirect the browser to
    pub url: String,
}

/// Display format for the renewal timestamp
fn format_renewal(epoch_seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .map(|dt| dt.format("%b %d, %Y %I:%M %p").to_string())
}

/// Billing status handler
pub async fn billing_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<BillingStatusResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(BillingStatusResponse {
        email: user.email,
        plan: user.plan,
        renewal: user.plan_renewal.and_then(format_renewal),
    }))
}

/// Returns the user's provider customer reference, provisioning one if absent
///
/// The freshly created reference is persisted before the session request so
/// a retry never creates a second customer record.
async fn ensure_customer(
    pool: &PgPool,
    client: &StripeClient,
    user: &User,
) -> ApiResult<String> {
    if let Some(customer_ref) = &user.stripe_customer_id {
        return Ok(customer_ref.clone());
    }

    let customer_ref = client.create_customer(&user.email).await?;
    User::set_customer_ref(pool, user.id, &customer_ref).await?;

    Ok(customer_ref)
}

/// Checkout session handler for the six-month plan
///
/// # Errors
///
/// - `503 Service Unavailable`: billing credentials or price not configured
/// - `502 Bad Gateway`: the provider call failed
pub async fn checkout_6month(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<SessionUrlResponse>> {
    let client = state.billing_client()?;
    let price_ref = state
        .config
        .billing
        .price_6mo
        .as_deref()
        .ok_or(ApiError::BillingNotConfigured)?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let customer_ref = ensure_customer(&state.db, client, &user).await?;

    let base_url = &state.config.api.base_url;
    let url = client
        .create_checkout_session(
            &customer_ref,
            price_ref,
            user.id,
            &format!("{base_url}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}"),
            &format!("{base_url}/checkout/cancel"),
        )
        .await?;

    Ok(Json(SessionUrlResponse { url }))
}

/// Billing portal session handler
///
/// # Errors
///
/// - `503 Service Unavailable`: billing credentials not configured
/// - `502 Bad Gateway`: the provider call failed
pub async fn billing_portal(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<SessionUrlResponse>> {
    let client = state.billing_client()?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let customer_ref = ensure_customer(&state.db, client, &user).await?;

    let url = client
        .create_portal_session(
            &customer_ref,
            &format!("{}/billing", state.config.api.base_url),
        )
        .await?;

    Ok(Json(SessionUrlResponse { url }))
}

/// Landing for completed checkouts (the hosted page redirects here)
pub async fn checkout_success() -> Json<JsonValue> {
    Json(json!({"status": "success", "message": "Checkout completed."}))
}

/// Landing for abandoned checkouts
pub async fn checkout_cancel() -> Json<JsonValue> {
    Json(json!({"status": "canceled", "message": "Checkout canceled."}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_renewal() {
        // 2025-01-01T00:00:00Z
        assert_eq!(
            format_renewal(1_735_689_600).as_deref(),
            Some("Jan 01, 2025 12:00 AM")
        );
    }
}
