/// Provider webhook endpoint
///
/// # Endpoint
///
/// ```text
/// POST /webhook
/// Stripe-Signature: t=...,v1=...
/// ```
///
/// Receives the provider's event stream and hands parsed events to the
/// reconciler. Delivery is at-least-once and unordered; the reconciler is
/// idempotent, so this endpoint only has to be careful about three things:
///
/// - when a webhook secret is configured, the signature must verify before
///   anything is parsed or mutated (failure → 400, nothing written);
/// - without a secret, unsigned events are accepted (development only);
/// - a store failure answers 500 so the provider redelivers the event.
///
/// Processed and ignored events both answer 200: an event for an unknown
/// customer is unrelated test activity, not an error worth a retry storm.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use elarago_shared::billing::{
    event::parse_event,
    reconciler::{apply_event, Outcome},
    signature::{verify_signature, DEFAULT_TOLERANCE_SECS},
};
use serde::Serialize;
use tracing::warn;

/// Signature header the provider sends
const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Webhook acknowledgement body
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// Webhook handler
pub async fn provider_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    if let Some(secret) = &state.config.billing.webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::BadRequest("Missing signature header".to_string()))?;

        verify_signature(
            secret,
            signature,
            &body,
            Utc::now().timestamp(),
            DEFAULT_TOLERANCE_SECS,
        )
        .map_err(|e| {
            warn!(error = %e, "webhook signature verification failed");
            ApiError::BadRequest(format!("Signature verification failed: {}", e))
        })?;
    }

    let event = parse_event(&body)
        .map_err(|e| ApiError::BadRequest(format!("Unparseable event payload: {}", e)))?;

    // A store failure propagates as 500; the provider redelivers the event.
    let outcome = apply_event(&state.db, state.subscription_lookup(), event).await?;

    match outcome {
        Outcome::Applied | Outcome::Ignored => {
            Ok((StatusCode::OK, Json(WebhookResponse { received: true })))
        }
    }
}
