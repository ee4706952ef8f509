/// Webhook event parsing
///
/// Parses the provider's JSON envelope (`{"type": ..., "data": {"object":
/// ...}}`) into a typed [`BillingEvent`]. Parsing is deliberately lenient:
/// fields the provider may omit become `None`, and event kinds this system
/// does not handle (or recognized kinds missing the reference needed to act)
/// become [`BillingEvent::Ignored`] rather than errors. Only a payload that
/// is not valid JSON (or has no `type`) is a parse failure.

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Parse errors for webhook payloads
#[derive(Debug, thiserror::Error)]
pub enum EventParseError {
    /// Payload is not valid JSON
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Payload has no event type
    #[error("Payload has no event type")]
    MissingType,
}

/// A billing event, as far as this system cares about it
#[derive(Debug, Clone, PartialEq)]
pub enum BillingEvent {
    /// A hosted checkout completed for one of our users
    ///
    /// `user_ref` is the client reference we attached when creating the
    /// session; the provider echoes it back.
    CheckoutCompleted {
        user_ref: Option<String>,
        customer_ref: Option<String>,
        subscription_ref: Option<String>,
    },

    /// A subscription was created or updated
    SubscriptionUpserted {
        customer_ref: String,
        subscription_ref: String,
        status: String,
        period_end: Option<i64>,
    },

    /// A subscription was deleted
    SubscriptionDeleted { customer_ref: String },

    /// Any event kind this system does not act on
    Ignored { kind: String },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,

    #[serde(default)]
    data: EnvelopeData,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    object: JsonValue,
}

fn str_field(object: &JsonValue, key: &str) -> Option<String> {
    object.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Parses a raw webhook payload into a [`BillingEvent`]
///
/// # Errors
///
/// Returns [`EventParseError`] only for malformed payloads; unrecognized
/// event kinds parse successfully as [`BillingEvent::Ignored`].
pub fn parse_event(payload: &[u8]) -> Result<BillingEvent, EventParseError> {
    let envelope: Envelope = serde_json::from_slice(payload)?;
    let kind = envelope.kind.ok_or(EventParseError::MissingType)?;
    let object = &envelope.data.object;

    let event = match kind.as_str() {
        "checkout.session.completed" => BillingEvent::CheckoutCompleted {
            user_ref: str_field(object, "client_reference_id"),
            customer_ref: str_field(object, "customer"),
            subscription_ref: str_field(object, "subscription"),
        },

        "customer.subscription.created" | "customer.subscription.updated" => {
            // Without a customer and subscription reference there is nothing
            // to reconcile against.
            match (str_field(object, "customer"), str_field(object, "id")) {
                (Some(customer_ref), Some(subscription_ref)) => {
                    BillingEvent::SubscriptionUpserted {
                        customer_ref,
                        subscription_ref,
                        status: str_field(object, "status").unwrap_or_default(),
                        period_end: object.get("current_period_end").and_then(|v| v.as_i64()),
                    }
                }
                _ => BillingEvent::Ignored { kind },
            }
        }

        "customer.subscription.deleted" => match str_field(object, "customer") {
            Some(customer_ref) => BillingEvent::SubscriptionDeleted { customer_ref },
            None => BillingEvent::Ignored { kind },
        },

        _ => BillingEvent::Ignored { kind },
    };

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_checkout_completed() {
        let payload = json!({
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "client_reference_id": "4b1c0b86-30f1-44e5-ba4f-f9a9e1afeef9",
                    "customer": "cus_123",
                    "subscription": "sub_456"
                }
            }
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert_eq!(
            event,
            BillingEvent::CheckoutCompleted {
                user_ref: Some("4b1c0b86-30f1-44e5-ba4f-f9a9e1afeef9".to_string()),
                customer_ref: Some("cus_123".to_string()),
                subscription_ref: Some("sub_456".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_checkout_completed_without_references() {
        // The provider may send events for unrelated test activity
        let payload = json!({
            "type": "checkout.session.completed",
            "data": {"object": {}}
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert_eq!(
            event,
            BillingEvent::CheckoutCompleted {
                user_ref: None,
                customer_ref: None,
                subscription_ref: None,
            }
        );
    }

    #[test]
    fn test_parse_subscription_updated() {
        let payload = json!({
            "type": "customer.subscription.updated",
            "data": {
                "object": {
                    "id": "sub_456",
                    "customer": "cus_123",
                    "status": "active",
                    "current_period_end": 1735689600
                }
            }
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert_eq!(
            event,
            BillingEvent::SubscriptionUpserted {
                customer_ref: "cus_123".to_string(),
                subscription_ref: "sub_456".to_string(),
                status: "active".to_string(),
                period_end: Some(1735689600),
            }
        );
    }

    #[test]
    fn test_parse_subscription_created_same_as_updated() {
        let payload = json!({
            "type": "customer.subscription.created",
            "data": {
                "object": {"id": "sub_1", "customer": "cus_1", "status": "trialing"}
            }
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert!(matches!(
            event,
            BillingEvent::SubscriptionUpserted { period_end: None, .. }
        ));
    }

    #[test]
    fn test_parse_subscription_upsert_without_customer_is_ignored() {
        let payload = json!({
            "type": "customer.subscription.updated",
            "data": {"object": {"id": "sub_456"}}
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert!(matches!(event, BillingEvent::Ignored { .. }));
    }

    #[test]
    fn test_parse_subscription_deleted() {
        let payload = json!({
            "type": "customer.subscription.deleted",
            "data": {"object": {"id": "sub_456", "customer": "cus_123"}}
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert_eq!(
            event,
            BillingEvent::SubscriptionDeleted {
                customer_ref: "cus_123".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unrecognized_kind_is_ignored() {
        let payload = json!({
            "type": "invoice.payment_succeeded",
            "data": {"object": {}}
        });

        let event = parse_event(payload.to_string().as_bytes()).unwrap();
        assert_eq!(
            event,
            BillingEvent::Ignored {
                kind: "invoice.payment_succeeded".to_string()
            }
        );
    }

    #[test]
    fn test_parse_invalid_json_is_an_error() {
        let result = parse_event(b"not json");
        assert!(matches!(result, Err(EventParseError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_missing_type_is_an_error() {
        let result = parse_event(b"{\"data\": {\"object\": {}}}");
        assert!(matches!(result, Err(EventParseError::MissingType)));
    }
}
