/// Subscription state reconciler
///
/// Converges a user's plan, subscription reference, and renewal timestamp
/// with the latest state reported by the payment provider. The provider
/// delivers events at-least-once with no ordering guarantee, so:
///
/// - every write is an absolute assignment, never an increment, so replaying
///   an event is idempotent by construction;
/// - each event resolves its user and applies all field writes in a single
///   scoped UPDATE, so a crash never leaves a half-updated plan;
/// - out-of-order upserts are resolved last-write-wins. The provider gives
///   no usable ordering key, so a late event can transiently regress the
///   renewal date; that is accepted, not corrected.
///
/// Events that cannot be attributed to a known user are no-ops (the provider
/// sends events for unrelated test activity), and unrecognized kinds are
/// ignored. A store failure propagates so the provider's redelivery retries
/// the event.
///
/// # Status mapping
///
/// `{active, trialing, past_due}` map to the paid plan; every other status
/// (canceled, unpaid, incomplete, ...) maps to free.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::billing::event::BillingEvent;
use crate::billing::provider::SubscriptionLookup;
use crate::models::user::Plan;

/// Store errors surfaced to the webhook endpoint (retriable)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What the reconciler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A user's plan state was written
    Applied,

    /// The event did not correspond to a known user, or is a kind this
    /// system does not act on
    Ignored,
}

/// The plan-state writes the reconciler needs from the store
///
/// Each method is one atomic, owner-resolved, absolute write. The returned
/// `bool` reports whether a row matched; `false` means the referenced user
/// is unknown and the event is a no-op.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Applies a completed checkout: paid plan, both references, renewal
    async fn record_checkout(
        &self,
        user_id: Uuid,
        customer_ref: Option<&str>,
        subscription_ref: Option<&str>,
        renewal: Option<i64>,
    ) -> Result<bool, StoreError>;

    /// Applies a subscription upsert, resolving the user by customer
    /// reference: plan from status, reference and renewal overwritten
    async fn apply_subscription(
        &self,
        customer_ref: &str,
        plan: Plan,
        subscription_ref: &str,
        renewal: Option<i64>,
    ) -> Result<bool, StoreError>;

    /// Applies a subscription deletion: free plan, references and renewal
    /// cleared
    async fn clear_subscription(&self, customer_ref: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl PlanStore for PgPool {
    async fn record_checkout(
        &self,
        user_id: Uuid,
        customer_ref: Option<&str>,
        subscription_ref: Option<&str>,
        renewal: Option<i64>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET plan = 'pro-6mo', stripe_customer_id = $2,
                stripe_subscription_id = $3, plan_renewal = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(customer_ref)
        .bind(subscription_ref)
        .bind(renewal)
        .execute(self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_subscription(
        &self,
        customer_ref: &str,
        plan: Plan,
        subscription_ref: &str,
        renewal: Option<i64>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET plan = $2, stripe_subscription_id = $3, plan_renewal = $4,
                updated_at = NOW()
            WHERE stripe_customer_id = $1
            "#,
        )
        .bind(customer_ref)
        .bind(plan)
        .bind(subscription_ref)
        .bind(renewal)
        .execute(self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_subscription(&self, customer_ref: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET plan = 'free', stripe_subscription_id = NULL, plan_renewal = NULL,
                updated_at = NOW()
            WHERE stripe_customer_id = $1
            "#,
        )
        .bind(customer_ref)
        .execute(self)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Maps a provider subscription status onto a plan tier
pub fn plan_for_status(status: &str) -> Plan {
    match status {
        "active" | "trialing" | "past_due" => Plan::Pro6Mo,
        _ => Plan::Free,
    }
}

/// Applies one billing event to the store
///
/// # Errors
///
/// Returns [`StoreError`] only when the store write fails; the event is then
/// considered failed and must be retried by the caller (the provider's
/// at-least-once redelivery). Lookup failures never fail the event.
pub async fn apply_event(
    store: &dyn PlanStore,
    lookup: &dyn SubscriptionLookup,
    event: BillingEvent,
) -> Result<Outcome, StoreError> {
    match event {
        BillingEvent::CheckoutCompleted {
            user_ref,
            customer_ref,
            subscription_ref,
        } => {
            // Only checkouts we initiated carry a parseable user reference
            let user_id = match user_ref.as_deref().and_then(|r| Uuid::parse_str(r).ok()) {
                Some(id) => id,
                None => {
                    info!("checkout event without usable user reference, ignoring");
                    return Ok(Outcome::Ignored);
                }
            };

            // Lookup failure degrades to a null renewal; the next upsert
            // event carries the real period end anyway.
            let renewal = match subscription_ref.as_deref() {
                Some(sub_ref) => match lookup.current_period_end(sub_ref).await {
                    Ok(period_end) => period_end,
                    Err(e) => {
                        warn!(error = %e, "period-end lookup failed, storing null renewal");
                        None
                    }
                },
                None => None,
            };

            let applied = store
                .record_checkout(
                    user_id,
                    customer_ref.as_deref(),
                    subscription_ref.as_deref(),
                    renewal,
                )
                .await?;

            if applied {
                info!(%user_id, "checkout completed, plan upgraded");
                Ok(Outcome::Applied)
            } else {
                info!(%user_id, "checkout references unknown user, ignoring");
                Ok(Outcome::Ignored)
            }
        }

        BillingEvent::SubscriptionUpserted {
            customer_ref,
            subscription_ref,
            status,
            period_end,
        } => {
            let plan = plan_for_status(&status);
            let applied = store
                .apply_subscription(&customer_ref, plan, &subscription_ref, period_end)
                .await?;

            if applied {
                info!(customer = %customer_ref, status = %status, plan = plan.as_str(),
                    "subscription state applied");
                Ok(Outcome::Applied)
            } else {
                info!(customer = %customer_ref, "subscription event for unknown customer, ignoring");
                Ok(Outcome::Ignored)
            }
        }

        BillingEvent::SubscriptionDeleted { customer_ref } => {
            let applied = store.clear_subscription(&customer_ref).await?;

            if applied {
                info!(customer = %customer_ref, "subscription deleted, plan reverted to free");
                Ok(Outcome::Applied)
            } else {
                info!(customer = %customer_ref, "deletion event for unknown customer, ignoring");
                Ok(Outcome::Ignored)
            }
        }

        BillingEvent::Ignored { kind } => {
            info!(kind = %kind, "unhandled event kind, ignoring");
            Ok(Outcome::Ignored)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::provider::ProviderError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory plan state mirroring the users table billing columns
    #[derive(Debug, Clone, PartialEq)]
    struct PlanState {
        plan: Plan,
        customer_ref: Option<String>,
        subscription_ref: Option<String>,
        renewal: Option<i64>,
    }

    impl PlanState {
        fn free() -> Self {
            Self {
                plan: Plan::Free,
                customer_ref: None,
                subscription_ref: None,
                renewal: None,
            }
        }
    }

    #[derive(Default)]
    struct MockStore {
        users: Mutex<HashMap<Uuid, PlanState>>,
    }

    impl MockStore {
        fn with_user(user_id: Uuid) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().insert(user_id, PlanState::free());
            store
        }

        fn state(&self, user_id: Uuid) -> PlanState {
            self.users.lock().unwrap().get(&user_id).unwrap().clone()
        }
    }

    #[async_trait]
    impl PlanStore for MockStore {
        async fn record_checkout(
            &self,
            user_id: Uuid,
            customer_ref: Option<&str>,
            subscription_ref: Option<&str>,
            renewal: Option<i64>,
        ) -> Result<bool, StoreError> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(&user_id) {
                Some(state) => {
                    state.plan = Plan::Pro6Mo;
                    state.customer_ref = customer_ref.map(str::to_string);
                    state.subscription_ref = subscription_ref.map(str::to_string);
                    state.renewal = renewal;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn apply_subscription(
            &self,
            customer_ref: &str,
            plan: Plan,
            subscription_ref: &str,
            renewal: Option<i64>,
        ) -> Result<bool, StoreError> {
            let mut users = self.users.lock().unwrap();
            match users
                .values_mut()
                .find(|s| s.customer_ref.as_deref() == Some(customer_ref))
            {
                Some(state) => {
                    state.plan = plan;
                    state.subscription_ref = Some(subscription_ref.to_string());
                    state.renewal = renewal;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn clear_subscription(&self, customer_ref: &str) -> Result<bool, StoreError> {
            let mut users = self.users.lock().unwrap();
            match users
                .values_mut()
                .find(|s| s.customer_ref.as_deref() == Some(customer_ref))
            {
                Some(state) => {
                    state.plan = Plan::Free;
                    state.subscription_ref = None;
                    state.renewal = None;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Lookup returning a fixed period end
    struct FixedLookup(Option<i64>);

    #[async_trait]
    impl SubscriptionLookup for FixedLookup {
        async fn current_period_end(
            &self,
            _subscription_ref: &str,
        ) -> Result<Option<i64>, ProviderError> {
            Ok(self.0)
        }
    }

    /// Lookup that always fails
    struct FailingLookup;

    #[async_trait]
    impl SubscriptionLookup for FailingLookup {
        async fn current_period_end(
            &self,
            _subscription_ref: &str,
        ) -> Result<Option<i64>, ProviderError> {
            Err(ProviderError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    fn checkout_event(user_id: Uuid) -> BillingEvent {
        BillingEvent::CheckoutCompleted {
            user_ref: Some(user_id.to_string()),
            customer_ref: Some("cus_123".to_string()),
            subscription_ref: Some("sub_456".to_string()),
        }
    }

    fn upsert_event(status: &str, renewal: Option<i64>) -> BillingEvent {
        BillingEvent::SubscriptionUpserted {
            customer_ref: "cus_123".to_string(),
            subscription_ref: "sub_456".to_string(),
            status: status.to_string(),
            period_end: renewal,
        }
    }

    #[test]
    fn test_plan_for_status_mapping() {
        assert_eq!(plan_for_status("active"), Plan::Pro6Mo);
        assert_eq!(plan_for_status("trialing"), Plan::Pro6Mo);
        assert_eq!(plan_for_status("past_due"), Plan::Pro6Mo);
        assert_eq!(plan_for_status("canceled"), Plan::Free);
        assert_eq!(plan_for_status("unpaid"), Plan::Free);
        assert_eq!(plan_for_status("incomplete_expired"), Plan::Free);
        assert_eq!(plan_for_status(""), Plan::Free);
    }

    #[tokio::test]
    async fn test_checkout_upgrades_plan_and_stores_renewal() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);

        let outcome = apply_event(&store, &FixedLookup(Some(1_735_689_600)), checkout_event(user_id))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(
            store.state(user_id),
            PlanState {
                plan: Plan::Pro6Mo,
                customer_ref: Some("cus_123".to_string()),
                subscription_ref: Some("sub_456".to_string()),
                renewal: Some(1_735_689_600),
            }
        );
    }

    #[tokio::test]
    async fn test_checkout_lookup_failure_degrades_to_null_renewal() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);

        let outcome = apply_event(&store, &FailingLookup, checkout_event(user_id))
            .await
            .unwrap();

        // The event still applies; only the renewal is missing
        assert_eq!(outcome, Outcome::Applied);
        let state = store.state(user_id);
        assert_eq!(state.plan, Plan::Pro6Mo);
        assert_eq!(state.renewal, None);
    }

    #[tokio::test]
    async fn test_checkout_without_subscription_skips_lookup() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);

        let event = BillingEvent::CheckoutCompleted {
            user_ref: Some(user_id.to_string()),
            customer_ref: Some("cus_123".to_string()),
            subscription_ref: None,
        };

        // FailingLookup would error if it were consulted
        let outcome = apply_event(&store, &FailingLookup, event).await.unwrap();

        assert_eq!(outcome, Outcome::Applied);
        let state = store.state(user_id);
        assert_eq!(state.plan, Plan::Pro6Mo);
        assert_eq!(state.subscription_ref, None);
        assert_eq!(state.renewal, None);
    }

    #[tokio::test]
    async fn test_checkout_for_unknown_user_is_ignored() {
        let known = Uuid::new_v4();
        let store = MockStore::with_user(known);

        let outcome = apply_event(
            &store,
            &FixedLookup(None),
            checkout_event(Uuid::new_v4()),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(store.state(known), PlanState::free());
    }

    #[tokio::test]
    async fn test_checkout_with_unparseable_user_ref_is_ignored() {
        let known = Uuid::new_v4();
        let store = MockStore::with_user(known);

        let event = BillingEvent::CheckoutCompleted {
            user_ref: Some("not-a-uuid".to_string()),
            customer_ref: Some("cus_123".to_string()),
            subscription_ref: None,
        };

        let outcome = apply_event(&store, &FixedLookup(None), event).await.unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(store.state(known), PlanState::free());
    }

    #[tokio::test]
    async fn test_upsert_active_then_canceled_ends_free() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);
        apply_event(&store, &FixedLookup(None), checkout_event(user_id))
            .await
            .unwrap();

        apply_event(&store, &NoopLookup, upsert_event("active", Some(100)))
            .await
            .unwrap();
        assert_eq!(store.state(user_id).plan, Plan::Pro6Mo);

        apply_event(&store, &NoopLookup, upsert_event("canceled", Some(100)))
            .await
            .unwrap();
        assert_eq!(store.state(user_id).plan, Plan::Free);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_renewal_last_write_wins() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);
        apply_event(&store, &FixedLookup(None), checkout_event(user_id))
            .await
            .unwrap();

        // A late-arriving event with an older period end still wins
        apply_event(&store, &NoopLookup, upsert_event("active", Some(2_000)))
            .await
            .unwrap();
        apply_event(&store, &NoopLookup, upsert_event("active", Some(1_000)))
            .await
            .unwrap();

        assert_eq!(store.state(user_id).renewal, Some(1_000));
    }

    #[tokio::test]
    async fn test_upsert_for_unknown_customer_is_ignored() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);

        let outcome = apply_event(&store, &NoopLookup, upsert_event("active", None))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(store.state(user_id), PlanState::free());
    }

    #[tokio::test]
    async fn test_deletion_is_idempotent() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);
        apply_event(&store, &FixedLookup(Some(500)), checkout_event(user_id))
            .await
            .unwrap();

        let event = BillingEvent::SubscriptionDeleted {
            customer_ref: "cus_123".to_string(),
        };

        apply_event(&store, &NoopLookup, event.clone()).await.unwrap();
        let after_first = store.state(user_id);

        apply_event(&store, &NoopLookup, event).await.unwrap();
        let after_second = store.state(user_id);

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.plan, Plan::Free);
        assert_eq!(after_second.subscription_ref, None);
        assert_eq!(after_second.renewal, None);
        // The customer reference survives cancellation
        assert_eq!(after_second.customer_ref, Some("cus_123".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_upsert_is_idempotent() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);
        apply_event(&store, &FixedLookup(None), checkout_event(user_id))
            .await
            .unwrap();

        let event = upsert_event("active", Some(3_000));
        apply_event(&store, &NoopLookup, event.clone()).await.unwrap();
        let after_first = store.state(user_id);

        apply_event(&store, &NoopLookup, event).await.unwrap();
        assert_eq!(store.state(user_id), after_first);
    }

    #[tokio::test]
    async fn test_unrecognized_kind_is_ignored() {
        let user_id = Uuid::new_v4();
        let store = MockStore::with_user(user_id);

        let outcome = apply_event(
            &store,
            &NoopLookup,
            BillingEvent::Ignored {
                kind: "invoice.created".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(store.state(user_id), PlanState::free());
    }

    /// Lookup that must not be consulted
    struct NoopLookup;

    #[async_trait]
    impl SubscriptionLookup for NoopLookup {
        async fn current_period_end(
            &self,
            _subscription_ref: &str,
        ) -> Result<Option<i64>, ProviderError> {
            panic!("lookup should not be consulted for this event");
        }
    }
}
