/// Payment provider REST client
///
/// Thin client over the provider's form-encoded REST API, used for three
/// things: lazily provisioning a customer record, requesting hosted
/// checkout/portal sessions (the provider hosts the UI; we only hold the
/// redirect URL), and looking up a subscription's current period end for the
/// webhook reconciler.
///
/// Every call carries a bounded timeout so a slow provider surfaces an error
/// instead of hanging the request.
///
/// The [`SubscriptionLookup`] trait is the seam the reconciler depends on;
/// tests substitute an in-memory implementation, and [`NoLookup`] stands in
/// when billing is not configured.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Provider API base URL
const API_BASE: &str = "https://api.stripe.com/v1";

/// Errors from provider calls
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Billing credentials are not configured
    #[error("Billing provider is not configured")]
    NotConfigured,

    /// Transport-level failure (connect, timeout, TLS)
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success status
    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Subscription period-end lookup seam
///
/// The reconciler only ever needs one fact from the provider: when the
/// current billing period of a subscription ends.
#[async_trait]
pub trait SubscriptionLookup: Send + Sync {
    /// Fetches the current period end (epoch seconds) for a subscription
    async fn current_period_end(&self, subscription_ref: &str)
        -> Result<Option<i64>, ProviderError>;
}

/// Lookup used when billing is not configured; always fails, which the
/// reconciler degrades to a null renewal
pub struct NoLookup;

#[async_trait]
impl SubscriptionLookup for NoLookup {
    async fn current_period_end(
        &self,
        _subscription_ref: &str,
    ) -> Result<Option<i64>, ProviderError> {
        Err(ProviderError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct CustomerObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
    current_period_end: Option<i64>,
}

/// Client for the provider's REST API
#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    /// Creates a client with a bounded per-request timeout
    pub fn new(secret_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            secret_key,
            api_base: API_BASE.to_string(),
        })
    }

    /// Overrides the API base URL (tests point this at a local server)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Creates a customer record for a user's email, returning its reference
    pub async fn create_customer(&self, email: &str) -> Result<String, ProviderError> {
        let customer: CustomerObject = self
            .post_form("/customers", &[("email", email)])
            .await?;

        Ok(customer.id)
    }

    /// Requests a hosted checkout session for the six-month subscription
    ///
    /// `user_id` rides along as the client reference so the completed-checkout
    /// webhook can be attributed to the user.
    pub async fn create_checkout_session(
        &self,
        customer_ref: &str,
        price_ref: &str,
        user_id: Uuid,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String, ProviderError> {
        let user_ref = user_id.to_string();
        let session: SessionObject = self
            .post_form(
                "/checkout/sessions",
                &[
                    ("mode", "subscription"),
                    ("customer", customer_ref),
                    ("line_items[0][price]", price_ref),
                    ("line_items[0][quantity]", "1"),
                    ("allow_promotion_codes", "true"),
                    ("client_reference_id", &user_ref),
                    ("success_url", success_url),
                    ("cancel_url", cancel_url),
                ],
            )
            .await?;

        Ok(session.url)
    }

    /// Requests a self-service billing portal session
    pub async fn create_portal_session(
        &self,
        customer_ref: &str,
        return_url: &str,
    ) -> Result<String, ProviderError> {
        let session: SessionObject = self
            .post_form(
                "/billing_portal/sessions",
                &[("customer", customer_ref), ("return_url", return_url)],
            )
            .await?;

        Ok(session.url)
    }
}

#[async_trait]
impl SubscriptionLookup for StripeClient {
    async fn current_period_end(
        &self,
        subscription_ref: &str,
    ) -> Result<Option<i64>, ProviderError> {
        let subscription: SubscriptionObject = self
            .get(&format!("/subscriptions/{}", subscription_ref))
            .await?;

        Ok(subscription.current_period_end)
    }
}
