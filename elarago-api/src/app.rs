/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware. Authentication is explicit middleware composition:
/// the per-user route group is wrapped in a session layer that validates the
/// bearer token and inserts an [`AuthContext`] into request extensions, so
/// every handler behind it starts from a resolved user id.
///
/// # Example
///
/// ```no_run
/// use elarago_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config)?;
/// let app = elarago_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use elarago_shared::auth::{session, AuthContext};
use elarago_shared::billing::provider::{NoLookup, ProviderError, StripeClient, SubscriptionLookup};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Billing provider client (None when billing is not configured)
    pub billing: Option<Arc<StripeClient>>,
}

impl AppState {
    /// Creates new application state
    ///
    /// Builds the provider client when a secret key is configured.
    pub fn new(db: PgPool, config: Config) -> Result<Self, ProviderError> {
        let billing = match &config.billing.secret_key {
            Some(key) => Some(Arc::new(StripeClient::new(
                key.clone(),
                Duration::from_secs(config.billing.request_timeout_seconds),
            )?)),
            None => None,
        };

        Ok(Self {
            db,
            config: Arc::new(config),
            billing,
        })
    }

    /// Gets the session token signing secret
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }

    /// Gets the provider client, or the configuration error the billing
    /// endpoints surface as 503
    ///
    /// Checkout additionally requires a configured price id; handlers check
    /// that themselves.
    pub fn billing_client(&self) -> ApiResult<&StripeClient> {
        self.billing
            .as_deref()
            .ok_or(ApiError::BillingNotConfigured)
    }

    /// Gets the period-end lookup for the webhook reconciler
    ///
    /// Falls back to a failing stub when billing is unconfigured; the
    /// reconciler degrades that to a null renewal.
    pub fn subscription_lookup(&self) -> &dyn SubscriptionLookup {
        match &self.billing {
            Some(client) => client.as_ref(),
            None => &NoLookup,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                      # health check (public)
/// ├── /signup, /login              # credential endpoints (public)
/// ├── /webhook                     # provider events (public, signed)
/// ├── /checkout/success, /cancel   # checkout redirect landings (public)
/// └── authenticated                # session layer
///     ├── /api/tasks[/:id]         # resource collections
///     ├── /api/habits[/:id]
///     ├── /api/goals[/:id]
///     ├── /api/journal
///     ├── /api/summary             # dashboard metrics
///     ├── /export                  # xlsx download
///     ├── /billing                 # plan status view
///     ├── /checkout/6month         # hosted checkout session
///     ├── /billing/portal          # self-service portal session
///     └── /integrations/...        # stubs
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: no session required
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/webhook", post(routes::webhook::provider_webhook))
        .route("/checkout/success", get(routes::billing::checkout_success))
        .route("/checkout/cancel", get(routes::billing::checkout_cancel));

    // Per-user routes: session token required
    let authed_routes = Router::new()
        .route(
            "/api/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/api/habits",
            get(routes::habits::list_habits).post(routes::habits::create_habit),
        )
        .route(
            "/api/habits/:id",
            put(routes::habits::update_habit).delete(routes::habits::delete_habit),
        )
        .route(
            "/api/goals",
            get(routes::goals::list_goals).post(routes::goals::create_goal),
        )
        .route(
            "/api/goals/:id",
            put(routes::goals::update_goal).delete(routes::goals::delete_goal),
        )
        .route(
            "/api/journal",
            get(routes::journal::list_entries).post(routes::journal::create_entry),
        )
        .route("/api/summary", get(routes::summary::summary))
        .route("/export", get(routes::export::export_workbook))
        .route("/billing", get(routes::billing::billing_status))
        .route("/checkout/6month", post(routes::billing::checkout_6month))
        .route("/billing/portal", post(routes::billing::billing_portal))
        .route(
            "/integrations/calendar/connect",
            get(routes::integrations::connect_calendar),
        )
        .route(
            "/integrations/health/connect",
            get(routes::integrations::connect_health),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authed_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Validates the bearer session token and injects [`AuthContext`] into
/// request extensions.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = session::validate_session_token(token, state.session_secret())?;

    req.extensions_mut().insert(AuthContext::new(claims.sub));

    Ok(next.run(req).await)
}
