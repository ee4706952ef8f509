//! # Elara Go API Server
//!
//! Personal productivity service: tasks, habits, goals, and a daily journal
//! per user, with a computed dashboard, spreadsheet export, and a paid plan
//! reconciled against an external billing provider's webhook stream.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p elarago-api
//! ```

use elarago_api::{
    app::{build_router, AppState},
    config::Config,
};
use elarago_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elarago_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Elara Go API v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    // Schema migrations run once here, never per-request
    run_migrations(&pool).await?;

    if config.billing.is_configured() {
        tracing::info!("billing is configured, checkout endpoints enabled");
    } else {
        tracing::warn!("billing is not configured, checkout endpoints will answer 503");
    }
    if config.billing.webhook_secret.is_none() {
        tracing::warn!("no webhook secret configured, accepting unsigned events (development only)");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config)?;
    let app = build_router(state);

    tracing::info!("Server listening on http://{}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
