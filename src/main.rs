// Social feed server - users, posts, likes over HTTP

use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use social_app::{app_state::AppState, config::Config, reconciler, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;

    // Background reconciliation of cached like counts
    reconciler::spawn(
        app_state.likes.clone(),
        Duration::from_secs(config.reconciler.interval_secs),
    );

    // Build application router
    let app = routes::create_router(app_state).layer(CorsLayer::permissive());

    // Start server
    let addr = config.server_address();
    tracing::info!("social feed server starting on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
