//! cpduel - Application Entry Point

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, middleware};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cpduel::{
    config::CONFIG,
    constants::API_BASE_PATH,
    handlers,
    middleware::logging_middleware,
    source::CodeforcesClient,
    state::AppState,
    storage::HandleStore,
    utils::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cpduel server...");

    let source = CodeforcesClient::new(&CONFIG.codeforces)?;
    tracing::info!(api_base = %CONFIG.codeforces.api_base, "Codeforces client ready");

    let handles = HandleStore::load(&CONFIG.storage).await?;

    let state = AppState::new(
        CONFIG.clone(),
        Arc::new(source),
        handles,
        Arc::new(SystemClock),
    );

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
