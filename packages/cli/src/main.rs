// ABOUTME: Server binary wiring configuration, state, and the HTTP router
// ABOUTME: Seeds the initial admin account before accepting connections

use axum::http::Method;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;

use config::Config;
use reqtrack_api::{bootstrap, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reqtrack=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let state = AppState::init_with_path(config.database_path.clone())
        .await?
        .with_session_ttl(chrono::Duration::hours(config.session_ttl_hours));

    bootstrap::ensure_admin(
        &state,
        &config.admin_email,
        &config.admin_name,
        &config.admin_password,
    )
    .await?;

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
