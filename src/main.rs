mod config;
mod db;
mod error;
mod handlers;
mod models;
mod repository;
mod services;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidshare=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting vidshare...");

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let db = Database::new(&config.database.path, config.database.max_connections).await?;
    db.run_migrations().await?;
    tracing::info!("Database initialized at {}", config.database.path);

    let app = create_router(AppState { db });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Users (identity provider sync)
        .route("/user", post(handlers::user::provision_user))
        .route("/user/:id", get(handlers::user::get_user))
        // Videos
        .route(
            "/video",
            get(handlers::video::list_videos).post(handlers::video::create_video),
        )
        .route(
            "/video/:id",
            get(handlers::video::get_video).delete(handlers::video::delete_video),
        )
        .route("/video/:id/assets", patch(handlers::video::complete_processing))
        // Share links
        .route(
            "/link",
            get(handlers::link::list_links).post(handlers::link::create_link),
        )
        .route(
            "/link/:id",
            get(handlers::link::get_link)
                .patch(handlers::link::update_link)
                .delete(handlers::link::delete_link),
        )
        .route("/link/:id/resolve", post(handlers::link::resolve_link))
        // Access log
        .route(
            "/access",
            get(handlers::access::list_accesses).post(handlers::access::record_access),
        );

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
