//! API Server Entry Point
//!
//! Reads settings, picks the persistence gateway and serves the social
//! router. Uses `anyhow` for startup errors only; request errors are
//! rendered by the social crate.

mod settings;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use social::{InMemorySocialRepository, PgSocialRepository, social_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,social=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    tracing::info!(
        algorithm = ?settings.social.token_policy.algorithm,
        ttl_secs = ?settings.social.token_policy.ttl.map(|ttl| ttl.as_secs()),
        "Token policy loaded"
    );

    // Persistence gateway
    let social = match &settings.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            social_router(PgSocialRepository::new(pool), &settings.social)?
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            social_router(InMemorySocialRepository::new(), &settings.social)?
        }
    };

    // Build router
    let app = Router::new()
        .merge(social)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.frontend_origins));

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Bearer tokens travel in a header, so no credentialed CORS is needed
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
}
