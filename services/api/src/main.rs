use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod settings;
mod state;

use common::database::{DatabaseConfig, health_check, init_pool};

use crate::{
    middleware::JwtVerifier,
    repositories::{ExchangeRequestRepository, OfferRepository, ProfileRepository},
    settings::ServerConfig,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting BarterLink API service");

    let server_config = ServerConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let app_state = AppState {
        offer_gateway: Arc::new(OfferRepository::new(pool.clone())),
        exchange_request_gateway: Arc::new(ExchangeRequestRepository::new(pool.clone())),
        profile_gateway: Arc::new(ProfileRepository::new(pool)),
        jwt_verifier: JwtVerifier::new(&server_config.jwt_secret, &server_config.jwt_audience),
    };

    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_address).await?;
    info!("API service listening on {}", server_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
