//! Application state shared across handlers

use std::sync::Arc;

use barter::{ExchangeRequestGateway, OfferGateway, ProfileGateway};

use crate::middleware::JwtVerifier;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub offer_gateway: Arc<dyn OfferGateway>,
    pub exchange_request_gateway: Arc<dyn ExchangeRequestGateway>,
    pub profile_gateway: Arc<dyn ProfileGateway>,
    pub jwt_verifier: JwtVerifier,
}
