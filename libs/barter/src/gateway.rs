//! Ports onto the remote data gateway
//!
//! The tables `users`, `offers` and `exchange_requests` belong to the hosted
//! backend. View models only see them through these traits, so the backend
//! can be PostgreSQL, an HTTP table API or an in-memory fake.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ExchangeRequest, NewExchangeRequest, NewOffer, Offer, ProfileUpsert, UserProfile,
};

/// Failure reported by the data gateway
///
/// `Display` yields the backend's own message so it can be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend could not be reached or did not answer.
    #[error("{message}")]
    Unavailable { message: String },
    /// The backend answered and refused the operation.
    #[error("{message}")]
    Rejected { message: String },
}

impl GatewayError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        GatewayError::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GatewayError::Unavailable { message } | GatewayError::Rejected { message } => message,
        }
    }
}

/// Reads and writes on `offers`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfferGateway: Send + Sync {
    /// All offers joined with their owner's `full_name` and `email`,
    /// most recent first, optionally restricted to one owner.
    async fn list_offers(&self, owner: Option<Uuid>) -> Result<Vec<Offer>, GatewayError>;

    /// A single offer with its owner, or `None` if no such offer exists.
    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>, GatewayError>;

    async fn insert_offer(&self, offer: &NewOffer) -> Result<Offer, GatewayError>;
}

/// Writes on `exchange_requests`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRequestGateway: Send + Sync {
    async fn insert_exchange_request(
        &self,
        request: &NewExchangeRequest,
    ) -> Result<ExchangeRequest, GatewayError>;
}

/// Reads and upserts on `users`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>, GatewayError>;

    /// Create the row keyed by `profile.id`, or overwrite it if present.
    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfile, GatewayError>;
}
