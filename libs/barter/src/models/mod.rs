//! BarterLink domain models

pub mod exchange;
pub mod offer;
pub mod user;

// Re-export for convenience
pub use exchange::{ExchangeRequest, ExchangeStatus, NewExchangeRequest};
pub use offer::{Category, NewOffer, Offer, OfferKind, OfferOwner, ParseEnumError};
pub use user::{ProfileUpsert, UserProfile};
