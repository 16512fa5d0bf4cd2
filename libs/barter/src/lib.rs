//! Marketplace core for BarterLink
//!
//! Users list offers and requests, browse everyone else's listings and send
//! exchange requests. Persistence lives behind the ports in [`gateway`]; the
//! view models in [`listing`], [`authoring`], [`exchange`] and [`profile`]
//! take an explicit [`session::Session`] and hold only transient state.

pub mod authoring;
pub mod exchange;
pub mod gateway;
pub mod listing;
pub mod models;
pub mod profile;
pub mod session;

pub use gateway::{ExchangeRequestGateway, GatewayError, OfferGateway, ProfileGateway};
pub use session::Session;
