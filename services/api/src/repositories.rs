//! PostgreSQL implementations of the marketplace data gateway

use barter::GatewayError;
use common::error::DatabaseError;

pub mod exchange;
pub mod offer;
pub mod profile;

pub use exchange::ExchangeRequestRepository;
pub use offer::OfferRepository;
pub use profile::ProfileRepository;

/// Map a sqlx failure onto the gateway error taxonomy
///
/// Statements the server refused keep the server's own message.
pub(crate) fn gateway_error(e: sqlx::Error) -> GatewayError {
    let message = e.to_string();
    let err = DatabaseError::Query(e);

    match err.server_message() {
        Some(server_message) => GatewayError::rejected(server_message),
        None if err.is_transport() => GatewayError::unavailable(message),
        None => GatewayError::rejected(message),
    }
}
