//! Exchange-request submission
//!
//! One submission writes one `pending` request from the viewer to the owner
//! of the target offer.

use std::sync::Arc;

use tracing::{info, warn};

use crate::gateway::{ExchangeRequestGateway, GatewayError};
use crate::models::{ExchangeRequest, ExchangeStatus, NewExchangeRequest, Offer};
use crate::session::Session;

/// Trim a message, treating a blank one as absent
pub fn normalize_message(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Result of [`ExchangeRequestForm::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent(ExchangeRequest),
    /// Sender or target offer missing. Nothing was written.
    Skipped,
}

/// Message box and submit action for requesting an exchange
pub struct ExchangeRequestForm {
    gateway: Arc<dyn ExchangeRequestGateway>,
    session: Option<Session>,
    message: String,
}

impl ExchangeRequestForm {
    pub fn new(gateway: Arc<dyn ExchangeRequestGateway>, session: Option<Session>) -> Self {
        Self {
            gateway,
            session,
            message: String::new(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Send a request for `offer`
    ///
    /// On success the message is cleared and the caller closes the form. On
    /// failure the message is kept and the gateway error is returned.
    pub async fn submit(&mut self, offer: Option<&Offer>) -> Result<SubmitOutcome, GatewayError> {
        let (Some(session), Some(offer)) = (&self.session, offer) else {
            return Ok(SubmitOutcome::Skipped);
        };

        if session.is(offer.user_id) {
            warn!(
                "User {} is requesting an exchange on their own offer {}",
                session.user_id(),
                offer.id
            );
        }

        let request = NewExchangeRequest {
            from_user_id: session.user_id(),
            to_user_id: offer.user_id,
            offer_id: offer.id,
            message: normalize_message(&self.message),
            status: ExchangeStatus::Pending,
        };

        let created = self.gateway.insert_exchange_request(&request).await?;
        info!(
            "Exchange request {} sent to {} for offer {}",
            created.id, created.to_user_id, created.offer_id
        );

        self.message.clear();
        Ok(SubmitOutcome::Sent(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockExchangeRequestGateway;
    use crate::models::{Category, OfferKind};
    use chrono::Utc;
    use uuid::Uuid;

    fn target_offer(owner: Uuid) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Sourdough starter".to_string(),
            description: "Happy to share".to_string(),
            category: Category::Others,
            kind: OfferKind::Offer,
            tags: None,
            created_at: Utc::now(),
            owner: None,
        }
    }

    fn stored(request: &NewExchangeRequest) -> ExchangeRequest {
        ExchangeRequest {
            id: Uuid::new_v4(),
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            offer_id: request.offer_id,
            message: request.message.clone(),
            status: request.status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_message() {
        assert_eq!(normalize_message(""), None);
        assert_eq!(normalize_message(" \n\t "), None);
        assert_eq!(
            normalize_message("  Would you trade for jam? "),
            Some("Would you trade for jam?".to_string())
        );
    }

    #[tokio::test]
    async fn test_submit_sends_pending_request_and_clears_message() {
        let sender = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let offer = target_offer(owner);
        let offer_id = offer.id;

        let mut gateway = MockExchangeRequestGateway::new();
        gateway
            .expect_insert_exchange_request()
            .withf(move |r| {
                r.from_user_id == sender
                    && r.to_user_id == owner
                    && r.offer_id == offer_id
                    && r.status == ExchangeStatus::Pending
                    && r.message.as_deref() == Some("Interested!")
            })
            .times(1)
            .returning(|r| Ok(stored(r)));

        let mut form = ExchangeRequestForm::new(Arc::new(gateway), Some(Session::new(sender)));
        form.set_message(" Interested! ");
        let outcome = form.submit(Some(&offer)).await.unwrap();

        assert!(
            matches!(outcome, SubmitOutcome::Sent(ref r) if r.status == ExchangeStatus::Pending)
        );
        assert_eq!(form.message(), "");
    }

    #[tokio::test]
    async fn test_whitespace_message_is_stored_as_absent() {
        let mut gateway = MockExchangeRequestGateway::new();
        gateway
            .expect_insert_exchange_request()
            .withf(|r| r.message.is_none())
            .times(1)
            .returning(|r| Ok(stored(r)));

        let mut form =
            ExchangeRequestForm::new(Arc::new(gateway), Some(Session::new(Uuid::new_v4())));
        form.set_message("    ");
        let outcome = form.submit(Some(&target_offer(Uuid::new_v4()))).await;

        assert!(matches!(outcome, Ok(SubmitOutcome::Sent(_))));
    }

    #[tokio::test]
    async fn test_missing_sender_or_offer_is_a_no_op() {
        let mut gateway = MockExchangeRequestGateway::new();
        gateway.expect_insert_exchange_request().never();
        let gateway: Arc<dyn ExchangeRequestGateway> = Arc::new(gateway);

        let mut anonymous = ExchangeRequestForm::new(gateway.clone(), None);
        assert_eq!(
            anonymous.submit(Some(&target_offer(Uuid::new_v4()))).await,
            Ok(SubmitOutcome::Skipped)
        );

        let mut no_target = ExchangeRequestForm::new(gateway, Some(Session::new(Uuid::new_v4())));
        no_target.set_message("hello");
        assert_eq!(no_target.submit(None).await, Ok(SubmitOutcome::Skipped));
        assert_eq!(no_target.message(), "hello");
    }

    #[tokio::test]
    async fn test_failure_keeps_message_for_retry() {
        let mut gateway = MockExchangeRequestGateway::new();
        gateway
            .expect_insert_exchange_request()
            .times(1)
            .returning(|_| Err(GatewayError::unavailable("network timeout")));

        let mut form =
            ExchangeRequestForm::new(Arc::new(gateway), Some(Session::new(Uuid::new_v4())));
        form.set_message("Still available?");
        let err = form
            .submit(Some(&target_offer(Uuid::new_v4())))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "network timeout");
        assert_eq!(form.message(), "Still available?");
    }

    #[tokio::test]
    async fn test_request_on_own_offer_is_not_blocked() {
        let viewer = Uuid::new_v4();
        let mut gateway = MockExchangeRequestGateway::new();
        gateway
            .expect_insert_exchange_request()
            .withf(move |r| r.from_user_id == viewer && r.to_user_id == viewer)
            .times(1)
            .returning(|r| Ok(stored(r)));

        let mut form = ExchangeRequestForm::new(Arc::new(gateway), Some(Session::new(viewer)));
        let outcome = form.submit(Some(&target_offer(viewer))).await;

        assert!(matches!(outcome, Ok(SubmitOutcome::Sent(_))));
    }
}
