//! Offer authoring flow
//!
//! Validates a draft, normalizes its comma-separated tags and submits it as
//! a new offer owned by the viewer.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::gateway::{GatewayError, OfferGateway};
use crate::models::{Category, NewOffer, Offer, OfferKind};
use crate::session::Session;

/// Split a comma-separated tag string into trimmed, non-empty tags
///
/// Returns `None` rather than an empty list when nothing is left.
pub fn normalize_tags(input: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    if tags.is_empty() { None } else { Some(tags) }
}

/// Reasons a draft cannot be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Description is required")]
    MissingDescription,
    #[error("Category is required")]
    MissingCategory,
}

/// Offer form state as the viewer fills it in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferDraft {
    pub title: String,
    pub description: String,
    /// Unselected until the viewer picks one
    pub category: Option<Category>,
    pub kind: OfferKind,
    /// Raw comma-separated tags
    pub tags: String,
}

impl OfferDraft {
    /// Check the fields that must be filled before submission is enabled
    pub fn validate(&self) -> Result<Category, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }
        self.category.ok_or(DraftError::MissingCategory)
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Build the insert payload for an offer owned by `session`
    pub fn to_new_offer(&self, session: &Session) -> Result<NewOffer, DraftError> {
        let category = self.validate()?;

        Ok(NewOffer {
            user_id: session.user_id(),
            title: self.title.clone(),
            description: self.description.clone(),
            category,
            kind: self.kind,
            tags: normalize_tags(&self.tags),
        })
    }
}

/// Where the viewer goes after a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    MyOffers,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::MyOffers => "/offers/mine",
        }
    }
}

/// Result of [`OfferAuthoring::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum AuthoringOutcome {
    Created {
        offer: Offer,
        destination: Destination,
    },
    /// No session, or the draft was incomplete. Nothing was written.
    Skipped,
}

/// Submits drafts on behalf of the viewer
pub struct OfferAuthoring {
    gateway: Arc<dyn OfferGateway>,
    session: Option<Session>,
}

impl OfferAuthoring {
    pub fn new(gateway: Arc<dyn OfferGateway>, session: Option<Session>) -> Self {
        Self { gateway, session }
    }

    /// Insert the draft as a new offer
    ///
    /// Gateway failures are returned as-is so their message can be shown;
    /// the caller keeps the draft for resubmission.
    pub async fn submit(&self, draft: &OfferDraft) -> Result<AuthoringOutcome, GatewayError> {
        let Some(session) = &self.session else {
            return Ok(AuthoringOutcome::Skipped);
        };

        let new_offer = match draft.to_new_offer(session) {
            Ok(new_offer) => new_offer,
            Err(e) => {
                warn!("Ignoring incomplete offer draft: {}", e);
                return Ok(AuthoringOutcome::Skipped);
            }
        };

        let offer = self.gateway.insert_offer(&new_offer).await?;
        info!("Offer {} created by {}", offer.id, session.user_id());

        Ok(AuthoringOutcome::Created {
            offer,
            destination: Destination::MyOffers,
        })
    }
}
