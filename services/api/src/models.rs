//! API models for request and response payloads

use barter::{
    authoring::{DraftError, OfferDraft},
    models::{Category, Offer, OfferKind},
    profile::{OfferStats, ProfileForm},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Query parameters for the offer feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferListParams {
    /// Free-text search over title, description and tags
    pub search: Option<String>,
    /// `all` or an exact category name
    pub category: Option<String>,
}

/// Response for offer listings
#[derive(Debug, Clone, Serialize)]
pub struct OfferListResponse {
    pub items: Vec<Offer>,
    pub total: usize,
}

impl From<Vec<Offer>> for OfferListResponse {
    fn from(items: Vec<Offer>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

/// Request for offer creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: OfferKind,
    /// Comma-separated tags
    #[serde(default)]
    pub tags: String,
}

impl CreateOfferRequest {
    /// Turn the payload into a draft, rejecting unknown categories and incomplete drafts
    pub fn into_draft(self) -> Result<OfferDraft, ApiError> {
        let category = match self.category.as_deref() {
            None | Some("") => None,
            Some(name) => Some(
                name.parse::<Category>()
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            ),
        };

        let draft = OfferDraft {
            title: self.title,
            description: self.description,
            category,
            kind: self.kind,
            tags: self.tags,
        };

        draft
            .validate()
            .map_err(|e: DraftError| ApiError::BadRequest(e.to_string()))?;

        Ok(draft)
    }
}

/// Request for sending an exchange request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeRequestPayload {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response for the profile view
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileForm,
    pub stats: OfferStats,
}

/// Request for profile updates; the email is not editable
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
}
