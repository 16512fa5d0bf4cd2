//! Profile view model: editable profile fields plus offer statistics

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::gateway::{GatewayError, OfferGateway, ProfileGateway};
use crate::models::{Offer, OfferKind, ProfileUpsert, UserProfile};
use crate::session::Session;

/// Profile fields as presented for editing
///
/// `email` is shown but never taken from user input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub bio: String,
}

impl ProfileForm {
    /// Merge a stored row with what the identity provider knows
    ///
    /// Without a row the form is synthesized from the session with an empty
    /// bio; no row is written until the viewer saves.
    pub fn merge(row: Option<&UserProfile>, session: &Session) -> Self {
        let session_email = session.email().unwrap_or_default();

        match row {
            Some(row) => Self {
                full_name: row.full_name.clone().unwrap_or_default(),
                email: row
                    .email
                    .clone()
                    .filter(|email| !email.is_empty())
                    .unwrap_or_else(|| session_email.to_string()),
                bio: row.bio.clone().unwrap_or_default(),
            },
            None => Self {
                full_name: session.display_name().unwrap_or_default().to_string(),
                email: session_email.to_string(),
                bio: String::new(),
            },
        }
    }
}

/// Counts of the viewer's listings by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OfferStats {
    pub total: usize,
    pub offers: usize,
    pub requests: usize,
}

impl OfferStats {
    pub fn from_offers(offers: &[Offer]) -> Self {
        let count = |kind: OfferKind| offers.iter().filter(|o| o.kind == kind).count();

        Self {
            total: offers.len(),
            offers: count(OfferKind::Offer),
            requests: count(OfferKind::Request),
        }
    }
}

/// Result of [`ProfileViewModel::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(UserProfile),
    /// No session. Nothing was written.
    Skipped,
}

pub struct ProfileViewModel {
    profiles: Arc<dyn ProfileGateway>,
    offers: Arc<dyn OfferGateway>,
    session: Option<Session>,
    profile: ProfileForm,
    stats: OfferStats,
}

impl ProfileViewModel {
    pub fn new(
        profiles: Arc<dyn ProfileGateway>,
        offers: Arc<dyn OfferGateway>,
        session: Option<Session>,
    ) -> Self {
        Self {
            profiles,
            offers,
            session,
            profile: ProfileForm::default(),
            stats: OfferStats::default(),
        }
    }

    /// Load the profile and the offer statistics
    ///
    /// The two reads are independent; either failing leaves only its own
    /// part at defaults.
    pub async fn activate(&mut self) {
        self.load_profile().await;
        self.load_stats().await;
    }

    /// Load the profile, logging a failed read and keeping the blank form
    pub async fn load_profile(&mut self) {
        if let Err(e) = self.try_load_profile().await {
            error!("Error fetching profile: {}", e);
        }
    }

    /// Load the profile, returning a failed read to the caller
    ///
    /// Callers about to save use this so a blank email is never written
    /// over a stored one.
    pub async fn try_load_profile(&mut self) -> Result<(), GatewayError> {
        let Some(session) = &self.session else {
            return Ok(());
        };

        let row = self.profiles.find_profile(session.user_id()).await?;
        self.profile = ProfileForm::merge(row.as_ref(), session);
        Ok(())
    }

    pub async fn load_stats(&mut self) {
        let Some(session) = &self.session else {
            return;
        };

        match self.offers.list_offers(Some(session.user_id())).await {
            Ok(offers) => self.stats = OfferStats::from_offers(&offers),
            Err(e) => error!("Error fetching offer stats: {}", e),
        }
    }

    pub fn profile(&self) -> &ProfileForm {
        &self.profile
    }

    pub fn stats(&self) -> OfferStats {
        self.stats
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.profile.full_name = full_name.into();
    }

    pub fn set_bio(&mut self, bio: impl Into<String>) {
        self.profile.bio = bio.into();
    }

    /// Create or update the viewer's profile row
    pub async fn save(&self) -> Result<SaveOutcome, GatewayError> {
        let Some(session) = &self.session else {
            return Ok(SaveOutcome::Skipped);
        };

        let upsert = ProfileUpsert {
            id: session.user_id(),
            full_name: self.profile.full_name.clone(),
            email: self.profile.email.clone(),
            bio: self.profile.bio.clone(),
        };

        let saved = self.profiles.upsert_profile(&upsert).await?;
        info!("Profile {} saved", saved.id);

        Ok(SaveOutcome::Saved(saved))
    }
}
