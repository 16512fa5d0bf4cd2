//! Offer model and related functionality

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Label shown when an offer's owner has neither a name nor an email
pub const UNKNOWN_OWNER_LABEL: &str = "the owner";

/// Fixed set of offer categories
///
/// Names are matched case-sensitively, exactly as they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tools,
    Books,
    Services,
    Others,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 4] = [
        Category::Tools,
        Category::Books,
        Category::Services,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tools => "Tools",
            Category::Books => "Books",
            Category::Services => "Services",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

/// Whether a listing offers something or asks for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    #[default]
    Offer,
    Request,
}

impl OfferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferKind::Offer => "offer",
            OfferKind::Request => "request",
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offer" => Ok(OfferKind::Offer),
            "request" => Ok(OfferKind::Request),
            other => Err(ParseEnumError::new("kind", other)),
        }
    }
}

/// Raised when a stored or submitted value is outside an enumerated set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field}: {value:?}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Identity of the user who listed an offer, joined from `users`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferOwner {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Offer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: OfferKind,
    /// `None` when the offer was listed without tags; never an empty list
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "users", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OfferOwner>,
}

impl Offer {
    /// Name to show for the offer's owner: full name, then email, then a placeholder
    pub fn owner_label(&self) -> &str {
        let owner = self.owner.as_ref();
        owner
            .and_then(|o| o.full_name.as_deref())
            .filter(|name| !name.is_empty())
            .or_else(|| {
                owner
                    .and_then(|o| o.email.as_deref())
                    .filter(|email| !email.is_empty())
            })
            .unwrap_or(UNKNOWN_OWNER_LABEL)
    }

    /// Tags as a slice, empty when the offer has none
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// New offer creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOffer {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: OfferKind,
    pub tags: Option<Vec<String>>,
}
