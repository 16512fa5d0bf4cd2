//! Exchange request model and related functionality

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::offer::ParseEnumError;

/// Lifecycle status of an exchange request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeStatus {
    /// Every request starts here
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl ExchangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeStatus::Pending => "pending",
            ExchangeStatus::Accepted => "accepted",
            ExchangeStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ExchangeStatus::Pending),
            "accepted" => Ok(ExchangeStatus::Accepted),
            "declined" => Ok(ExchangeStatus::Declined),
            other => Err(ParseEnumError::new("status", other)),
        }
    }
}

/// Exchange request entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub offer_id: Uuid,
    pub message: Option<String>,
    pub status: ExchangeStatus,
    pub created_at: DateTime<Utc>,
}

/// New exchange request creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExchangeRequest {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub offer_id: Uuid,
    /// `None` when the sender left no message; never blank
    pub message: Option<String>,
    pub status: ExchangeStatus,
}
