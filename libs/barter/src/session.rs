//! Viewer session handed to every view model
//!
//! A [`Session`] is built once the identity provider has vouched for the
//! viewer (a verified access token, for the HTTP service) and is dropped when
//! the viewer signs out or the request that carried it ends. View models take
//! it at construction instead of reading ambient state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated viewer identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: Uuid,
    email: Option<String>,
    full_name: Option<String>,
    name: Option<String>,
}

impl Session {
    /// Start a session for the given identity-provider user id
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
            full_name: None,
            name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach the profile metadata supplied by the identity provider
    pub fn with_metadata(mut self, full_name: Option<String>, name: Option<String>) -> Self {
        self.full_name = full_name;
        self.name = name;
        self
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Name the identity provider knows the viewer by: `full_name`, then `name`
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }

    /// Whether `user_id` is the viewer
    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_name() {
        let id = Uuid::new_v4();
        let session = Session::new(id).with_metadata(None, Some("jane".to_string()));
        assert_eq!(session.display_name(), Some("jane"));

        let session = Session::new(id)
            .with_metadata(Some("Jane Doe".to_string()), Some("jane".to_string()));
        assert_eq!(session.display_name(), Some("Jane Doe"));

        assert_eq!(Session::new(id).display_name(), None);
    }
}
