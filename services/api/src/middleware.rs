//! Authentication middleware turning identity-provider tokens into sessions
//!
//! The identity provider signs access tokens with a shared HS256 secret.
//! A verified token becomes a [`Session`] in the request extensions and
//! lives exactly as long as the request.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use barter::Session;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Profile metadata the identity provider attaches to a user
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Audience
    #[serde(default)]
    pub aud: Option<String>,
    /// Expiration time
    pub exp: u64,
    /// User email
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Claims {
    pub fn into_session(self) -> Session {
        let session = Session::new(self.sub)
            .with_metadata(self.user_metadata.full_name, self.user_metadata.name);

        match self.email.filter(|email| !email.is_empty()) {
            Some(email) => session.with_email(email),
            None => session,
        }
    }
}

/// Verifies access tokens issued by the identity provider
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[audience]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the session it establishes
    pub fn verify(&self, token: &str) -> Result<Session, jsonwebtoken::errors::Error> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims.into_session())
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let session = state.jwt_verifier.verify(token).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
