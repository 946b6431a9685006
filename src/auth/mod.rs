//! Authentication context
//!
//! Verifies JWT bearer tokens and attaches the caller identity to the
//! request. Token issuance (login, registration, revocation) lives in a
//! separate service; this crate only consumes already-issued tokens.

pub mod middleware;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::core_types::UserId;
use crate::transfer::Caller;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user_id as string)
    pub email: String,
    pub name: String,
    /// System principal flag; gates the initial-funds operation
    #[serde(default)]
    pub system: bool,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at
}

/// The verified caller identity injected into handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub system: bool,
}

impl AuthenticatedUser {
    pub fn as_caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Stateless token verification
pub struct AuthVerifier {
    jwt_secret: String,
}

impl AuthVerifier {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;

        let claims = token_data.claims;
        let user_id: UserId = claims.sub.parse().map_err(|_| {
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSubject)
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            name: claims.name,
            system: claims.system,
        })
    }
}
