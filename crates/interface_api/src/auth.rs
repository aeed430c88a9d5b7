//! Authentication and authorization
//!
//! Tokens carry the acting user's id and role; the middleware resolves
//! them into a [`core_kernel::Actor`] that handlers pass straight to the
//! domain services. Per-customer access checks live in the domain layer,
//! not here.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use core_kernel::{Actor, CollectorId, Role};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// The user's role: "admin" or "collector"
    pub role: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// Resolves the claims into a domain actor
    pub fn actor(&self) -> Result<Actor, AuthError> {
        let id: Uuid = self.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let role: Role = self.role.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(match role {
            Role::Admin => Actor::admin(id),
            Role::Collector => Actor::collector(CollectorId::from_uuid(id)),
        })
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

/// Creates a new JWT token for an actor
pub fn create_token(
    actor: Actor,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: actor.id.to_string(),
        role: actor.role.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let actor = Actor::collector(CollectorId::new());
        let token = create_token(actor, "test-secret", 60).unwrap();
        let claims = validate_token(&token, "test-secret").unwrap();
        assert_eq!(claims.actor().unwrap(), actor);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(Actor::admin(Uuid::new_v4()), "secret-a", 60).unwrap();
        assert!(matches!(
            validate_token(&token, "secret-b"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_bad_role_claim_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "auditor".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(claims.actor().is_err());
    }
}
