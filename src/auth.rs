//! Token service — issue and verify JWTs.
//!
//! The rest of the crate treats tokens as opaque strings; only this module
//! knows the signing secret. Handlers resolve a token to a viewer identity
//! through [`JwtKeys::verify`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Claims carried inside a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: jsonwebtoken::EncodingKey,
    decoding_key: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
    expire_secs: i64,
}

impl JwtKeys {
    #[must_use]
    pub fn new(secret: &str, expire_secs: i64) -> Self {
        Self {
            encoding_key: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            validation: jsonwebtoken::Validation::default(),
            expire_secs,
        }
    }

    /// Issues a signed token for a user.
    pub fn issue(&self, user: UserId) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.value().to_string(),
            iat: now,
            exp: now + self.expire_secs,
        };

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &self.encoding_key,
        )?;

        Ok(token)
    }

    /// Verifies a token and returns the user id it was issued for.
    /// Expired, malformed or foreign-signed tokens all yield `None`.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;

        data.claims.sub.parse::<i32>().ok().map(UserId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_roundtrip() {
        let keys = JwtKeys::new("test-secret", 3600);
        let token = keys.issue(UserId::new(42)).expect("issue");
        assert_eq!(keys.verify(&token), Some(UserId::new(42)));
    }

    #[test]
    fn foreign_signature_rejected() {
        let keys = JwtKeys::new("test-secret", 3600);
        let other = JwtKeys::new("other-secret", 3600);
        let token = other.issue(UserId::new(1)).expect("issue");
        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn garbage_token_rejected() {
        let keys = JwtKeys::new("test-secret", 3600);
        assert_eq!(keys.verify("not-a-token"), None);
    }
}
