//! Bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs carrying the user id as a custom claim plus fixed
//! audience/issuer strings and an expiry of `now + validity window`. The
//! validator pins audience and issuer and rejects any token at or past its
//! expiry. All verification failures collapse into `None`; the bearer path
//! has no secondary failure taxonomy.

use anyhow::{Context, Result};
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct BearerClaims {
    sub: String,
    uid: i64,
    aud: String,
    iss: String,
    iat: u64,
    exp: u64,
}

/// Mints and verifies bearer tokens against a single symmetric key.
///
/// The key is injected at construction; operationally it may be the session
/// MAC key or a dedicated one.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: String,
    issuer: String,
    ttl_seconds: u64,
}

impl TokenAuthority {
    #[must_use]
    pub fn new(signing_key: &[u8], audience: String, issuer: String, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            audience,
            issuer,
            ttl_seconds,
        }
    }

    /// Mint a token for `user_id` expiring one validity window from now.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, get_current_timestamp())
    }

    /// Mint a token with an explicit clock, for deterministic expiry tests.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue_at(&self, user_id: i64, now: u64) -> Result<String> {
        let claims = BearerClaims {
            sub: user_id.to_string(),
            uid: user_id,
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to sign bearer token")
    }

    /// Verify a token and return the embedded user id.
    ///
    /// Returns `None` unless the signature verifies, the audience and issuer
    /// match, and the current time is before the expiry.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<i64> {
        self.verify_at(token, get_current_timestamp())
    }

    /// Verify with an explicit clock, for deterministic expiry tests.
    #[must_use]
    pub fn verify_at(&self, token: &str, now: u64) -> Option<i64> {
        // Expiry, audience, and issuer are checked here against the injected
        // clock; only the signature check is delegated to the library.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<BearerClaims>(token, &self.decoding_key, &validation).ok()?;
        let claims = data.claims;

        if claims.aud != self.audience || claims.iss != self.issuer {
            return None;
        }
        if now >= claims.exp {
            return None;
        }

        Some(claims.uid)
    }
}
