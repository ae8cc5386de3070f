//! Credential verification against the user store.
//!
//! Both login entry points (cookie and bearer) call [`verify_credentials`],
//! so the two transports authenticate against exactly the same rules.

use anyhow::Result;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use sqlx::PgPool;
use std::sync::LazyLock;

use super::storage::lookup_user_by_email;

// Digest verified when no user record exists, so the unknown-identifier
// path performs the same hashing work as the wrong-password path.
static FALLBACK_DIGEST: LazyLock<String> = LazyLock::new(fallback_digest);

/// Verify an identifier/secret pair and return the user's id on match.
///
/// "No such user" and "wrong secret" both collapse to `Ok(None)`; callers
/// must not distinguish them.
///
/// # Errors
/// Returns an error only on user-store failures, never on bad credentials.
pub(crate) async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<i64>> {
    match lookup_user_by_email(pool, email).await? {
        Some(user) => Ok(secret_matches(&user.password_hash, password).then_some(user.id)),
        None => {
            let _ = secret_matches(&FALLBACK_DIGEST, password);
            Ok(None)
        }
    }
}

/// Constant-time verification of a supplied secret against a PHC digest.
fn secret_matches(digest: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(digest) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

fn fallback_digest() -> String {
    // Fixed salt keeps the digest deterministic; it never guards a real
    // account.
    let Ok(salt) = SaltString::encode_b64(b"sigelo-fallback1") else {
        return String::new();
    };
    Argon2::default()
        .hash_password(b"sigelo-fallback-password", &salt)
        .map(|hash| hash.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{fallback_digest, secret_matches};
    use anyhow::Result;
    use argon2::{Argon2, PasswordHasher};
    use password_hash::SaltString;

    fn digest_of(password: &str) -> Result<String> {
        let salt = SaltString::encode_b64(b"test-salt-16byte")
            .map_err(|err| anyhow::anyhow!(err.to_string()))?;
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow::anyhow!(err.to_string()))?
            .to_string())
    }

    #[test]
    fn matching_secret_verifies() -> Result<()> {
        let digest = digest_of("correct horse battery staple")?;
        assert!(secret_matches(&digest, "correct horse battery staple"));
        Ok(())
    }

    #[test]
    fn wrong_secret_fails() -> Result<()> {
        let digest = digest_of("correct horse battery staple")?;
        assert!(!secret_matches(&digest, "Tr0ub4dor&3"));
        Ok(())
    }

    #[test]
    fn malformed_digest_fails() {
        assert!(!secret_matches("not-a-phc-string", "anything"));
        assert!(!secret_matches("", "anything"));
    }

    #[test]
    fn fallback_digest_is_a_real_phc_string() {
        // The unknown-identifier path must perform real verification work,
        // which requires a parseable digest.
        let digest = fallback_digest();
        assert!(digest.starts_with("$argon2"));
        assert!(!secret_matches(&digest, "any supplied secret"));
    }
}
