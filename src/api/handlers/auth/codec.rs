//! Session cookie codec: encrypt-then-MAC envelope for the session claim.
//!
//! The cookie value is `base64url(nonce || ciphertext || mac)` where the
//! ciphertext is the JSON claim sealed with `ChaCha20-Poly1305` and the MAC
//! is `HMAC-SHA256` over `nonce || ciphertext` under a second key. Decoding
//! verifies the MAC before touching the ciphertext and fails closed: any
//! mismatch, truncation, or malformed payload yields `None`, never a
//! partially-populated claim.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use hmac::Mac;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use super::HmacSha256;

const NONCE_LEN: usize = 12;
const AEAD_TAG_LEN: usize = 16;
const MAC_LEN: usize = 32;

/// The identity payload carried by the session cookie.
///
/// `csrf_secret` is minted fresh on every login; the client must echo it in
/// the `X-CSRF-Token` header to prove it received the login response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaim {
    pub user_id: i64,
    pub csrf_secret: String,
}

/// Stateless codec holding the two server-side session keys.
///
/// Keys are injected at construction; there is no global key state.
pub struct SessionCodec {
    encryption_key: [u8; 32],
    mac_key: [u8; 32],
}

impl SessionCodec {
    #[must_use]
    pub fn new(encryption_key: [u8; 32], mac_key: [u8; 32]) -> Self {
        Self {
            encryption_key,
            mac_key,
        }
    }

    /// Seal a claim into an opaque cookie value.
    ///
    /// # Errors
    /// Returns an error if the nonce cannot be generated or encryption fails.
    pub fn encode(&self, claim: &SessionClaim) -> Result<String> {
        let payload = serde_json::to_vec(claim).context("failed to serialize session claim")?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .context("failed to generate session nonce")?;

        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.encryption_key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), payload.as_ref())
            .map_err(|err| anyhow!("encryption failure: {err}"))?;

        let mut body = Vec::with_capacity(NONCE_LEN + ciphertext.len() + MAC_LEN);
        body.extend_from_slice(&nonce_bytes);
        body.extend_from_slice(&ciphertext);

        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.mac_key)
            .map_err(|err| anyhow!("invalid MAC key length: {err}"))?;
        mac.update(&body);
        body.extend_from_slice(&mac.finalize().into_bytes());

        Ok(URL_SAFE_NO_PAD.encode(body))
    }

    /// Open a cookie value back into a claim.
    ///
    /// Returns `None` on any failure: bad base64, truncated payload, MAC
    /// mismatch, ciphertext tampering, or claim deserialization failure. The
    /// MAC check is constant-time and runs before decryption, so an
    /// attacker-controlled artifact never reaches the cipher.
    #[must_use]
    pub fn decode(&self, artifact: &str) -> Option<SessionClaim> {
        let data = URL_SAFE_NO_PAD.decode(artifact.as_bytes()).ok()?;
        if data.len() < NONCE_LEN + AEAD_TAG_LEN + MAC_LEN {
            return None;
        }

        let (body, tag) = data.split_at(data.len() - MAC_LEN);
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.mac_key).ok()?;
        mac.update(body);
        mac.verify_slice(tag).ok()?;

        let (nonce_bytes, ciphertext) = body.split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.encryption_key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .ok()?;

        serde_json::from_slice(&plaintext).ok()
    }
}
