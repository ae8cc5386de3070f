use crate::api;
use crate::api::handlers::auth::{AuthConfig, AuthState, SameSite, SessionCodec, TokenAuthority};
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub cookie_name: String,
    pub session_ttl_seconds: i64,
    pub cookie_secure: bool,
    pub same_site: String,
    pub session_encryption_key: SecretString,
    pub session_mac_key: SecretString,
    pub token_signing_key: Option<SecretString>,
    pub token_audience: String,
    pub token_issuer: String,
    pub token_ttl_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if a key fails to decode, the configuration is invalid,
/// or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let dsn = Url::parse(&args.dsn).context("Invalid database DSN")?;

    let same_site = args
        .same_site
        .parse::<SameSite>()
        .map_err(|err| anyhow!(err))?;

    let config = AuthConfig::new(args.cookie_name)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure)
        .with_same_site(same_site)
        .with_token_audience(args.token_audience)
        .with_token_issuer(args.token_issuer);
    config.validate()?;

    let encryption_key =
        decode_key(&args.session_encryption_key).context("Invalid session encryption key")?;
    let mac_key = decode_key(&args.session_mac_key).context("Invalid session MAC key")?;

    // The bearer path reuses the session MAC key unless a dedicated signing
    // key is configured.
    let signing_key = match &args.token_signing_key {
        Some(key) => decode_key(key).context("Invalid token signing key")?,
        None => mac_key,
    };

    let codec = SessionCodec::new(encryption_key, mac_key);
    let tokens = TokenAuthority::new(
        &signing_key,
        config.token_audience().to_string(),
        config.token_issuer().to_string(),
        args.token_ttl_seconds,
    );
    let auth_state = Arc::new(AuthState::new(config, codec, tokens));

    api::new(args.port, dsn.to_string(), auth_state).await
}

/// Decode a base64 CLI argument into exactly 32 bytes of key material.
fn decode_key(key: &SecretString) -> Result<[u8; 32]> {
    let bytes = STANDARD
        .decode(key.expose_secret().trim())
        .context("key is not valid base64")?;
    let len = bytes.len();
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow!("key must decode to 32 bytes, got {len}"))
}

#[cfg(test)]
mod tests {
    use super::decode_key;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use secrecy::SecretString;

    #[test]
    fn decode_key_accepts_32_bytes() {
        let encoded = STANDARD.encode([7u8; 32]);
        let key = decode_key(&SecretString::from(encoded));
        assert_eq!(key.ok(), Some([7u8; 32]));
    }

    #[test]
    fn decode_key_trims_whitespace() {
        let encoded = format!(" {} \n", STANDARD.encode([1u8; 32]));
        let key = decode_key(&SecretString::from(encoded));
        assert_eq!(key.ok(), Some([1u8; 32]));
    }

    #[test]
    fn decode_key_rejects_wrong_length() {
        let encoded = STANDARD.encode([7u8; 16]);
        let result = decode_key(&SecretString::from(encoded));
        assert!(result.is_err());
    }

    #[test]
    fn decode_key_rejects_invalid_base64() {
        let result = decode_key(&SecretString::from("not-base64!".to_string()));
        assert!(result.is_err());
    }
}
