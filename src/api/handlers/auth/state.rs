//! Auth state and configuration.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

use super::codec::SessionCodec;
use super::gate::{BearerIdentity, CookieIdentity};
use super::token::TokenAuthority;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_TOKEN_AUDIENCE: &str = "sigelo";
const DEFAULT_TOKEN_ISSUER: &str = "https://sigelo.dev";

/// `SameSite` policy for the session cookie.
///
/// `Lax` for same-site deployments; `None` for the cross-domain
/// configuration, which requires the `Secure` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    None,
}

impl SameSite {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            other => Err(format!("invalid SameSite policy: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    cookie_name: String,
    session_ttl_seconds: i64,
    cookie_secure: bool,
    same_site: SameSite,
    token_audience: String,
    token_issuer: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(cookie_name: String) -> Self {
        Self {
            cookie_name,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: true,
            same_site: SameSite::Lax,
            token_audience: DEFAULT_TOKEN_AUDIENCE.to_string(),
            token_issuer: DEFAULT_TOKEN_ISSUER.to_string(),
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    #[must_use]
    pub fn with_token_audience(mut self, audience: String) -> Self {
        self.token_audience = audience;
        self
    }

    #[must_use]
    pub fn with_token_issuer(mut self, issuer: String) -> Self {
        self.token_issuer = issuer;
        self
    }

    /// Check cross-field cookie constraints.
    ///
    /// # Errors
    /// Returns an error when `SameSite=None` is combined with an insecure
    /// cookie; browsers drop that combination.
    pub fn validate(&self) -> Result<()> {
        if self.same_site == SameSite::None && !self.cookie_secure {
            return Err(anyhow!("SameSite=None requires the Secure attribute"));
        }
        Ok(())
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    #[must_use]
    pub fn token_audience(&self) -> &str {
        &self.token_audience
    }

    #[must_use]
    pub fn token_issuer(&self) -> &str {
        &self.token_issuer
    }
}

/// Shared, read-only auth state: configuration plus the two credential
/// transports. Built once at startup and shared behind `Arc`; validation
/// never mutates it.
pub struct AuthState {
    config: AuthConfig,
    codec: SessionCodec,
    tokens: TokenAuthority,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, codec: SessionCodec, tokens: TokenAuthority) -> Self {
        Self {
            config,
            codec,
            tokens,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    pub(crate) fn cookie_identity(&self) -> CookieIdentity<'_> {
        CookieIdentity::new(&self.codec, self.config.cookie_name())
    }

    pub(crate) fn bearer_identity(&self) -> BearerIdentity<'_> {
        BearerIdentity::new(&self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, SameSite};

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("sigelo_session".to_string());

        assert_eq!(config.cookie_name(), "sigelo_session");
        assert_eq!(
            config.session_ttl_seconds(),
            super::DEFAULT_SESSION_TTL_SECONDS
        );
        assert!(config.cookie_secure());
        assert_eq!(config.same_site(), SameSite::Lax);
        assert_eq!(config.token_audience(), super::DEFAULT_TOKEN_AUDIENCE);
        assert_eq!(config.token_issuer(), super::DEFAULT_TOKEN_ISSUER);

        let config = config
            .with_session_ttl_seconds(120)
            .with_cookie_secure(false)
            .with_token_audience("api.test".to_string())
            .with_token_issuer("https://issuer.test".to_string());

        assert_eq!(config.session_ttl_seconds(), 120);
        assert!(!config.cookie_secure());
        assert_eq!(config.token_audience(), "api.test");
        assert_eq!(config.token_issuer(), "https://issuer.test");
    }

    #[test]
    fn same_site_none_requires_secure() {
        let config = AuthConfig::new("sigelo_session".to_string())
            .with_same_site(SameSite::None)
            .with_cookie_secure(false);
        assert!(config.validate().is_err());

        let config = AuthConfig::new("sigelo_session".to_string())
            .with_same_site(SameSite::None)
            .with_cookie_secure(true);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn same_site_parses_case_insensitive() {
        assert_eq!("lax".parse(), Ok(SameSite::Lax));
        assert_eq!("None".parse(), Ok(SameSite::None));
        assert!("strict".parse::<SameSite>().is_err());
    }
}
