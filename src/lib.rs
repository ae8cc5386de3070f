//! # Sigelo (Cross-Domain Authentication Service)
//!
//! `sigelo` proves caller identity on each HTTP request and protects every
//! request against forged cross-origin submissions. Two independent
//! credential transports are supported against the same user store:
//!
//! - **Cookie sessions**: an encrypted-then-MACed claim carried in an
//!   `HttpOnly` cookie, paired with a per-login CSRF secret the client must
//!   echo in the `X-CSRF-Token` header on every request.
//! - **Bearer tokens**: a self-contained HS256 JWT carrying the same user
//!   identity plus an expiry, validated offline against the configured
//!   audience and issuer.
//!
//! Both transports are stateless: no session table, no revocation list.
//! Validity is entirely re-derivable from the presented artifact plus the
//! server-held keys.
//!
//! ## Request classification
//!
//! Cookie-protected routes distinguish three states per request:
//! no valid session (`401`, authenticate first), a valid session with a
//! missing or stale CSRF header (`403`, re-fetch the CSRF token), and a
//! fully verified request that reaches the handler. Every HTTP method is
//! classified, not only mutating ones, because cross-domain deployments
//! ship the cookie with `SameSite=None`.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
