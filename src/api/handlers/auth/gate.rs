//! Request gate: per-transport identity resolution for protected routes.
//!
//! Each protected route consults exactly one [`IdentityResolver`], cookie
//! or bearer, never both. Resolution is a pure, synchronous computation over
//! the request headers; the resolver owns nothing but borrowed key material,
//! so it is safe under arbitrary request-level parallelism.

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};

use super::codec::SessionCodec;
use super::guard::{classify, RequestClass};
use super::token::TokenAuthority;
use super::types::AuthErrorResponse;
use super::utils::{extract_bearer_token, extract_cookie, extract_csrf_header};

/// Authenticated caller context exposed to downstream handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) user_id: i64,
}

/// Classified failure surfaced to the wire before business logic runs.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AuthRejection {
    /// No valid session artifact (absent cookie or decode failure).
    MissingIdentity,
    /// Valid session, but the request's CSRF header is missing or stale.
    ForgedRequest,
    /// Any bearer-path verification failure; deliberately undifferentiated.
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                Json(AuthErrorResponse {
                    error: "Authentication required".to_string(),
                    requires_auth: Some(true),
                }),
            )
                .into_response(),
            Self::ForgedRequest => (
                StatusCode::FORBIDDEN,
                Json(AuthErrorResponse {
                    error: "Invalid CSRF token".to_string(),
                    requires_auth: None,
                }),
            )
                .into_response(),
            Self::InvalidToken => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// A credential transport able to resolve a caller identity from headers.
pub(crate) trait IdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection>;
}

/// Cookie transport: sealed session cookie plus CSRF header.
pub(crate) struct CookieIdentity<'a> {
    codec: &'a SessionCodec,
    cookie_name: &'a str,
}

impl<'a> CookieIdentity<'a> {
    pub(crate) fn new(codec: &'a SessionCodec, cookie_name: &'a str) -> Self {
        Self { codec, cookie_name }
    }
}

impl IdentityResolver for CookieIdentity<'_> {
    fn resolve(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection> {
        // Decode the raw cookie here rather than trusting any upstream
        // validation, so the two failure states stay distinguishable.
        let claim = extract_cookie(headers, self.cookie_name)
            .and_then(|artifact| self.codec.decode(&artifact));

        match classify(claim, extract_csrf_header(headers)) {
            RequestClass::NoSession => Err(AuthRejection::MissingIdentity),
            RequestClass::Unverified => Err(AuthRejection::ForgedRequest),
            RequestClass::Verified(claim) => Ok(Identity {
                user_id: claim.user_id,
            }),
        }
    }
}

/// Bearer transport: self-contained signed token.
pub(crate) struct BearerIdentity<'a> {
    tokens: &'a TokenAuthority,
}

impl<'a> BearerIdentity<'a> {
    pub(crate) fn new(tokens: &'a TokenAuthority) -> Self {
        Self { tokens }
    }
}

impl IdentityResolver for BearerIdentity<'_> {
    fn resolve(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection> {
        let token = extract_bearer_token(headers).ok_or(AuthRejection::InvalidToken)?;
        let user_id = self
            .tokens
            .verify(&token)
            .ok_or(AuthRejection::InvalidToken)?;
        Ok(Identity { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AuthRejection, BearerIdentity, CookieIdentity, Identity, IdentityResolver, SessionCodec,
        TokenAuthority,
    };
    use crate::api::handlers::auth::codec::SessionClaim;
    use crate::api::handlers::auth::utils::CSRF_HEADER;
    use anyhow::{Context, Result};
    use axum::http::{header::AUTHORIZATION, header::COOKIE, HeaderMap, HeaderValue, StatusCode};
    use axum::response::IntoResponse;

    const COOKIE_NAME: &str = "sigelo_session";

    fn codec() -> SessionCodec {
        SessionCodec::new([1u8; 32], [2u8; 32])
    }

    fn tokens() -> TokenAuthority {
        TokenAuthority::new(
            &[3u8; 32],
            "sigelo".to_string(),
            "https://sigelo.dev".to_string(),
            86_400,
        )
    }

    fn session_headers(codec: &SessionCodec, csrf_header: Option<&str>) -> Result<HeaderMap> {
        let claim = SessionClaim {
            user_id: 11,
            csrf_secret: "the-real-secret".to_string(),
        };
        let artifact = codec.encode(&claim)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{COOKIE_NAME}={artifact}"))
                .context("invalid cookie header")?,
        );
        if let Some(value) = csrf_header {
            headers.insert(
                CSRF_HEADER,
                HeaderValue::from_str(value).context("invalid csrf header")?,
            );
        }
        Ok(headers)
    }

    #[test]
    fn cookie_resolver_verified_request() -> Result<()> {
        let codec = codec();
        let headers = session_headers(&codec, Some("the-real-secret"))?;
        let resolver = CookieIdentity::new(&codec, COOKIE_NAME);
        assert_eq!(resolver.resolve(&headers), Ok(Identity { user_id: 11 }));
        Ok(())
    }

    #[test]
    fn cookie_resolver_missing_header_is_forged() -> Result<()> {
        let codec = codec();
        let headers = session_headers(&codec, None)?;
        let resolver = CookieIdentity::new(&codec, COOKIE_NAME);
        assert_eq!(
            resolver.resolve(&headers),
            Err(AuthRejection::ForgedRequest)
        );
        Ok(())
    }

    #[test]
    fn cookie_resolver_mismatched_header_is_forged() -> Result<()> {
        let codec = codec();
        let headers = session_headers(&codec, Some("stale-secret"))?;
        let resolver = CookieIdentity::new(&codec, COOKIE_NAME);
        assert_eq!(
            resolver.resolve(&headers),
            Err(AuthRejection::ForgedRequest)
        );
        Ok(())
    }

    #[test]
    fn cookie_resolver_no_cookie_is_missing_identity() {
        let codec = codec();
        let resolver = CookieIdentity::new(&codec, COOKIE_NAME);
        // Even with a plausible CSRF header the state must be "no session".
        let mut headers = HeaderMap::new();
        headers.insert(CSRF_HEADER, HeaderValue::from_static("the-real-secret"));
        assert_eq!(
            resolver.resolve(&headers),
            Err(AuthRejection::MissingIdentity)
        );
    }

    #[test]
    fn cookie_resolver_garbage_cookie_is_missing_identity() {
        let codec = codec();
        let resolver = CookieIdentity::new(&codec, COOKIE_NAME);
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("sigelo_session=garbage-artifact"),
        );
        assert_eq!(
            resolver.resolve(&headers),
            Err(AuthRejection::MissingIdentity)
        );
    }

    #[test]
    fn bearer_resolver_round_trip() -> Result<()> {
        let tokens = tokens();
        let token = tokens.issue(23)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .context("invalid authorization header")?,
        );
        let resolver = BearerIdentity::new(&tokens);
        assert_eq!(resolver.resolve(&headers), Ok(Identity { user_id: 23 }));
        Ok(())
    }

    #[test]
    fn bearer_resolver_missing_and_invalid_collapse() {
        let tokens = tokens();
        let resolver = BearerIdentity::new(&tokens);

        let headers = HeaderMap::new();
        assert_eq!(resolver.resolve(&headers), Err(AuthRejection::InvalidToken));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer bogus"));
        assert_eq!(resolver.resolve(&headers), Err(AuthRejection::InvalidToken));
    }

    #[tokio::test]
    async fn rejection_wire_contract() -> Result<()> {
        let response = AuthRejection::MissingIdentity.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json["requiresAuth"], serde_json::json!(true));
        assert!(json["error"].is_string());

        let response = AuthRejection::ForgedRequest.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert!(json["error"].is_string());
        assert_eq!(json.get("requiresAuth"), None);

        let response = AuthRejection::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert!(body.is_empty());
        Ok(())
    }
}
