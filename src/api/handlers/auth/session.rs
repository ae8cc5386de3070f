//! Cookie-transport login and logout endpoints.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::codec::SessionClaim;
use super::state::{AuthConfig, AuthState};
use super::types::{AuthErrorResponse, LoginRequest, LoginResponse};
use super::utils::{generate_csrf_secret, valid_email};
use super::verifier::verify_credentials;

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set; body carries the CSRF token", body = LoginResponse),
        (status = 400, description = "Malformed request", body = String),
        (status = 401, description = "Bad credentials", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if !valid_email(request.email.trim()) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    let user_id = match verify_credentials(&pool, request.email.trim(), &request.password).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return bad_credentials(),
        Err(err) => {
            error!("Credential verification failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // A new CSRF secret on every login; the previous cookie simply stops
    // matching and is never mutated in place.
    let csrf_secret = match generate_csrf_secret() {
        Ok(secret) => secret,
        Err(err) => {
            error!("CSRF secret generation failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let claim = SessionClaim {
        user_id,
        csrf_secret: csrf_secret.clone(),
    };
    let artifact = match auth_state.codec().encode(&claim) {
        Ok(artifact) => artifact,
        Err(err) => {
            error!("Session encoding failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(auth_state.config(), &artifact) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse {
            csrf_token: csrf_secret,
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Stateless sessions: logout is purely instructing the client to drop
    // the cookie. There is no server-side record to delete.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

fn bad_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthErrorResponse {
            error: "Invalid email or password".to_string(),
            requires_auth: None,
        }),
    )
        .into_response()
}

/// Build the `Set-Cookie` header for a freshly sealed session.
pub(super) fn session_cookie(
    config: &AuthConfig,
    artifact: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let name = config.cookie_name();
    let ttl_seconds = config.session_ttl_seconds();
    let same_site = config.same_site();
    let mut cookie =
        format!("{name}={artifact}; Path=/; HttpOnly; SameSite={same_site}; Max-Age={ttl_seconds}");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let name = config.cookie_name();
    let same_site = config.same_site();
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite={same_site}; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::{clear_session_cookie, session_cookie};
    use crate::api::handlers::auth::state::{AuthConfig, SameSite};
    use anyhow::{Context, Result};

    fn config() -> AuthConfig {
        AuthConfig::new("sigelo_session".to_string())
    }

    #[test]
    fn session_cookie_carries_required_attributes() -> Result<()> {
        let cookie = session_cookie(&config(), "artifact")?;
        let value = cookie.to_str().context("cookie not ascii")?;
        assert!(value.starts_with("sigelo_session=artifact; "));
        assert!(value.contains("Path=/"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=86400"));
        assert!(value.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn session_cookie_omits_secure_when_disabled() -> Result<()> {
        let config = config().with_cookie_secure(false);
        let cookie = session_cookie(&config, "artifact")?;
        let value = cookie.to_str().context("cookie not ascii")?;
        assert!(!value.contains("Secure"));
        Ok(())
    }

    #[test]
    fn cross_domain_cookie_uses_same_site_none() -> Result<()> {
        let config = config().with_same_site(SameSite::None);
        let cookie = session_cookie(&config, "artifact")?;
        let value = cookie.to_str().context("cookie not ascii")?;
        assert!(value.contains("SameSite=None"));
        assert!(value.contains("Secure"));
        Ok(())
    }

    #[test]
    fn clear_cookie_expires_immediately() -> Result<()> {
        let cookie = clear_session_cookie(&config())?;
        let value = cookie.to_str().context("cookie not ascii")?;
        assert!(value.starts_with("sigelo_session=; "));
        assert!(value.contains("Max-Age=0"));
        Ok(())
    }
}
