//! Bearer-transport login endpoint.
//!
//! Authenticates against the same credential verifier as the cookie login
//! and returns a self-contained signed token instead of setting a cookie.
//! Bad credentials return `401` on both login endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::state::AuthState;
use super::types::{AuthErrorResponse, LoginRequest, TokenLoginResponse};
use super::utils::valid_email;
use super::verifier::verify_credentials;

#[utoipa::path(
    post,
    path = "/v1/auth/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = TokenLoginResponse),
        (status = 400, description = "Malformed request", body = String),
        (status = 401, description = "Bad credentials", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
pub async fn token_login(
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
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(AuthErrorResponse {
                    error: "Invalid email or password".to_string(),
                    requires_auth: None,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Credential verification failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match auth_state.tokens().issue(user_id) {
        Ok(token) => (StatusCode::OK, Json(TokenLoginResponse { token })).into_response(),
        Err(err) => {
            error!("Token issuance failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
