//! Authenticated sample resource, one route per credential transport.
//!
//! `/v1/me` is cookie-protected: the request must carry a valid session
//! cookie and a matching `X-CSRF-Token` header. `/v1/api/me` is
//! bearer-protected. Both expose the same profile once the gate resolves an
//! identity.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use super::auth::gate::{Identity, IdentityResolver};
use super::auth::storage::lookup_user_profile;
use super::auth::AuthState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: i64,
    pub email: String,
}

#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Return the authenticated user profile.", body = MeResponse),
        (status = 401, description = "No valid session; authenticate first."),
        (status = 403, description = "Valid session but missing or stale CSRF token."),
    ),
    tag = "me"
)]
pub async fn get_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let identity = match auth_state.cookie_identity().resolve(&headers) {
        Ok(identity) => identity,
        Err(rejection) => return rejection.into_response(),
    };

    profile_response(&pool, identity).await
}

#[utoipa::path(
    get,
    path = "/v1/api/me",
    responses(
        (status = 200, description = "Return the authenticated user profile.", body = MeResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
    ),
    tag = "me"
)]
pub async fn get_me_token(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let identity = match auth_state.bearer_identity().resolve(&headers) {
        Ok(identity) => identity,
        Err(rejection) => return rejection.into_response(),
    };

    profile_response(&pool, identity).await
}

async fn profile_response(pool: &PgPool, identity: Identity) -> axum::response::Response {
    match lookup_user_profile(pool, identity.user_id).await {
        Ok(Some(profile)) => {
            let response = MeResponse {
                user_id: profile.id,
                email: profile.email,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to fetch profile: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
