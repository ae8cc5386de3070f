//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use crate::api::handlers::{auth, health, me};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sigelo",
        description = "Cross-domain authentication service",
    ),
    paths(
        health::health,
        auth::session::login,
        auth::session::logout,
        auth::token_login::token_login,
        me::get_me,
        me::get_me_token,
    ),
    components(schemas(
        health::Health,
        auth::types::LoginRequest,
        auth::types::LoginResponse,
        auth::types::TokenLoginResponse,
        auth::types::AuthErrorResponse,
        me::MeResponse,
    )),
    tags(
        (name = "auth", description = "Login, logout, and token issuance"),
        (name = "me", description = "Authenticated sample resource"),
        (name = "health", description = "Service liveness")
    )
)]
pub struct ApiDoc;
