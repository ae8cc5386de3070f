//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    /// Returned exactly once; the client must echo it in `X-CSRF-Token`.
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenLoginResponse {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthErrorResponse {
    pub error: String,
    #[serde(rename = "requiresAuth", skip_serializing_if = "Option::is_none")]
    pub requires_auth: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn login_response_uses_wire_field_name() -> Result<()> {
        let response = LoginResponse {
            csrf_token: "secret".to_string(),
        };
        let value = serde_json::to_value(&response)?;
        let token = value
            .get("csrfToken")
            .and_then(serde_json::Value::as_str)
            .context("missing csrfToken")?;
        assert_eq!(token, "secret");
        Ok(())
    }

    #[test]
    fn error_response_omits_requires_auth_when_absent() -> Result<()> {
        let response = AuthErrorResponse {
            error: "Invalid CSRF token".to_string(),
            requires_auth: None,
        };
        let value = serde_json::to_value(&response)?;
        assert_eq!(value.get("requiresAuth"), None);

        let response = AuthErrorResponse {
            error: "Authentication required".to_string(),
            requires_auth: Some(true),
        };
        let value = serde_json::to_value(&response)?;
        assert_eq!(value.get("requiresAuth"), Some(&serde_json::json!(true)));
        Ok(())
    }

    #[test]
    fn login_request_round_trips() -> Result<()> {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let decoded: LoginRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.email, "alice@example.com");
        assert_eq!(decoded.password, "hunter2");
        Ok(())
    }
}
