use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::generate_token;
use crate::error::ApiError;
use crate::models::TokenRequest;
use crate::AppState;

/// POST /jwt - self-issued token variant. Mints an HS256 token for the
/// given email and sets it as an http-only `token` cookie; the token is
/// also returned in the body for bearer-header clients.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Response, ApiError> {
    let token = generate_token(
        payload.email,
        &state.security.jwt_secret,
        state.security.token_expiry_hours,
    )?;

    let cookie = format!(
        "token={}; HttpOnly; Path=/; SameSite=None{}",
        token,
        secure_suffix(state.security.secure_cookies)
    );

    let mut response = Json(json!({ "success": true, "token": token })).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|_| ApiError::internal_server_error("Failed to build cookie"))?,
    );
    Ok(response)
}

/// GET /logout - clears the `token` cookie
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cookie = format!(
        "token=; HttpOnly; Path=/; Max-Age=0; SameSite=None{}",
        secure_suffix(state.security.secure_cookies)
    );

    let mut response = Json(json!({ "success": true })).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|_| ApiError::internal_server_error("Failed to build cookie"))?,
    );
    Ok(response)
}

fn secure_suffix(secure: bool) -> &'static str {
    if secure {
        "; Secure"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_suffix() {
        assert_eq!(secure_suffix(true), "; Secure");
        assert_eq!(secure_suffix(false), "");
    }
}
