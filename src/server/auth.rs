//! HTTP basic authentication middleware.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::BasicCredentials;

/// Realm advertised in `WWW-Authenticate`.
const REALM: &str = "swaig";

/// Shared auth state injected via axum middleware state.
#[derive(Clone)]
pub struct AuthState {
    credentials: Arc<BasicCredentials>,
}

impl AuthState {
    pub fn new(credentials: BasicCredentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
        }
    }
}

/// Reject requests whose `Authorization: Basic ...` header does not carry
/// the configured username and password.
pub async fn basic_auth_middleware(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic);

    match presented {
        Some((username, password)) if auth.credentials.matches(&username, &password) => {
            next.run(request).await
        }
        Some((username, _)) => {
            tracing::warn!(%username, path = %request.uri().path(), "Rejected basic auth credentials");
            unauthorized()
        }
        None => unauthorized(),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            format!("Basic realm=\"{}\"", REALM),
        )],
        Json(serde_json::json!({ "error": "Unauthorized" })),
    )
        .into_response()
}

/// Decode `Basic <base64(user:pass)>` into its two parts.
fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        // admin:secret
        assert_eq!(
            parse_basic("Basic YWRtaW46c2VjcmV0"),
            Some(("admin".to_string(), "secret".to_string()))
        );
        assert_eq!(
            parse_basic("basic YWRtaW46c2VjcmV0"),
            Some(("admin".to_string(), "secret".to_string()))
        );
        // "user:pa:ss" keeps everything after the first colon
        let encoded = STANDARD.encode("user:pa:ss");
        assert_eq!(
            parse_basic(&format!("Basic {}", encoded)),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn test_parse_basic_rejects_garbage() {
        assert_eq!(parse_basic("Bearer YWRtaW46c2VjcmV0"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
        assert_eq!(parse_basic("Basic"), None);
        let no_colon = STANDARD.encode("adminsecret");
        assert_eq!(parse_basic(&format!("Basic {}", no_colon)), None);
    }
}
