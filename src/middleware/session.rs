use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie the identity provider stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Verifies the caller's session and injects it as a request extension.
/// Requests without a valid session are answered with 401 before any handler runs.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers()).ok_or_else(|| {
        tracing::debug!("request without session token: {}", request.uri());
        ApiError::unauthorized("Unauthorized")
    })?;

    let session = state.sessions.verify(&token).map_err(|e| {
        tracing::debug!("session rejected: {}", e);
        ApiError::unauthorized("Unauthorized")
    })?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Session token from `Authorization: Bearer`, falling back to the session cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert(header::COOKIE, HeaderValue::from_static("__session=cookie-token"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn falls_back_to_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; __session=cookie-token"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn ignores_other_schemes_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.insert(header::COOKIE, HeaderValue::from_static("__session="));
        assert_eq!(extract_session_token(&headers), None);
    }
}
