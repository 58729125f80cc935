//! Bearer token authentication for protected endpoints.

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use sqlx::PgPool;
use tracing::error;

use super::storage::{lookup_session, SessionRecord};
use super::utils::hash_session_token;

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Resolve the bearer token into a live session record.
///
/// Missing, malformed, expired, and unknown tokens all surface as 401; only
/// database failures are 500.
pub(crate) async fn authenticate_bearer(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<SessionRecord, StatusCode> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    // Only the hash is stored; never compare raw tokens against the database.
    let token_hash = hash_session_token(&token);
    match lookup_session(pool, &token_hash).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            error!("Failed to lookup session: {err}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extract_bearer_token_happy_path() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_bearer_token_lowercase_scheme() {
        let headers = headers_with("bearer abc123");
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_bearer_token_rejects_other_schemes_and_empty() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic abc123")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("abc123")), None);
    }
}
