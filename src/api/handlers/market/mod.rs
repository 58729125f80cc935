//! Marketplace handlers: items for sale and found item reports.
//!
//! Every endpoint here requires a bearer token. Deletion is scoped to the
//! posting owner, a non-owner cannot tell a foreign item from a missing one.

pub(crate) mod found;
pub(crate) mod purchases;
mod storage;
pub(crate) mod types;

#[cfg(test)]
mod tests {
    use super::purchases::get_purchases;
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
    use axum::response::IntoResponse;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn listings_require_bearer_token() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = get_purchases(HeaderMap::new(), Extension(pool))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_authorization_scheme_is_rejected() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        let response = get_purchases(headers, Extension(pool))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
