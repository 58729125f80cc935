//! Authenticated profile endpoint.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::{error, Instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::session::authenticate_bearer;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile of the authenticated user", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "me"
)]
pub async fn get_me(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    let session = match authenticate_bearer(&headers, &pool).await {
        Ok(session) => session,
        Err(status) => return status.into_response(),
    };

    match fetch_profile(&pool, session.user_id).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to fetch profile: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<MeResponse>, sqlx::Error> {
    let query = r#"
        SELECT
            id::text AS id,
            name,
            email,
            phone,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM users
        WHERE id = $1
        LIMIT 1
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.map(|row| MeResponse {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        created_at: row.get("created_at"),
    }))
}

#[cfg(test)]
mod tests {
    use super::get_me;
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn get_me_requires_bearer_token() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = get_me(HeaderMap::new(), Extension(pool))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
