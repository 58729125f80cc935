//! Password sign-in issuing opaque bearer tokens.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::crypto::verify_password;
use super::state::AuthState;
use super::storage::{insert_session, lookup_login_record};
use super::types::{MsgResponse, SigninRequest, SigninResponse};
use super::utils::normalize_email;

/// Exchange email and password for a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 400, description = "Missing credentials", body = MsgResponse),
        (status = 401, description = "Invalid credentials", body = MsgResponse),
        (status = 500, description = "Sign-in failed", body = MsgResponse)
    ),
    tag = "auth"
)]
pub async fn signin(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SigninRequest>>,
) -> impl IntoResponse {
    let request: SigninRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MsgResponse::new("Email and password are required.")),
            )
                .into_response();
        }
    };

    let email = normalize_email(&request.email);
    if email.is_empty() || request.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("Email and password are required.")),
        )
            .into_response();
    }

    let record = match lookup_login_record(&pool, &email).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(MsgResponse::new("Invalid email or password.")),
            )
                .into_response();
        }
        Err(err) => {
            error!("Failed to lookup login record: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Sign-in failed. Please try again.")),
            )
                .into_response();
        }
    };

    match verify_password(&request.password, &record.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(MsgResponse::new("Invalid email or password.")),
            )
                .into_response();
        }
        Err(err) => {
            error!("Failed to verify password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Sign-in failed. Please try again.")),
            )
                .into_response();
        }
    }

    let ttl_seconds = auth_state.config().session_ttl_seconds();
    match insert_session(&pool, record.user_id, ttl_seconds).await {
        Ok(token) => (StatusCode::OK, Json(SigninResponse { token })).into_response(),
        Err(err) => {
            error!("Failed to create session: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Sign-in failed. Please try again.")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::{AuthConfig, AuthState};
    use super::{signin, SigninRequest};
    use crate::api::email::LogMailer;
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Json;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn auth_state() -> Arc<AuthState> {
        let config = AuthConfig::new(
            "@walchandsangli.ac.in".to_string(),
            "http://localhost:5173".to_string(),
        );
        Arc::new(AuthState::new(config, Arc::new(LogMailer)))
    }

    #[tokio::test]
    async fn signin_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = signin(Extension(pool), Extension(auth_state()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signin_blank_credentials() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = signin(
            Extension(pool),
            Extension(auth_state()),
            Some(Json(SigninRequest {
                email: "  ".to_string(),
                password: String::new(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
