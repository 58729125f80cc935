//! Signup finalizer: OTP consumption plus account creation.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::crypto::hash_password;
use super::state::AuthState;
use super::storage::{insert_account, AccountOutcome};
use super::store::OtpConsumeError;
use super::types::{MsgResponse, SignupRequest, SignupResponse};
use super::utils::normalize_email;

/// Finalize signup by consuming the OTP and creating the account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Missing fields or OTP rejected", body = MsgResponse),
        (status = 409, description = "Account already exists", body = MsgResponse),
        (status = 500, description = "Signup failed", body = MsgResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MsgResponse::new("All fields are required.")),
            )
                .into_response();
        }
    };

    let email = normalize_email(&request.email);
    let name = request.name.trim();
    let phone = request.phone.trim();
    let otp = request.otp.trim();

    if name.is_empty() || email.is_empty() || phone.is_empty() || request.password.is_empty() || otp.is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("All fields are required.")),
        )
            .into_response();
    }

    // The OTP gate comes first; no account work happens for a bad code. A
    // successful consume burns the code even if the insert later fails.
    if let Err(err) = auth_state.otp().consume(&email, otp).await {
        let msg = match err {
            OtpConsumeError::NotFound => "No OTP was requested for this email.",
            OtpConsumeError::Expired => "OTP has expired. Please request a new one.",
            OtpConsumeError::Mismatch => "Incorrect OTP.",
        };
        return (StatusCode::BAD_REQUEST, Json(MsgResponse::new(msg))).into_response();
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Signup failed. Please try again.")),
            )
                .into_response();
        }
    };

    match insert_account(&pool, name, &email, phone, &password_hash).await {
        Ok(AccountOutcome::Created { id }) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                msg: "Account created successfully.".to_string(),
                id,
                email,
            }),
        )
            .into_response(),
        Ok(AccountOutcome::Exists) => (
            StatusCode::CONFLICT,
            Json(MsgResponse::new("Account already exists.")),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to create account: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Signup failed. Please try again.")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::{AuthConfig, AuthState};
    use super::{signup, SignupRequest};
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

    fn request(otp: &str) -> Json<SignupRequest> {
        Json(SignupRequest {
            name: "Alice".to_string(),
            email: "alice@walchandsangli.ac.in".to_string(),
            phone: "9876543210".to_string(),
            password: "hunter2hunter2".to_string(),
            otp: otp.to_string(),
        })
    }

    #[tokio::test]
    async fn signup_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = signup(Extension(pool), Extension(auth_state()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signup_blank_fields() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let mut payload = request("123456");
        payload.name = "  ".to_string();
        let response = signup(Extension(pool), Extension(auth_state()), Some(payload))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signup_without_requested_otp() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = signup(
            Extension(pool),
            Extension(auth_state()),
            Some(request("123456")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn signup_wrong_otp_keeps_code_usable() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let state = auth_state();
        state
            .otp()
            .put("alice@walchandsangli.ac.in", "654321".to_string())
            .await;

        let response = signup(
            Extension(pool),
            Extension(Arc::clone(&state)),
            Some(request("000000")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        // The mailed code survives a wrong guess.
        assert!(state.otp().get("alice@walchandsangli.ac.in").await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn signup_normalizes_email_before_otp_check() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let state = auth_state();
        state
            .otp()
            .put("alice@walchandsangli.ac.in", "654321".to_string())
            .await;

        let mut payload = request("000000");
        payload.email = " ALICE@walchandsangli.ac.in ".to_string();
        let response = signup(Extension(pool), Extension(state), Some(payload))
            .await
            .into_response();

        // Mismatch, not NotFound: the normalized email found the entry.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(body["msg"], "Incorrect OTP.");
        Ok(())
    }
}
