//! OTP issuance endpoint.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use super::state::AuthState;
use super::types::{MsgResponse, SendOtpRequest};
use super::utils::{allowed_domain, generate_otp_code, normalize_email, valid_email};

/// Issue a one-time password and email it to a campus address.
#[utoipa::path(
    post,
    path = "/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP generated and emailed", body = MsgResponse),
        (status = 400, description = "Missing or non-campus email", body = MsgResponse),
        (status = 500, description = "Email delivery failed", body = MsgResponse)
    ),
    tag = "auth"
)]
pub async fn send_otp(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SendOtpRequest>>,
) -> impl IntoResponse {
    let request: SendOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MsgResponse::new("Email is required.")),
            );
        }
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) || !allowed_domain(&email, auth_state.config().email_domain()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("Only campus emails are allowed.")),
        );
    }

    // Overwrites any previous code for this address; only the latest mailed
    // code is valid.
    let code = generate_otp_code();
    auth_state.otp().put(&email, code.clone()).await;

    // Sub-minute TTLs round up so the mail never claims "0 minutes".
    let minutes = auth_state.config().otp_ttl_seconds().div_ceil(60);
    let subject = "Your OTP for Campus Mart Signup";
    let body = format!("Your OTP is {code}. It expires in {minutes} minutes.");

    // lettre's SmtpTransport is blocking; keep the relay round-trip off the
    // async workers while still reporting delivery failure in the response.
    let mailer = auth_state.mailer();
    let delivery = tokio::task::spawn_blocking(move || mailer.send(&email, subject, &body))
        .await
        .map_err(anyhow::Error::from)
        .and_then(|sent| sent);

    if let Err(err) = delivery {
        error!("Failed to send OTP email: {err}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MsgResponse::new("Failed to send OTP email.")),
        );
    }

    (
        StatusCode::OK,
        Json(MsgResponse::new("OTP sent to your college email.")),
    )
}
