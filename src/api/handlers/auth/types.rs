//! Request and response payloads for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendOtpRequest {
    pub email: String,
}

/// Generic message body used by most auth responses.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MsgResponse {
    pub msg: String,
}

impl MsgResponse {
    #[must_use]
    pub fn new(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupResponse {
    pub msg: String,
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SigninResponse {
    pub token: String,
}
