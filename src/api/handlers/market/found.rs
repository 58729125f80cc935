//! Found item reporting endpoints.

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::super::auth::session::authenticate_bearer;
use super::super::auth::types::MsgResponse;
use super::storage::{delete_found, found_details, insert_found, list_found_by_finder};
use super::types::{
    CreateFoundRequest, DetailsRequest, FoundDetailsResponse, FoundListResponse, FoundResponse,
};

/// Report a found item.
#[utoipa::path(
    post,
    path = "/found",
    request_body = CreateFoundRequest,
    responses(
        (status = 201, description = "Item reported", body = FoundResponse),
        (status = 400, description = "Invalid report", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Report failed", body = MsgResponse)
    ),
    tag = "found"
)]
pub async fn create_found(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<CreateFoundRequest>>,
) -> impl IntoResponse {
    let session = match authenticate_bearer(&headers, &pool).await {
        Ok(session) => session,
        Err(status) => return status.into_response(),
    };

    let request: CreateFoundRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(MsgResponse::new("All fields are required.")),
            )
                .into_response();
        }
    };

    if request.name.trim().is_empty()
        || request.description.trim().is_empty()
        || request.location_found.trim().is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("All fields are required.")),
        )
            .into_response();
    }

    match insert_found(&pool, session.user_id, &request).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(err) => {
            error!("Failed to insert found item: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Failed to report item.")),
            )
                .into_response()
        }
    }
}

/// Found item detail view including finder contact.
#[utoipa::path(
    post,
    path = "/found/details",
    request_body = DetailsRequest,
    responses(
        (status = 200, description = "Item with finder contact", body = FoundDetailsResponse),
        (status = 400, description = "Invalid id", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Item not found")
    ),
    tag = "found"
)]
pub async fn details(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<DetailsRequest>>,
) -> impl IntoResponse {
    if let Err(status) = authenticate_bearer(&headers, &pool).await {
        return status.into_response();
    }

    let Some(id) = payload.and_then(|Json(payload)| Uuid::parse_str(payload.id.trim()).ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("A valid item id is required.")),
        )
            .into_response();
    };

    match found_details(&pool, id).await {
        Ok(Some((item, finder))) => {
            (StatusCode::OK, Json(FoundDetailsResponse { item, finder })).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to fetch found item details: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The bearer's own found reports.
#[utoipa::path(
    get,
    path = "/me/found",
    responses(
        (status = 200, description = "Own found reports", body = FoundListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "found"
)]
pub async fn my_found(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    let session = match authenticate_bearer(&headers, &pool).await {
        Ok(session) => session,
        Err(status) => return status.into_response(),
    };

    match list_found_by_finder(&pool, session.user_id).await {
        Ok(data) => (StatusCode::OK, Json(FoundListResponse { data })).into_response(),
        Err(err) => {
            error!("Failed to list own found items: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Remove a found report. Only the reporter may delete; anyone else sees 404.
#[utoipa::path(
    delete,
    path = "/found/{id}",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = MsgResponse),
        (status = 400, description = "Invalid id", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Item not found")
    ),
    tag = "found"
)]
pub async fn remove(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let session = match authenticate_bearer(&headers, &pool).await {
        Ok(session) => session,
        Err(status) => return status.into_response(),
    };

    let Ok(id) = Uuid::parse_str(id.trim()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("A valid item id is required.")),
        )
            .into_response();
    };

    match delete_found(&pool, id, session.user_id).await {
        Ok(true) => (StatusCode::OK, Json(MsgResponse::new("Item deleted."))).into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to delete found item: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
