//! Marketplace listing endpoints.

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
use super::storage::{
    delete_purchase, insert_purchase, list_purchases, list_purchases_by_category,
    list_purchases_by_seller, purchase_details, search_purchases,
};
use super::types::{
    CategoryRequest, CreatePurchaseRequest, DetailsRequest, PurchaseDetailsResponse,
    PurchaseListResponse, PurchaseResponse, SearchRequest,
};

/// List an item for sale.
#[utoipa::path(
    post,
    path = "/purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Item listed", body = PurchaseResponse),
        (status = 400, description = "Invalid listing", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Listing failed", body = MsgResponse)
    ),
    tag = "purchases"
)]
pub async fn create_purchase(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<CreatePurchaseRequest>>,
) -> impl IntoResponse {
    let session = match authenticate_bearer(&headers, &pool).await {
        Ok(session) => session,
        Err(status) => return status.into_response(),
    };

    let request: CreatePurchaseRequest = match payload {
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
        || request.category.trim().is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("All fields are required.")),
        )
            .into_response();
    }

    if request.old_price < 0 || request.current_price < 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("Prices must not be negative.")),
        )
            .into_response();
    }

    match insert_purchase(&pool, session.user_id, &request).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(err) => {
            error!("Failed to insert purchase item: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MsgResponse::new("Failed to list item.")),
            )
                .into_response()
        }
    }
}

/// All listed items, newest first.
#[utoipa::path(
    get,
    path = "/purchases",
    responses(
        (status = 200, description = "All listed items", body = PurchaseListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "purchases"
)]
pub async fn get_purchases(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    if let Err(status) = authenticate_bearer(&headers, &pool).await {
        return status.into_response();
    }

    match list_purchases(&pool).await {
        Ok(data) => (StatusCode::OK, Json(PurchaseListResponse { data })).into_response(),
        Err(err) => {
            error!("Failed to list purchase items: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Items in a single category.
#[utoipa::path(
    post,
    path = "/purchases/by-category",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Items in the category", body = PurchaseListResponse),
        (status = 400, description = "Missing category", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "purchases"
)]
pub async fn purchases_by_category(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<CategoryRequest>>,
) -> impl IntoResponse {
    if let Err(status) = authenticate_bearer(&headers, &pool).await {
        return status.into_response();
    }

    let category = match payload {
        Some(Json(payload)) => payload.category.trim().to_string(),
        None => String::new(),
    };
    if category.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("Category is required.")),
        )
            .into_response();
    }

    match list_purchases_by_category(&pool, &category).await {
        Ok(data) => (StatusCode::OK, Json(PurchaseListResponse { data })).into_response(),
        Err(err) => {
            error!("Failed to list purchase items by category: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Case-insensitive substring search over name and description.
#[utoipa::path(
    post,
    path = "/purchases/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching items", body = PurchaseListResponse),
        (status = 400, description = "Missing query", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "purchases"
)]
pub async fn search(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    payload: Option<Json<SearchRequest>>,
) -> impl IntoResponse {
    if let Err(status) = authenticate_bearer(&headers, &pool).await {
        return status.into_response();
    }

    let query = match payload {
        Some(Json(payload)) => payload.query.trim().to_string(),
        None => String::new(),
    };
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MsgResponse::new("Search query is required.")),
        )
            .into_response();
    }

    let pattern = format!("%{query}%");
    match search_purchases(&pool, &pattern).await {
        Ok(data) => (StatusCode::OK, Json(PurchaseListResponse { data })).into_response(),
        Err(err) => {
            error!("Failed to search purchase items: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Item detail view including seller contact.
#[utoipa::path(
    post,
    path = "/purchases/details",
    request_body = DetailsRequest,
    responses(
        (status = 200, description = "Item with seller contact", body = PurchaseDetailsResponse),
        (status = 400, description = "Invalid id", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Item not found")
    ),
    tag = "purchases"
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

    match purchase_details(&pool, id).await {
        Ok(Some((item, seller))) => {
            (StatusCode::OK, Json(PurchaseDetailsResponse { item, seller })).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to fetch purchase item details: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The bearer's own listings.
#[utoipa::path(
    get,
    path = "/me/purchases",
    responses(
        (status = 200, description = "Own listings", body = PurchaseListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    tag = "purchases"
)]
pub async fn my_purchases(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    let session = match authenticate_bearer(&headers, &pool).await {
        Ok(session) => session,
        Err(status) => return status.into_response(),
    };

    match list_purchases_by_seller(&pool, session.user_id).await {
        Ok(data) => (StatusCode::OK, Json(PurchaseListResponse { data })).into_response(),
        Err(err) => {
            error!("Failed to list own purchase items: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Remove a listing. Only the seller may delete; anyone else sees 404.
#[utoipa::path(
    delete,
    path = "/purchases/{id}",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = MsgResponse),
        (status = 400, description = "Invalid id", body = MsgResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Item not found")
    ),
    tag = "purchases"
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

    match delete_purchase(&pool, id, session.user_id).await {
        Ok(true) => (StatusCode::OK, Json(MsgResponse::new("Item deleted."))).into_response(),
        // Listings owned by someone else are indistinguishable from missing ones.
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to delete purchase item: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
