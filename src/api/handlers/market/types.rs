//! Request and response payloads for the marketplace endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Seller or finder contact details shown on item detail pages.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePurchaseRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub old_price: i64,
    pub current_price: i64,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub id: String,
    pub seller_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub old_price: i64,
    pub current_price: i64,
    pub image_urls: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PurchaseListResponse {
    pub data: Vec<PurchaseResponse>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PurchaseDetailsResponse {
    #[serde(flatten)]
    pub item: PurchaseResponse,
    pub seller: Contact,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CategoryRequest {
    pub category: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DetailsRequest {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFoundRequest {
    pub name: String,
    pub description: String,
    pub location_found: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FoundResponse {
    pub id: String,
    pub finder_id: String,
    pub name: String,
    pub description: String,
    pub location_found: String,
    pub image_urls: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FoundListResponse {
    pub data: Vec<FoundResponse>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FoundDetailsResponse {
    #[serde(flatten)]
    pub item: FoundResponse,
    pub finder: Contact,
}
